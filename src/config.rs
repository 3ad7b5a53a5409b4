//! Client configuration.
//!
//! Endpoint bases and transport limits come from the environment (optionally
//! via a `.env` file). They are consumed as opaque strings; the only checks
//! made here are that each base parses as a URL and numbers parse.

use url::Url;

use crate::error::{ProfileError, ProfileResult};

pub const ENV_VP_URL: &str = "VP_URL";
pub const ENV_VP_CLIENT_ID_URL: &str = "VP_CLIENT_ID_URL";
pub const ENV_ASSOCIATED_VEHICLES_URL: &str = "VP_ASSOCIATED_VEHICLES_URL";
pub const ENV_ASSOCIATE_URL: &str = "VP_ASSOCIATE_URL";
pub const ENV_DISASSOCIATE_URL: &str = "VP_DISASSOCIATE_URL";
pub const ENV_TIMEOUT_MS: &str = "VP_HTTP_TIMEOUT_MS";
pub const ENV_POOL_MAX_IDLE: &str = "VP_HTTP_POOL_MAX_IDLE";
pub const ENV_POOL_IDLE_TIMEOUT_MS: &str = "VP_HTTP_POOL_IDLE_TIMEOUT_MS";
pub const ENV_VEHICLE_OWNER_ROLE: &str = "VP_VEHICLE_OWNER_ROLE";

const DEFAULT_BASE: &str = "http://localhost";
const DEFAULT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_POOL_MAX_IDLE: usize = 20;
const DEFAULT_POOL_IDLE_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_VEHICLE_OWNER_ROLE: &str = "VO";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `GET <base>/<vehicleId>`, `GET <base>?vin=`, `PATCH <base>/<vehicleId>`.
    pub vehicle_profile_url: String,
    /// `GET <base>?clientId=` (list-wrapped response).
    pub client_id_url: String,
    /// `GET <base>?userId=`, or a `{userId}` template.
    pub associated_vehicles_url: String,
    /// `POST <base>/<vehicleId>`, or a `{vehicleId}` template.
    pub associate_url: String,
    pub disassociate_url: String,

    /// Per-request timeout; also bounds the wait for a pooled connection.
    pub timeout_ms: u64,
    pub pool_max_idle: usize,
    pub pool_idle_timeout_ms: u64,

    /// Role reported in user contexts built from the profile owner.
    pub vehicle_owner_role: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            vehicle_profile_url: DEFAULT_BASE.to_string(),
            client_id_url: DEFAULT_BASE.to_string(),
            associated_vehicles_url: DEFAULT_BASE.to_string(),
            associate_url: DEFAULT_BASE.to_string(),
            disassociate_url: DEFAULT_BASE.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            pool_max_idle: DEFAULT_POOL_MAX_IDLE,
            pool_idle_timeout_ms: DEFAULT_POOL_IDLE_TIMEOUT_MS,
            vehicle_owner_role: DEFAULT_VEHICLE_OWNER_ROLE.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> ProfileResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> ProfileResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| lookup(key).filter(|v| !v.trim().is_empty()).unwrap_or(default);

        let config = Self {
            vehicle_profile_url: text(ENV_VP_URL, defaults.vehicle_profile_url),
            client_id_url: text(ENV_VP_CLIENT_ID_URL, defaults.client_id_url),
            associated_vehicles_url: text(ENV_ASSOCIATED_VEHICLES_URL, defaults.associated_vehicles_url),
            associate_url: text(ENV_ASSOCIATE_URL, defaults.associate_url),
            disassociate_url: text(ENV_DISASSOCIATE_URL, defaults.disassociate_url),
            timeout_ms: number(&lookup, ENV_TIMEOUT_MS, defaults.timeout_ms)?,
            pool_max_idle: number(&lookup, ENV_POOL_MAX_IDLE, defaults.pool_max_idle)?,
            pool_idle_timeout_ms: number(&lookup, ENV_POOL_IDLE_TIMEOUT_MS, defaults.pool_idle_timeout_ms)?,
            vehicle_owner_role: text(ENV_VEHICLE_OWNER_ROLE, defaults.vehicle_owner_role),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ProfileResult<()> {
        let bases = [
            (ENV_VP_URL, &self.vehicle_profile_url),
            (ENV_VP_CLIENT_ID_URL, &self.client_id_url),
            (ENV_ASSOCIATED_VEHICLES_URL, &self.associated_vehicles_url),
            (ENV_ASSOCIATE_URL, &self.associate_url),
            (ENV_DISASSOCIATE_URL, &self.disassociate_url),
        ];
        for (key, base) in bases {
            Url::parse(base).map_err(|e| ProfileError::Config(format!("{key}='{base}' is not a valid url: {e}")))?;
        }
        if self.timeout_ms == 0 {
            return Err(ProfileError::Config(format!("{ENV_TIMEOUT_MS} must be > 0")));
        }
        Ok(())
    }
}

fn number<F, T>(lookup: &F, key: &str, default: T) -> ProfileResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ProfileError::Config(format!("{key}='{raw}': {e}"))),
        _ => Ok(default),
    }
}
