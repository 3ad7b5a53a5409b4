//! Endpoint URL construction.
//!
//! A configured base is either a plain prefix (`http://vp/v1.0/vehicleProfiles`,
//! the id is appended as a path segment or query parameter) or a URI template
//! carrying a `{vehicleId}` / `{userId}` / `{clientId}` placeholder that is
//! filled in place.

use url::Url;

use crate::config::ClientConfig;
use crate::error::{ProfileError, ProfileResult};

#[derive(Debug, Clone)]
pub struct Endpoint {
    raw: String,
    placeholder: &'static str,
    base: Url,
}

impl Endpoint {
    pub fn parse(raw: &str, placeholder: &'static str) -> ProfileResult<Self> {
        let probe = raw.replace(placeholder, "x");
        let base = Url::parse(&probe).map_err(|e| ProfileError::Config(format!("invalid endpoint '{raw}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ProfileError::Config(format!("endpoint '{raw}' cannot take a path")));
        }
        Ok(Self {
            raw: raw.to_string(),
            placeholder,
            base,
        })
    }

    pub fn is_template(&self) -> bool {
        self.raw.contains(self.placeholder)
    }

    /// `<base>/<value>`, or the template filled with `value`.
    pub fn with_segment(&self, value: &str) -> ProfileResult<Url> {
        if self.is_template() {
            return self.fill(value);
        }
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(value);
        }
        Ok(url)
    }

    /// `<base>?<key>=<value>`, or the template filled with `value`.
    pub fn with_query(&self, key: &str, value: &str) -> ProfileResult<Url> {
        if self.is_template() {
            return self.fill(value);
        }
        let mut url = self.base.clone();
        url.query_pairs_mut().append_pair(key, value);
        Ok(url)
    }

    fn fill(&self, value: &str) -> ProfileResult<Url> {
        let filled = self.raw.replace(self.placeholder, &encode_component(value));
        Url::parse(&filled).map_err(|e| ProfileError::Config(format!("invalid endpoint '{filled}': {e}")))
    }
}

/// Percent-encode for use inside a path segment or query value.
fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// All remote endpoints, validated once.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub vehicle_profile: Endpoint,
    pub client_id: Endpoint,
    pub associated_vehicles: Endpoint,
    pub associate: Endpoint,
    pub disassociate: Endpoint,
}

impl Endpoints {
    pub fn from_config(config: &ClientConfig) -> ProfileResult<Self> {
        Ok(Self {
            vehicle_profile: Endpoint::parse(&config.vehicle_profile_url, "{vehicleId}")?,
            client_id: Endpoint::parse(&config.client_id_url, "{clientId}")?,
            associated_vehicles: Endpoint::parse(&config.associated_vehicles_url, "{userId}")?,
            associate: Endpoint::parse(&config.associate_url, "{vehicleId}")?,
            disassociate: Endpoint::parse(&config.disassociate_url, "{vehicleId}")?,
        })
    }
}
