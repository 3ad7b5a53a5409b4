//! Profile fetching.
//!
//! One GET per call, no retries. A transport failure or non-2xx status is
//! either raised as `ProfileFetch` or, under `ErrorPolicy::Ignore`, degraded to
//! an empty body (which then resolves every attribute as absent).

use url::Url;

use crate::domain::ErrorPolicy;
use crate::error::{FetchCause, ProfileError, ProfileResult};
use crate::transport::Transport;

pub mod endpoints;

pub use endpoints::{Endpoint, Endpoints};

/// Raw document body; empty when a failure was suppressed.
pub type RawDocument = String;

pub struct ProfileFetcher<'a> {
    transport: &'a dyn Transport,
    endpoints: &'a Endpoints,
}

impl<'a> ProfileFetcher<'a> {
    pub fn new(transport: &'a dyn Transport, endpoints: &'a Endpoints) -> Self {
        Self { transport, endpoints }
    }

    /// `GET <vehicleProfileBase>/<vehicleId>` → `{"data": {...}}`.
    pub fn fetch_by_vehicle_id(&self, vehicle_id: &str, policy: ErrorPolicy) -> ProfileResult<RawDocument> {
        let url = self.endpoints.vehicle_profile.with_segment(vehicle_id)?;
        self.get(vehicle_id, url, policy)
    }

    /// `GET <vehicleProfileBase>?vin=<vin>` → `{"data": {...}}`.
    pub fn fetch_by_vin(&self, vin: &str, policy: ErrorPolicy) -> ProfileResult<RawDocument> {
        let url = self.endpoints.vehicle_profile.with_query("vin", vin)?;
        self.get(vin, url, policy)
    }

    /// `GET <clientIdBase>?clientId=<id>` → `{"data": [{...}, ...]}`.
    ///
    /// The body is list-wrapped; slice `data[0]` (see
    /// `ProfileDocument::first_of_list`) before extracting attributes.
    pub fn fetch_by_client_id(&self, client_id: &str) -> ProfileResult<RawDocument> {
        let url = self.endpoints.client_id.with_query("clientId", client_id)?;
        self.get(client_id, url, ErrorPolicy::Propagate)
    }

    /// `GET <associatedVehiclesBase>?userId=<id>`; always propagates.
    pub fn fetch_associated_vehicles(&self, user_id: &str) -> ProfileResult<RawDocument> {
        let url = self.endpoints.associated_vehicles.with_query("userId", user_id)?;
        self.get(user_id, url, ErrorPolicy::Propagate)
    }

    fn get(&self, target: &str, url: Url, policy: ErrorPolicy) -> ProfileResult<RawDocument> {
        tracing::debug!(target_id = target, url = %url, "fetching vehicle profile");
        let outcome = match self.transport.get(url.as_str()) {
            Ok(resp) if resp.is_success() => Ok(resp.body),
            Ok(resp) => Err(FetchCause::Status(resp.status)),
            Err(e) => Err(FetchCause::Transport(e)),
        };

        match outcome {
            Ok(body) => {
                tracing::trace!(target_id = target, body = %body, "vehicle profile response");
                Ok(body)
            }
            Err(cause) if policy.ignores() => {
                tracing::debug!(target_id = target, %cause, "vehicle profile fetch failed, continuing with empty document");
                Ok(String::new())
            }
            Err(cause) => Err(ProfileError::fetch(target, cause)),
        }
    }
}
