//! Vehicle profile client.
//!
//! Batch resolution fetches the profile document once and runs every
//! descriptor against it. Under `ErrorPolicy::Ignore` a failing descriptor is
//! recorded as absent and its siblings still resolve; under `Propagate` the
//! first failure aborts the batch and no partial map is returned.
//!
//! The client holds no per-call state, so one instance can serve concurrent
//! calls for different vehicles.

use std::sync::Arc;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::domain::{
    AssociatedVehicles, AttributeDescriptor, AttributeValue, ErrorPolicy, ResolvedAttributes, UserContext,
    VehicleProfile,
};
use crate::error::{FetchCause, ProfileError, ProfileResult};
use crate::extract::{ProfileDocument, evaluate, extract};
use crate::fetch::{Endpoints, ProfileFetcher};
use crate::registry::{VehicleAttribute, descriptors_for};
use crate::transport::{HttpTransport, Transport};

pub mod association;

/// User id reported when the profile has no owner.
pub const USER_ID_UNKNOWN: &str = "UNKNOWN";

const DATA_PATH: &str = "$.data";
const FIRST_DATA_PATH: &str = "$.data[0]";

pub struct VehicleProfileClient {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    config: ClientConfig,
}

impl VehicleProfileClient {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> ProfileResult<Self> {
        config.validate()?;
        let endpoints = Endpoints::from_config(&config)?;
        Ok(Self {
            transport,
            endpoints,
            config,
        })
    }

    /// Client over the pooled `reqwest` transport.
    pub fn from_config(config: ClientConfig) -> ProfileResult<Self> {
        let transport = HttpTransport::from_config(&config)?;
        Self::new(config, Arc::new(transport))
    }

    pub fn from_env() -> ProfileResult<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn fetcher(&self) -> ProfileFetcher<'_> {
        ProfileFetcher::new(self.transport.as_ref(), &self.endpoints)
    }

    /// Fetch the profile once and resolve `descriptors` against it.
    pub fn resolve_many(
        &self,
        vehicle_id: &str,
        policy: ErrorPolicy,
        descriptors: &[AttributeDescriptor],
    ) -> ProfileResult<ResolvedAttributes> {
        tracing::debug!(vehicle_id, attributes = ?names(descriptors), "fetching vehicle attributes");
        let raw = self.fetcher().fetch_by_vehicle_id(vehicle_id, policy)?;
        let resolved = resolve_document(&ProfileDocument::parse(&raw), policy, descriptors)?;
        tracing::debug!(vehicle_id, absent = resolved.absent_count(), total = resolved.len(), "fetched vehicle attributes");
        Ok(resolved)
    }

    /// `resolve_many` over registry attributes.
    pub fn resolve_attributes(
        &self,
        vehicle_id: &str,
        policy: ErrorPolicy,
        attributes: &[VehicleAttribute],
    ) -> ProfileResult<ResolvedAttributes> {
        self.resolve_many(vehicle_id, policy, &descriptors_for(attributes))
    }

    pub fn resolve_attribute(
        &self,
        vehicle_id: &str,
        attribute: VehicleAttribute,
        policy: ErrorPolicy,
    ) -> ProfileResult<Option<AttributeValue>> {
        let raw = self.fetcher().fetch_by_vehicle_id(vehicle_id, policy)?;
        let value = extract(&ProfileDocument::parse(&raw), attribute.descriptor(), policy)?;
        tracing::debug!(vehicle_id, %attribute, found = value.is_some(), "fetched vehicle attribute");
        Ok(value)
    }

    pub fn resolve_by_vin(
        &self,
        vin: &str,
        policy: ErrorPolicy,
        descriptors: &[AttributeDescriptor],
    ) -> ProfileResult<ResolvedAttributes> {
        tracing::debug!(vin, attributes = ?names(descriptors), "fetching vehicle attributes by vin");
        let raw = self.fetcher().fetch_by_vin(vin, policy)?;
        resolve_document(&ProfileDocument::parse(&raw), policy, descriptors)
    }

    /// Resolve against the first profile registered for an ECU client id.
    pub fn resolve_by_client_id(
        &self,
        client_id: &str,
        policy: ErrorPolicy,
        descriptors: &[AttributeDescriptor],
    ) -> ProfileResult<ResolvedAttributes> {
        tracing::debug!(client_id, attributes = ?names(descriptors), "fetching vehicle attributes by client id");
        let raw = match self.fetcher().fetch_by_client_id(client_id) {
            Ok(raw) => raw,
            Err(err) if policy.ignores() => {
                tracing::debug!(client_id, error = %err, "client id lookup failed, continuing with empty document");
                String::new()
            }
            Err(err) => return Err(err),
        };
        resolve_document(&ProfileDocument::first_of_list(&raw), policy, descriptors)
    }

    /// The profile's `data` object re-serialised; `None` when it is `null`.
    pub fn vehicle_profile_json(&self, vehicle_id: &str) -> ProfileResult<Option<String>> {
        let raw = self.fetcher().fetch_by_vehicle_id(vehicle_id, ErrorPolicy::Propagate)?;
        let data = select_required(&ProfileDocument::parse(&raw), DATA_PATH)?;
        Ok(non_null(data).map(|v| v.to_string()))
    }

    /// `data[0]` of the client-id lookup, re-serialised.
    pub fn vehicle_profile_json_by_client_id(&self, client_id: &str) -> ProfileResult<Option<String>> {
        let raw = self.fetcher().fetch_by_client_id(client_id)?;
        let first = select_required(&ProfileDocument::parse(&raw), FIRST_DATA_PATH)?;
        Ok(non_null(first).map(|v| v.to_string()))
    }

    /// Typed full-profile decode.
    pub fn vehicle_profile(&self, vehicle_id: &str) -> ProfileResult<Option<VehicleProfile>> {
        let raw = self.fetcher().fetch_by_vehicle_id(vehicle_id, ErrorPolicy::Propagate)?;
        let Some(data) = non_null(select_required(&ProfileDocument::parse(&raw), DATA_PATH)?) else {
            return Ok(None);
        };
        serde_json::from_value(data)
            .map(Some)
            .map_err(|cause| ProfileError::ProfileDecode {
                target: vehicle_id.to_string(),
                cause,
            })
    }

    /// `PATCH <vehicleProfileBase>/<vehicleId>` with the full profile; returns the raw response body.
    pub fn update_vehicle_profile(
        &self,
        vehicle_id: &str,
        profile: &VehicleProfile,
        policy: ErrorPolicy,
    ) -> ProfileResult<String> {
        tracing::debug!(vehicle_id, "updating vehicle profile");
        let url = self.endpoints.vehicle_profile.with_segment(vehicle_id)?;
        let body = serde_json::to_value(profile).map_err(|cause| ProfileError::ProfileDecode {
            target: vehicle_id.to_string(),
            cause,
        })?;

        let outcome = match self.transport.patch_json(url.as_str(), &body) {
            Ok(resp) if resp.is_success() => Ok(resp.body),
            Ok(resp) => Err(FetchCause::Status(resp.status)),
            Err(e) => Err(FetchCause::Transport(e)),
        };
        match outcome {
            Ok(body) => {
                tracing::trace!(vehicle_id, body = %body, "vehicle profile update response");
                Ok(body)
            }
            Err(cause) if policy.ignores() => {
                tracing::debug!(vehicle_id, %cause, "vehicle profile update failed, ignoring");
                Ok(String::new())
            }
            Err(cause) => Err(ProfileError::fetch(vehicle_id, cause)),
        }
    }

    pub fn associated_vehicles(&self, user_id: &str) -> ProfileResult<AssociatedVehicles> {
        tracing::debug!(user_id, "fetching associated vehicles");
        let raw = self.fetcher().fetch_associated_vehicles(user_id)?;
        if raw.trim().is_empty() {
            return Ok(AssociatedVehicles::default());
        }
        serde_json::from_str(&raw).map_err(|cause| ProfileError::ProfileDecode {
            target: user_id.to_string(),
            cause,
        })
    }

    /// Ids of every vehicle associated with `user_id`.
    pub fn associated_vehicle_ids(&self, user_id: &str) -> ProfileResult<Vec<String>> {
        let vehicles = self.associated_vehicles(user_id)?;
        Ok(vehicles.data.into_iter().map(|v| v.vehicle_id).collect())
    }

    /// Whether the selection at `path` (relative to the `data` object) mentions `service_id`.
    ///
    /// Any failure along the way counts as "not provisioned".
    pub fn is_service_provisioned(&self, vehicle_id: &str, service_id: &str, path: &str) -> bool {
        let json = match self.vehicle_profile_json(vehicle_id) {
            Ok(Some(json)) => json,
            Ok(None) => return false,
            Err(err) => {
                tracing::warn!(vehicle_id, error = %err, "could not fetch vehicle profile for provisioning check");
                return false;
            }
        };
        let selected = serde_json::from_str::<Value>(&json)
            .map_err(|e| e.to_string())
            .and_then(|root| evaluate(&root, path));
        match selected {
            Ok(value) => value.to_string().contains(service_id),
            Err(cause) => {
                tracing::debug!(vehicle_id, path, %cause, "provisioning path did not resolve");
                false
            }
        }
    }

    /// The profile owner as a user context; unknown owners map to `USER_ID_UNKNOWN`.
    pub fn user_context(&self, vehicle_id: &str) -> ProfileResult<Vec<UserContext>> {
        let user_id = self
            .resolve_attribute(vehicle_id, VehicleAttribute::UserId, ErrorPolicy::Ignore)?
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| {
                tracing::debug!(vehicle_id, "no user id in vehicle profile, using {USER_ID_UNKNOWN}");
                USER_ID_UNKNOWN.to_string()
            });
        Ok(vec![UserContext {
            user_id,
            role: self.config.vehicle_owner_role.clone(),
        }])
    }
}

/// Run every descriptor against an already fetched document, in order.
pub fn resolve_document(
    document: &ProfileDocument,
    policy: ErrorPolicy,
    descriptors: &[AttributeDescriptor],
) -> ProfileResult<ResolvedAttributes> {
    let mut resolved = ResolvedAttributes::new();
    for descriptor in descriptors {
        let value = extract(document, descriptor, policy)?;
        resolved.insert(descriptor.name.clone(), value);
    }
    Ok(resolved)
}

fn select_required(document: &ProfileDocument, path: &str) -> ProfileResult<Value> {
    document.select(path).map_err(|cause| ProfileError::AttributeResolution {
        attribute: "data".to_string(),
        path: path.to_string(),
        cause,
    })
}

fn non_null(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        other => Some(other),
    }
}

fn names(descriptors: &[AttributeDescriptor]) -> Vec<&str> {
    descriptors.iter().map(|d| d.name.as_str()).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::ValueKind;
    use crate::error::ErrorKind;
    use crate::transport::scripted::ScriptedTransport;
    use serde_json::json;

    pub(crate) fn client_with(transport: Arc<ScriptedTransport>) -> VehicleProfileClient {
        let config = ClientConfig {
            vehicle_profile_url: "http://vp/v1.0/vehicleProfiles".into(),
            client_id_url: "http://vp/v1.0/vehicles".into(),
            associated_vehicles_url: "http://vp/v1.0/users/vehicles".into(),
            associate_url: "http://vp/v1.0/associate".into(),
            disassociate_url: "http://vp/v1.0/disassociate".into(),
            ..ClientConfig::default()
        };
        VehicleProfileClient::new(config, transport).unwrap()
    }

    const MAKE_MODEL: &str = r#"{"data":{"vehicleAttributes":{"make":"brandName","model":"modelName"}}}"#;

    #[test]
    fn resolves_make_and_model() {
        let transport = Arc::new(ScriptedTransport::new().reply(200, MAKE_MODEL));
        let client = client_with(transport.clone());

        let resolved = client
            .resolve_attributes(
                "VIN001",
                ErrorPolicy::Propagate,
                &[VehicleAttribute::Make, VehicleAttribute::Model],
            )
            .unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved.get_str("make"), Some("brandName"));
        assert_eq!(resolved.get_str("model"), Some("modelName"));
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VehicleProfileClient>();
    }

    #[test]
    fn concurrent_batches_for_different_vehicles() {
        let vehicles = ["v1", "v2", "v3", "v4"];
        let mut transport = ScriptedTransport::new();
        for id in vehicles {
            let body = json!({"data": {"vin": format!("VIN-{id}"), "vehicleAttributes": {"make": format!("make-{id}")}}});
            transport = transport.route(&format!("http://vp/v1.0/vehicleProfiles/{id}"), 200, &body.to_string());
        }
        let transport = Arc::new(transport);
        let client = client_with(transport.clone());
        let attributes = [VehicleAttribute::Vin, VehicleAttribute::Make];

        std::thread::scope(|scope| {
            let handles: Vec<_> = vehicles
                .iter()
                .map(|id| {
                    let client = &client;
                    let attributes = &attributes;
                    scope.spawn(move || {
                        (0..10)
                            .map(|_| client.resolve_attributes(id, ErrorPolicy::Propagate, attributes).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            for (id, handle) in vehicles.iter().zip(handles) {
                for resolved in handle.join().unwrap() {
                    assert_eq!(resolved.len(), 2);
                    assert_eq!(resolved.get_str("vin"), Some(format!("VIN-{id}").as_str()));
                    assert_eq!(resolved.get_str("make"), Some(format!("make-{id}").as_str()));
                }
            }
        });
        assert_eq!(transport.requests().len(), vehicles.len() * 10);
    }

    #[test]
    fn fetches_once_for_many_descriptors() {
        let transport = Arc::new(ScriptedTransport::new().reply(200, MAKE_MODEL));
        let client = client_with(transport.clone());

        let resolved = client
            .resolve_attributes("VIN001", ErrorPolicy::Ignore, &VehicleAttribute::ALL)
            .unwrap();
        assert_eq!(resolved.len(), VehicleAttribute::ALL.len());
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn broken_descriptor_is_isolated_under_ignore() {
        let transport = Arc::new(ScriptedTransport::new().reply(200, MAKE_MODEL));
        let client = client_with(transport);

        let descriptors = vec![
            VehicleAttribute::Make.descriptor().clone(),
            AttributeDescriptor::new("broken", "$.data.vehicleAttributes.make", ValueKind::StringSet),
            VehicleAttribute::Model.descriptor().clone(),
        ];
        let resolved = client.resolve_many("VIN001", ErrorPolicy::Ignore, &descriptors).unwrap();
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved.absent_count(), 1);
        assert!(resolved.contains("broken"));
        assert!(resolved.get("broken").is_none());
        assert_eq!(resolved.get_str("make"), Some("brandName"));
        assert_eq!(resolved.get_str("model"), Some("modelName"));
    }

    #[test]
    fn first_failure_aborts_under_propagate() {
        let transport = Arc::new(ScriptedTransport::new().reply(200, r#"{"data":{}}"#));
        let client = client_with(transport);

        let err = client
            .resolve_attributes("VIN001", ErrorPolicy::Propagate, &[VehicleAttribute::BlockEnrollment])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AttributeResolution);
    }

    #[test]
    fn fetch_failure_degrades_to_all_absent_under_ignore() {
        let transport = Arc::new(ScriptedTransport::new().reply(503, "").reply(503, ""));
        let client = client_with(transport);

        let resolved = client
            .resolve_attributes("VIN001", ErrorPolicy::Ignore, &[VehicleAttribute::Make, VehicleAttribute::Vin])
            .unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved.absent_count(), 2);

        let err = client
            .resolve_attributes("VIN001", ErrorPolicy::Propagate, &[VehicleAttribute::Make])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProfileFetch);
    }

    #[test]
    fn single_attribute_lookup() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply(200, r#"{"data":{"modemInfo":{"msisdn":"12345"}}}"#)
                .reply(500, ""),
        );
        let client = client_with(transport);

        let msisdn = client
            .resolve_attribute("VIN001", VehicleAttribute::Msisdn, ErrorPolicy::Propagate)
            .unwrap();
        assert_eq!(msisdn, Some(AttributeValue::String("12345".into())));

        let missing = client
            .resolve_attribute("VIN001", VehicleAttribute::Msisdn, ErrorPolicy::Ignore)
            .unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn resolves_by_vin() {
        let transport = Arc::new(
            ScriptedTransport::new().reply(200, r#"{"data":{"vehicleAttributes":{"modelYear":"2022"}}}"#),
        );
        let client = client_with(transport.clone());

        let resolved = client
            .resolve_by_vin("VIN001", ErrorPolicy::Propagate, &descriptors_for(&[VehicleAttribute::ModelYear]))
            .unwrap();
        assert_eq!(resolved.get_str("modelYear"), Some("2022"));
        assert_eq!(transport.requests()[0].url, "http://vp/v1.0/vehicleProfiles?vin=VIN001");
    }

    #[test]
    fn resolves_by_client_id_from_first_element() {
        let body = r#"{"data":[{"vehicleAttributes":{"make":"ABCD"},"custom":"ABCD_VALUE"},{"vehicleAttributes":{"make":"OTHER"}}]}"#;
        let transport = Arc::new(ScriptedTransport::new().reply(200, body));
        let client = client_with(transport);

        let descriptors = vec![
            VehicleAttribute::Make.descriptor().clone(),
            AttributeDescriptor::new("custom", "$.data.custom", ValueKind::String),
        ];
        let resolved = client
            .resolve_by_client_id("hu-client", ErrorPolicy::Propagate, &descriptors)
            .unwrap();
        assert_eq!(resolved.get_str("make"), Some("ABCD"));
        assert_eq!(resolved.get_str("custom"), Some("ABCD_VALUE"));
    }

    #[test]
    fn client_id_failures_follow_policy() {
        let transport = Arc::new(ScriptedTransport::new().reply(500, "").reply(200, r#"{"data":[]}"#));
        let client = client_with(transport);
        let descriptors = descriptors_for(&[VehicleAttribute::Make]);

        let resolved = client
            .resolve_by_client_id("hu-client", ErrorPolicy::Ignore, &descriptors)
            .unwrap();
        assert!(resolved.get("make").is_none());

        let err = client
            .resolve_by_client_id("hu-client", ErrorPolicy::Propagate, &descriptors)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AttributeResolution);
    }

    #[test]
    fn decodes_full_profile() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply(200, r#"{"data":{"vin":"test-vin","blockEnrollment":true}}"#)
                .reply(200, r#"{"data":null}"#)
                .reply(200, r#"{"data":{"vin":42}}"#),
        );
        let client = client_with(transport);

        let profile = client.vehicle_profile("v1").unwrap().unwrap();
        assert_eq!(profile.vin.as_deref(), Some("test-vin"));
        assert_eq!(profile.block_enrollment, Some(true));

        assert!(client.vehicle_profile("v1").unwrap().is_none());

        let err = client.vehicle_profile("v1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProfileDecode);
    }

    #[test]
    fn profile_json_requires_data() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply(200, r#"{"data":{"vin":"v"}}"#)
                .reply(200, r#"{"message":"no data"}"#),
        );
        let client = client_with(transport);

        let json = client.vehicle_profile_json("v1").unwrap().unwrap();
        assert_eq!(serde_json::from_str::<Value>(&json).unwrap(), json!({"vin": "v"}));
        assert!(client.vehicle_profile_json("v1").is_err());
    }

    #[test]
    fn profile_json_by_client_id() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply(200, r#"{"data":[{"vin":"first"},{"vin":"second"}]}"#)
                .reply(404, ""),
        );
        let client = client_with(transport);

        let json = client.vehicle_profile_json_by_client_id("hu").unwrap().unwrap();
        assert!(json.contains("first"));
        assert!(client.vehicle_profile_json_by_client_id("hu").is_err());
    }

    #[test]
    fn update_patches_full_profile() {
        let transport = Arc::new(ScriptedTransport::new().reply(200, "updated").fail("timeout").fail("timeout"));
        let client = client_with(transport.clone());
        let profile = VehicleProfile {
            vin: Some("test-vin".into()),
            ..VehicleProfile::default()
        };

        assert_eq!(
            client.update_vehicle_profile("v1", &profile, ErrorPolicy::Propagate).unwrap(),
            "updated"
        );
        let req = &transport.requests()[0];
        assert_eq!(req.method, "PATCH");
        assert_eq!(req.url, "http://vp/v1.0/vehicleProfiles/v1");
        assert_eq!(req.body, Some(json!({"vin": "test-vin"})));

        assert_eq!(client.update_vehicle_profile("v1", &profile, ErrorPolicy::Ignore).unwrap(), "");
        let err = client
            .update_vehicle_profile("v1", &profile, ErrorPolicy::Propagate)
            .unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn lists_associated_vehicles() {
        let body = r#"{"message":"SUCCESS","data":[
            {"vehicleId":"v1","role":"VO","status":"ASSOCIATED"},
            {"vehicleId":"v2","role":"VO"}
        ]}"#;
        let transport = Arc::new(ScriptedTransport::new().reply(200, body).reply(200, "").reply(500, ""));
        let client = client_with(transport.clone());

        assert_eq!(client.associated_vehicle_ids("u1").unwrap(), vec!["v1", "v2"]);
        assert_eq!(transport.requests()[0].url, "http://vp/v1.0/users/vehicles?userId=u1");
        assert!(client.associated_vehicle_ids("u1").unwrap().is_empty());
        assert_eq!(client.associated_vehicles("u1").unwrap_err().kind(), ErrorKind::ProfileFetch);
    }

    #[test]
    fn service_provisioning_check() {
        let body = r#"{"data":{"ecus":{"hu":{"provisionedServices":{"services":[{"serviceId":"RO"}]}}}}}"#;
        let transport = Arc::new(ScriptedTransport::new().reply(200, body).reply(200, body).reply(500, ""));
        let client = client_with(transport);

        assert!(client.is_service_provisioned("v1", "RO", "$.ecus"));
        assert!(!client.is_service_provisioned("v1", "RF", "$.ecus"));
        assert!(!client.is_service_provisioned("v1", "RO", "$.ecus"));
    }

    #[test]
    fn user_context_falls_back_to_unknown() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply(200, r#"{"data":{"authorizedUsers":[{"userId":"owner-1"}]}}"#)
                .reply(200, r#"{"data":{"authorizedUsers":[{"userId":""}]}}"#)
                .reply(500, ""),
        );
        let client = client_with(transport);

        let ctx = client.user_context("v1").unwrap();
        assert_eq!(ctx, vec![UserContext { user_id: "owner-1".into(), role: "VO".into() }]);
        assert_eq!(client.user_context("v1").unwrap()[0].user_id, USER_ID_UNKNOWN);
        assert_eq!(client.user_context("v1").unwrap()[0].user_id, USER_ID_UNKNOWN);
    }
}
