//! Full vehicle profile document.
//!
//! Only the fields this crate reads are typed; everything else is kept in
//! `extra` so a decoded profile can be sent back in a PATCH without dropping
//! unknown keys. Typed fields that are `None`, including ones that were an
//! explicit `null` in the source document, are omitted on serialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::partner::AuthorizedPartner;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_attributes: Option<VehicleAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized_users: Option<Vec<AuthorizedUser>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modem_info: Option<ModemInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_arch_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecus: Option<BTreeMap<String, Ecu>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dummy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_params: Option<BTreeMap<String, BTreeMap<String, String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eol_validation_in_progress: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_enrollment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized_partners: Option<BTreeMap<String, AuthorizedPartner>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epiddb_checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_platform: Option<String>,

    /// Fields not modelled above (timestamps, capabilities, events, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_country: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModemInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msisdn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imei: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imsi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iccid: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One electronic control unit entry under `ecus` (keyed by ecu name, e.g. `hu`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ecu {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecu_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioned_services: Option<ProvisionedServices>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedServices {
    #[serde(default)]
    pub services: Vec<ProvisionedService>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedService {
    pub service_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of the associated-vehicles endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociatedVehicles {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Vec<AssociatedVehicle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociatedVehicle {
    pub vehicle_id: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_on: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_change_timestamp: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_keeps_unmodelled_fields() {
        let doc = json!({
            "vin": "test-vin",
            "createdOn": 1700000000000u64,
            "vehicleAttributes": {"make": "brandName", "bodyType": "SUV"},
            "ecus": {"hu": {"clientId": "hu-1", "provisionedServices": {"services": [{"serviceId": "RO"}]}}}
        });

        let profile: VehicleProfile = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(profile.vin.as_deref(), Some("test-vin"));
        assert_eq!(profile.extra.get("createdOn"), Some(&json!(1700000000000u64)));
        let attrs = profile.vehicle_attributes.as_ref().unwrap();
        assert_eq!(attrs.make.as_deref(), Some("brandName"));
        assert_eq!(attrs.extra.get("bodyType"), Some(&json!("SUV")));
        let hu = &profile.ecus.as_ref().unwrap()["hu"];
        assert_eq!(hu.provisioned_services.as_ref().unwrap().services[0].service_id, "RO");

        // Nothing is dropped or invented when the profile is written back.
        assert_eq!(serde_json::to_value(&profile).unwrap(), doc);
    }

    #[test]
    fn nested_unmodelled_fields_survive_and_typed_nulls_are_omitted() {
        let doc = json!({
            "ecus": {"hu": {"provisionedServices": {"services": [{"serviceId": "RO"}], "updatedOn": 5}}},
            "soldRegion": null,
            "legacy": null
        });

        let profile: VehicleProfile = serde_json::from_value(doc).unwrap();
        assert!(profile.sold_region.is_none());
        let out = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            out,
            json!({
                "ecus": {"hu": {"provisionedServices": {"services": [{"serviceId": "RO"}], "updatedOn": 5}}},
                "legacy": null
            })
        );
    }

    #[test]
    fn associated_vehicles_tolerate_missing_fields() {
        let body = r#"{"message":"SUCCESS","data":[{"vehicleId":"v1","role":"VO"},{"vehicleId":"v2"}]}"#;
        let parsed: AssociatedVehicles = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.message.as_deref(), Some("SUCCESS"));
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[1].vehicle_id, "v2");
        assert!(parsed.data[1].role.is_none());
    }
}
