//! User/vehicle association.
//!
//! The remote reports success as `{"data": true}`. A call succeeds only on a
//! 2xx status whose body carries `data == true`; anything else is a failure.

use serde_json::{Map, Value, json};

use super::VehicleProfileClient;
use crate::error::{ProfileError, ProfileResult};

impl VehicleProfileClient {
    /// `POST <associateBase>/<vehicleId>` with `{"userId", "status"?}`.
    pub fn associate(&self, user_id: &str, vehicle_id: &str, status: Option<&str>) -> ProfileResult<bool> {
        let url = self.endpoints.associate.with_segment(vehicle_id)?;
        let mut body = Map::new();
        body.insert("userId".to_string(), json!(user_id));
        if let Some(status) = status {
            body.insert("status".to_string(), json!(status));
        }

        match self.post_state_change(url.as_str(), &Value::Object(body)) {
            Ok(()) => {
                tracing::info!(user_id, vehicle_id, "associated vehicle with user");
                Ok(true)
            }
            Err(reason) => {
                tracing::error!(user_id, vehicle_id, %reason, "vehicle association failed");
                Err(ProfileError::AssociationFailed {
                    vehicle_id: vehicle_id.to_string(),
                    user_id: user_id.to_string(),
                    reason,
                })
            }
        }
    }

    /// `POST <disassociateBase>/<vehicleId>` with `{"userId"}`.
    pub fn disassociate(&self, user_id: &str, vehicle_id: &str) -> ProfileResult<bool> {
        let url = self.endpoints.disassociate.with_segment(vehicle_id)?;

        match self.post_state_change(url.as_str(), &json!({ "userId": user_id })) {
            Ok(()) => {
                tracing::info!(user_id, vehicle_id, "disassociated vehicle from user");
                Ok(true)
            }
            Err(reason) => {
                tracing::error!(user_id, vehicle_id, %reason, "vehicle disassociation failed");
                Err(ProfileError::DisassociationFailed {
                    vehicle_id: vehicle_id.to_string(),
                    user_id: user_id.to_string(),
                    reason,
                })
            }
        }
    }

    fn post_state_change(&self, url: &str, body: &Value) -> Result<(), String> {
        let resp = self.transport.post_json(url, body).map_err(|e| e.to_string())?;
        let confirmed = data_flag(&resp.body);
        if resp.is_success() && confirmed == Some(true) {
            return Ok(());
        }
        Err(match confirmed {
            Some(flag) => format!("http status {}, data={flag}", resp.status),
            None => format!("http status {}, no boolean data in response", resp.status),
        })
    }
}

fn data_flag(body: &str) -> Option<bool> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("data")
        .and_then(Value::as_bool)
}
