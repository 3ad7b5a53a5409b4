//! Partner authorization and user context shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A partner's time-bounded authorization for one service id.
///
/// Timestamps use the profile format `yyyy-MM-dd'T'HH:mm:ss.SSSxx`,
/// e.g. `2020-03-01T16:00:00.666+0000`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceClaim {
    pub start: String,
    pub expire: String,
}

impl ServiceClaim {
    pub fn new(start: impl Into<String>, expire: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            expire: expire.into(),
        }
    }
}

/// One entry of the profile's `authorizedPartners` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedPartner {
    pub partner_id: String,
    /// Service id to claim.
    #[serde(default)]
    pub service_claims: BTreeMap<String, ServiceClaim>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundDetail {
    pub partner_id: String,
    pub qualifier: String,
}

/// Qualified partner details for one event; built per call, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedPartnerDetail {
    pub channel_outbound_required: bool,
    pub sold_region: Option<String>,
    pub outbound_details: Vec<OutboundDetail>,
}

/// User on whose behalf a vehicle event is processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub user_id: String,
    pub role: String,
}
