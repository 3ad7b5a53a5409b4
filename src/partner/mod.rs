//! Partner qualification for outbound events.
//!
//! For an event, the vehicle's `authorizedPartners` are filtered down to those
//! holding a currently valid claim for one of the event's service ids. Each
//! qualifying partner gets an outbound detail with qualifier
//! `QUALIFIER_<eventId>_<partnerId>`.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::client::VehicleProfileClient;
use crate::domain::{AuthorizedPartner, AuthorizedPartnerDetail, ErrorPolicy, OutboundDetail, ResolvedAttributes};
use crate::error::ProfileResult;
use crate::registry::VehicleAttribute;

pub mod claim;

pub use claim::{CLAIM_TIME_FORMAT, format_claim_time, has_valid_claim, is_claim_valid, parse_claim_time};

const PARTNER_ATTRIBUTES: [VehicleAttribute; 3] = [
    VehicleAttribute::BlockEnrollment,
    VehicleAttribute::AuthorizedPartners,
    VehicleAttribute::SoldRegion,
];

pub fn qualifier(event_id: &str, partner_id: &str) -> String {
    format!("QUALIFIER_{event_id}_{partner_id}")
}

pub struct PartnerResolver<'a> {
    client: &'a VehicleProfileClient,
}

impl<'a> PartnerResolver<'a> {
    pub fn new(client: &'a VehicleProfileClient) -> Self {
        Self { client }
    }

    pub fn resolve_partner_detail(
        &self,
        vehicle_id: &str,
        event_id: &str,
        service_ids: &[String],
    ) -> ProfileResult<AuthorizedPartnerDetail> {
        self.resolve_partner_detail_at(vehicle_id, event_id, service_ids, Utc::now())
    }

    /// Same as `resolve_partner_detail`, evaluated at `now`.
    ///
    /// Profile lookups run under `ErrorPolicy::Ignore`: a missing or broken
    /// profile yields outbound-required with no partners.
    pub fn resolve_partner_detail_at(
        &self,
        vehicle_id: &str,
        event_id: &str,
        service_ids: &[String],
        now: DateTime<Utc>,
    ) -> ProfileResult<AuthorizedPartnerDetail> {
        let resolved = self
            .client
            .resolve_attributes(vehicle_id, ErrorPolicy::Ignore, &PARTNER_ATTRIBUTES)?;
        let detail = build_partner_detail(&resolved, event_id, service_ids, now);
        tracing::debug!(
            vehicle_id,
            event_id,
            outbound_required = detail.channel_outbound_required,
            partners = detail.outbound_details.len(),
            "resolved authorized partners"
        );
        Ok(detail)
    }
}

/// Build the detail from already resolved partner attributes.
pub fn build_partner_detail(
    resolved: &ResolvedAttributes,
    event_id: &str,
    service_ids: &[String],
    now: DateTime<Utc>,
) -> AuthorizedPartnerDetail {
    let blocked = resolved
        .get_bool(VehicleAttribute::BlockEnrollment.name())
        .unwrap_or(false);
    let sold_region = resolved
        .get_str(VehicleAttribute::SoldRegion.name())
        .map(str::to_string);

    let partners = resolved
        .get(VehicleAttribute::AuthorizedPartners.name())
        .and_then(|v| v.as_json())
        .map(decode_partners)
        .unwrap_or_default();

    let outbound_details = partners
        .iter()
        .filter(|partner| service_ids.iter().any(|id| has_valid_claim(partner, id, now)))
        .map(|partner| OutboundDetail {
            partner_id: partner.partner_id.clone(),
            qualifier: qualifier(event_id, &partner.partner_id),
        })
        .collect();

    AuthorizedPartnerDetail {
        channel_outbound_required: !blocked,
        sold_region,
        outbound_details,
    }
}

/// Decode the `authorizedPartners` object in document order. A shape error
/// drops every partner.
fn decode_partners(value: &Value) -> Vec<AuthorizedPartner> {
    let Value::Object(entries) = value else {
        tracing::error!(found = %value, "authorizedPartners is not an object");
        return Vec::new();
    };
    let decoded = entries
        .values()
        .map(|entry| serde_json::from_value::<AuthorizedPartner>(entry.clone()))
        .collect::<Result<Vec<_>, _>>();
    match decoded {
        Ok(partners) => partners,
        Err(e) => {
            tracing::error!(error = %e, "could not decode authorizedPartners");
            Vec::new()
        }
    }
}
