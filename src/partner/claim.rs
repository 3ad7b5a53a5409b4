//! Service claim windows.
//!
//! A claim is valid strictly inside its window: `start < now < expire`.
//! A claim whose timestamps do not parse is treated as invalid.

use chrono::{DateTime, FixedOffset, Utc};

use crate::domain::{AuthorizedPartner, ServiceClaim};

/// `2020-03-01T16:00:00.666+0000`
pub const CLAIM_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

pub fn parse_claim_time(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(raw.trim(), CLAIM_TIME_FORMAT)
}

pub fn format_claim_time(at: DateTime<Utc>) -> String {
    at.format(CLAIM_TIME_FORMAT).to_string()
}

pub fn is_claim_valid(claim: &ServiceClaim, now: DateTime<Utc>) -> bool {
    let window = parse_claim_time(&claim.start).and_then(|start| Ok((start, parse_claim_time(&claim.expire)?)));
    match window {
        Ok((start, expire)) => now > start.with_timezone(&Utc) && now < expire.with_timezone(&Utc),
        Err(e) => {
            tracing::warn!(start = %claim.start, expire = %claim.expire, error = %e, "unparseable service claim window");
            false
        }
    }
}

/// Whether `partner` holds a currently valid claim for `service_id`.
pub fn has_valid_claim(partner: &AuthorizedPartner, service_id: &str, now: DateTime<Utc>) -> bool {
    match partner.service_claims.get(service_id) {
        Some(claim) => is_claim_valid(claim, now),
        None => false,
    }
}
