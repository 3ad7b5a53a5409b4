//! Plain-text formatting for terminal output.

use crate::domain::{AssociatedVehicles, AuthorizedPartnerDetail, ResolvedAttributes, UserContext};

const ABSENT: &str = "-";

/// One `name  value` line per attribute, in `names` order.
pub fn format_attributes(names: &[&str], resolved: &ResolvedAttributes) -> String {
    let width = names.iter().map(|n| n.len()).max().unwrap_or(0);
    let mut out = String::new();
    for name in names {
        let value = resolved
            .get(name)
            .map(|v| v.to_string())
            .unwrap_or_else(|| ABSENT.to_string());
        out.push_str(&format!("{name:<width$}  {value}\n"));
    }
    out
}

pub fn format_associated(vehicles: &AssociatedVehicles) -> String {
    if vehicles.data.is_empty() {
        return "No associated vehicles.\n".to_string();
    }
    let mut out = format!("{:<24} {:<8} {}\n", "VEHICLE", "ROLE", "STATUS");
    for v in &vehicles.data {
        out.push_str(&format!(
            "{:<24} {:<8} {}\n",
            v.vehicle_id,
            v.role.as_deref().unwrap_or(ABSENT),
            v.status.as_deref().unwrap_or(ABSENT),
        ));
    }
    out
}

pub fn format_partner_detail(detail: &AuthorizedPartnerDetail) -> String {
    let mut out = String::new();
    out.push_str(&format!("Outbound required: {}\n", detail.channel_outbound_required));
    out.push_str(&format!(
        "Sold region: {}\n",
        detail.sold_region.as_deref().unwrap_or(ABSENT)
    ));
    if detail.outbound_details.is_empty() {
        out.push_str("Partners: none\n");
    } else {
        out.push_str("Partners:\n");
        for d in &detail.outbound_details {
            out.push_str(&format!("  {}  {}\n", d.partner_id, d.qualifier));
        }
    }
    out
}

pub fn format_user_contexts(contexts: &[UserContext]) -> String {
    contexts
        .iter()
        .map(|c| format!("{} ({})\n", c.user_id, c.role))
        .collect()
}
