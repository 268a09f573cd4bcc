//! # Custom Field Mapping
//!
//! Static enumeration-to-identifier lookup tables mapping payload fields onto
//! tracker custom-field option ids. A payload value with no lookup entry is
//! omitted from the task rather than failing creation.

use std::collections::HashMap;

use crate::models::{Region, SubmissionPayload, ValueBracket};

/// Tracker custom field ids.
pub const REGION_FIELD_ID: &str = "cf_region";
pub const BILLABLE_FIELD_ID: &str = "cf_billing";
pub const VALUE_BRACKET_FIELD_ID: &str = "cf_project_value";

fn region_option(region: Region) -> Option<&'static str> {
    match region {
        Region::Amer => Some("opt_region_amer"),
        Region::Emea => Some("opt_region_emea"),
        Region::Apac => Some("opt_region_apac"),
    }
}

fn billable_option(billable: bool) -> Option<&'static str> {
    if billable {
        Some("opt_billing_billable")
    } else {
        Some("opt_billing_internal")
    }
}

fn value_bracket_option(bracket: ValueBracket) -> Option<&'static str> {
    match bracket {
        // Sub-10k requests have no bracket option in the tracker; the field
        // is left off the task.
        ValueBracket::UnderTenK => None,
        ValueBracket::TenToFiftyK => Some("opt_value_10_50"),
        ValueBracket::FiftyToTwoFiftyK => Some("opt_value_50_250"),
        ValueBracket::OverTwoFiftyK => Some("opt_value_250_plus"),
    }
}

/// Build the custom-field map for a payload. Entries without a lookup match
/// are absent.
pub fn custom_fields(payload: &SubmissionPayload) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    if let Some(option) = region_option(payload.billing.region) {
        fields.insert(REGION_FIELD_ID.to_string(), option.to_string());
    }
    if let Some(option) = billable_option(payload.billing.billable) {
        fields.insert(BILLABLE_FIELD_ID.to_string(), option.to_string());
    }
    if let Some(option) = value_bracket_option(payload.billing.value_bracket) {
        fields.insert(VALUE_BRACKET_FIELD_ID.to_string(), option.to_string());
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillingInfo, RequestCategory, Submitter};

    fn payload_with_billing(billing: BillingInfo) -> SubmissionPayload {
        SubmissionPayload {
            client_name: "Acme".to_string(),
            title: "Launch".to_string(),
            category: RequestCategory::Campaign,
            due_date: None,
            submitter: Submitter {
                name: "Jo".to_string(),
                email: "jo@acme.example".to_string(),
            },
            collaborator_emails: vec![],
            notes: None,
            billing,
            products: vec![],
            links: vec![],
            attachments: vec![],
        }
    }

    #[test]
    fn test_all_mapped_fields_present() {
        let fields = custom_fields(&payload_with_billing(BillingInfo {
            billable: true,
            region: Region::Apac,
            value_bracket: ValueBracket::OverTwoFiftyK,
        }));
        assert_eq!(fields.get(REGION_FIELD_ID).unwrap(), "opt_region_apac");
        assert_eq!(fields.get(BILLABLE_FIELD_ID).unwrap(), "opt_billing_billable");
        assert_eq!(fields.get(VALUE_BRACKET_FIELD_ID).unwrap(), "opt_value_250_plus");
    }

    #[test]
    fn test_unmapped_value_is_omitted_not_fatal() {
        let fields = custom_fields(&payload_with_billing(BillingInfo {
            billable: false,
            region: Region::Amer,
            value_bracket: ValueBracket::UnderTenK,
        }));
        assert!(!fields.contains_key(VALUE_BRACKET_FIELD_ID));
        assert_eq!(fields.get(BILLABLE_FIELD_ID).unwrap(), "opt_billing_internal");
    }
}
