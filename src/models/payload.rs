//! # Submission Payload
//!
//! The validated intake data snapshot. The payload is captured once when the
//! submission is created and is immutable afterwards; every retry works from
//! this snapshot, never from fresh user input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated intake data for one business request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    /// Client the request is filed under. Drives storage partition and
    /// folder-bucket selection, so leading whitespace is rejected upstream.
    pub client_name: String,
    /// Short request title, used in folder and task names.
    pub title: String,
    pub category: RequestCategory,
    pub due_date: Option<NaiveDate>,
    pub submitter: Submitter,
    #[serde(default)]
    pub collaborator_emails: Vec<String>,
    /// Free-form rich-text notes (sanitized HTML fragment).
    #[serde(default)]
    pub notes: Option<String>,
    pub billing: BillingInfo,
    #[serde(default)]
    pub products: Vec<ProductLine>,
    #[serde(default)]
    pub links: Vec<ReferenceLink>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Request category, which selects the task brief template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestCategory {
    /// Full engagement with products, links, and a complete brief.
    Campaign,
    /// Ongoing-retainer work item; billing context plus notes is enough.
    Retainer,
}

impl fmt::Display for RequestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Campaign => write!(f, "campaign"),
            Self::Retainer => write!(f, "retainer"),
        }
    }
}

impl std::str::FromStr for RequestCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "campaign" => Ok(Self::Campaign),
            "retainer" => Ok(Self::Retainer),
            _ => Err(format!("Invalid request category: {s}")),
        }
    }
}

/// Person who filed the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submitter {
    pub name: String,
    pub email: String,
}

/// Billing context attached to every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingInfo {
    pub billable: bool,
    pub region: Region,
    pub value_bracket: ValueBracket,
}

/// Commercial region of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Amer,
    Emea,
    Apac,
}

/// Project-value bracket used for tracker triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueBracket {
    UnderTenK,
    TenToFiftyK,
    FiftyToTwoFiftyK,
    OverTwoFiftyK,
}

/// One product line item on a campaign request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLine {
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// External reference link supplied by the submitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLink {
    pub label: String,
    pub url: String,
}

/// Attachment captured at intake time. Content is held in the snapshot so a
/// retry can re-upload without the original browser session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_string_conversion() {
        assert_eq!(RequestCategory::Campaign.to_string(), "campaign");
        assert_eq!(
            "retainer".parse::<RequestCategory>().unwrap(),
            RequestCategory::Retainer
        );
        assert!("drafting".parse::<RequestCategory>().is_err());
    }

    #[test]
    fn test_payload_serde_round_trip_defaults() {
        // Optional collections may be absent entirely in stored payloads from
        // older records; they must deserialize to empty.
        let json = serde_json::json!({
            "client_name": "Acme",
            "title": "Spring launch",
            "category": "campaign",
            "due_date": null,
            "submitter": { "name": "Jo Field", "email": "jo@acme.example" },
            "billing": { "billable": true, "region": "emea", "value_bracket": "ten_to_fifty_k" }
        });
        let payload: SubmissionPayload = serde_json::from_value(json).unwrap();
        assert!(payload.attachments.is_empty());
        assert!(payload.products.is_empty());
        assert!(payload.notes.is_none());
    }
}
