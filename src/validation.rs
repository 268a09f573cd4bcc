//! # Payload Validation
//!
//! Shape and size rules applied before the orchestrator is invoked. A payload
//! rejected here is fully user-correctable and never persisted; the pipeline
//! only ever sees payloads that passed.

use crate::error::{IntakeError, Result};
use crate::models::SubmissionPayload;

/// Maximum length for the client name and title fields.
const MAX_NAME_LENGTH: usize = 200;

/// Maximum size for the rich-text notes fragment (64KB).
const MAX_NOTES_BYTES: usize = 64 * 1024;

/// Maximum number of attachments per submission.
const MAX_ATTACHMENTS: usize = 20;

/// Maximum size for a single attachment (25MB).
const MAX_ATTACHMENT_BYTES: usize = 25 * 1024 * 1024;

fn require_email(value: &str, field: &str) -> Result<()> {
    if !value.contains('@') {
        return Err(IntakeError::ValidationError(format!(
            "{field} is not an email address: {value}"
        )));
    }
    Ok(())
}

/// Validate a payload before it enters the pipeline.
pub fn validate_payload(payload: &SubmissionPayload) -> Result<()> {
    let client_name = payload.client_name.trim();
    if client_name.is_empty() {
        return Err(IntakeError::ValidationError(
            "client_name must not be empty".to_string(),
        ));
    }
    if client_name.len() > MAX_NAME_LENGTH {
        return Err(IntakeError::ValidationError(format!(
            "client_name too long: {} chars (max: {MAX_NAME_LENGTH})",
            client_name.len()
        )));
    }

    let title = payload.title.trim();
    if title.is_empty() {
        return Err(IntakeError::ValidationError(
            "title must not be empty".to_string(),
        ));
    }
    if title.len() > MAX_NAME_LENGTH {
        return Err(IntakeError::ValidationError(format!(
            "title too long: {} chars (max: {MAX_NAME_LENGTH})",
            title.len()
        )));
    }

    require_email(&payload.submitter.email, "submitter.email")?;
    for email in &payload.collaborator_emails {
        require_email(email, "collaborator email")?;
    }

    if let Some(notes) = &payload.notes {
        if notes.len() > MAX_NOTES_BYTES {
            return Err(IntakeError::ValidationError(format!(
                "notes too large: {} bytes (max: {MAX_NOTES_BYTES})",
                notes.len()
            )));
        }
    }

    if payload.attachments.len() > MAX_ATTACHMENTS {
        return Err(IntakeError::ValidationError(format!(
            "too many attachments: {} (max: {MAX_ATTACHMENTS})",
            payload.attachments.len()
        )));
    }
    for attachment in &payload.attachments {
        if attachment.file_name.trim().is_empty() {
            return Err(IntakeError::ValidationError(
                "attachment file_name must not be empty".to_string(),
            ));
        }
        if attachment.content.len() > MAX_ATTACHMENT_BYTES {
            return Err(IntakeError::ValidationError(format!(
                "attachment {} too large: {} bytes (max: {MAX_ATTACHMENT_BYTES})",
                attachment.file_name,
                attachment.content.len()
            )));
        }
    }

    for product in &payload.products {
        if product.name.trim().is_empty() {
            return Err(IntakeError::ValidationError(
                "product name must not be empty".to_string(),
            ));
        }
        if product.quantity == 0 {
            return Err(IntakeError::ValidationError(format!(
                "product {} has zero quantity",
                product.name
            )));
        }
    }

    for link in &payload.links {
        if !link.url.starts_with("http://") && !link.url.starts_with("https://") {
            return Err(IntakeError::ValidationError(format!(
                "link url must be http(s): {}",
                link.url
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Attachment, BillingInfo, ProductLine, Region, RequestCategory, Submitter, ValueBracket,
    };

    fn valid_payload() -> SubmissionPayload {
        SubmissionPayload {
            client_name: "Acme".to_string(),
            title: "Spring launch".to_string(),
            category: RequestCategory::Campaign,
            due_date: None,
            submitter: Submitter {
                name: "Jo".to_string(),
                email: "jo@acme.example".to_string(),
            },
            collaborator_emails: vec!["pat@acme.example".to_string()],
            notes: None,
            billing: BillingInfo {
                billable: true,
                region: Region::Emea,
                value_bracket: ValueBracket::TenToFiftyK,
            },
            products: vec![],
            links: vec![],
            attachments: vec![],
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(validate_payload(&valid_payload()).is_ok());
    }

    #[test]
    fn test_blank_client_name_rejected() {
        let mut payload = valid_payload();
        payload.client_name = "   ".to_string();
        assert!(matches!(
            validate_payload(&payload),
            Err(IntakeError::ValidationError(_))
        ));
    }

    #[test]
    fn test_bad_collaborator_email_rejected() {
        let mut payload = valid_payload();
        payload.collaborator_emails.push("not-an-email".to_string());
        assert!(validate_payload(&payload).is_err());
    }

    #[test]
    fn test_zero_quantity_product_rejected() {
        let mut payload = valid_payload();
        payload.products.push(ProductLine {
            name: "Banner".to_string(),
            sku: None,
            quantity: 0,
            notes: None,
        });
        assert!(validate_payload(&payload).is_err());
    }

    #[test]
    fn test_oversized_attachment_rejected() {
        let mut payload = valid_payload();
        payload.attachments.push(Attachment {
            file_name: "big.bin".to_string(),
            mime_type: "application/octet-stream".to_string(),
            content: vec![0; MAX_ATTACHMENT_BYTES + 1],
        });
        assert!(validate_payload(&payload).is_err());
    }
}
