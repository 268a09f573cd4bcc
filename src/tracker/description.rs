//! # Brief Templates
//!
//! Rich-description construction for tracker tasks. The request category
//! selects one of two templates: retainer work gets the lightweight brief
//! (billing context plus notes), campaigns get the full brief with every
//! category field and the repeatable product/link sub-entities.

use crate::models::{RequestCategory, SubmissionPayload};

/// Which brief layout a task description uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BriefTemplate {
    /// Billing/context fields plus free-form notes.
    Lightweight,
    /// Every category field plus products and reference links.
    Full,
}

impl BriefTemplate {
    pub fn for_category(category: RequestCategory) -> Self {
        match category {
            RequestCategory::Campaign => Self::Full,
            RequestCategory::Retainer => Self::Lightweight,
        }
    }
}

/// Escape text interpolated into the HTML description.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn push_context(body: &mut String, payload: &SubmissionPayload) {
    body.push_str("<h2>Request</h2><ul>");
    body.push_str(&format!("<li>Client: {}</li>", escape(&payload.client_name)));
    body.push_str(&format!("<li>Category: {}</li>", payload.category));
    if let Some(due) = payload.due_date {
        body.push_str(&format!("<li>Due: {}</li>", due.format("%Y-%m-%d")));
    }
    body.push_str(&format!(
        "<li>Submitted by: {} ({})</li>",
        escape(&payload.submitter.name),
        escape(&payload.submitter.email)
    ));
    body.push_str("</ul>");
}

fn push_billing(body: &mut String, payload: &SubmissionPayload) {
    body.push_str("<h2>Billing</h2><ul>");
    body.push_str(&format!(
        "<li>Billable: {}</li>",
        if payload.billing.billable { "yes" } else { "no" }
    ));
    body.push_str(&format!("<li>Region: {:?}</li>", payload.billing.region));
    body.push_str(&format!(
        "<li>Value bracket: {:?}</li>",
        payload.billing.value_bracket
    ));
    body.push_str("</ul>");
}

fn push_products(body: &mut String, payload: &SubmissionPayload) {
    if payload.products.is_empty() {
        return;
    }
    body.push_str("<h2>Products</h2><ul>");
    for product in &payload.products {
        let mut line = format!("{} x{}", escape(&product.name), product.quantity);
        if let Some(sku) = &product.sku {
            line.push_str(&format!(" (SKU {})", escape(sku)));
        }
        if let Some(notes) = &product.notes {
            line.push_str(&format!(" {}", escape(notes)));
        }
        body.push_str(&format!("<li>{line}</li>"));
    }
    body.push_str("</ul>");
}

fn push_links(body: &mut String, payload: &SubmissionPayload) {
    if payload.links.is_empty() {
        return;
    }
    body.push_str("<h2>Reference links</h2><ul>");
    for link in &payload.links {
        body.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>",
            escape(&link.url),
            escape(&link.label)
        ));
    }
    body.push_str("</ul>");
}

fn push_notes(body: &mut String, payload: &SubmissionPayload) {
    if let Some(notes) = &payload.notes {
        // Notes arrive as a sanitized HTML fragment; interpolated verbatim.
        body.push_str("<h2>Notes</h2>");
        body.push_str(notes);
    }
}

fn push_folder_link(body: &mut String, folder_url: &str) {
    body.push_str(&format!(
        "<p>Files: <a href=\"{}\">submission folder</a></p>",
        escape(folder_url)
    ));
}

/// Build the task description for a payload.
pub fn build_description(payload: &SubmissionPayload, folder_url: &str) -> String {
    let mut body = String::new();

    match BriefTemplate::for_category(payload.category) {
        BriefTemplate::Lightweight => {
            push_context(&mut body, payload);
            push_billing(&mut body, payload);
            push_notes(&mut body, payload);
        }
        BriefTemplate::Full => {
            push_context(&mut body, payload);
            push_billing(&mut body, payload);
            push_products(&mut body, payload);
            push_links(&mut body, payload);
            push_notes(&mut body, payload);
        }
    }

    push_folder_link(&mut body, folder_url);
    body
}
