//! HTML rendering of verification results and toasts.
//!
//! Every piece of record or query text passes through [`escape_html`]; the
//! core never hands over markup.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use certify_core::{CertificateRecord, Toast, ToastKind, VerificationResult};

/// Escapes HTML special characters in a string.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Renders a result card. `share_link` adds a copy-link button for verified
/// results.
pub fn render_result_card(result: &VerificationResult, share_link: Option<&str>) -> String {
    match result {
        VerificationResult::Verified { record } => render_verified(record, share_link),
        VerificationResult::NotFound { queried_id } => format!(
            r#"<section class="result result-not-found" role="status">
<h2>Certificate not found</h2>
<p>No certificate with ID <code>{id}</code> was issued.</p>
<p class="result-hint">Check the ID for typos and try again.</p>
</section>"#,
            id = escape_html(queried_id),
        ),
    }
}

fn render_verified(record: &CertificateRecord, share_link: Option<&str>) -> String {
    let mut rows = String::new();
    for (key, value) in &record.details {
        rows.push_str(&format!(
            "<dt>{}</dt><dd>{}</dd>\n",
            escape_html(&field_label(key)),
            escape_html(&value_text(value))
        ));
    }

    let share = share_link
        .map(|link| {
            format!(
                r#"<button type="button" class="share-link" data-link="{}">Copy share link</button>"#,
                escape_html(link)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<section class="result result-verified" role="status">
<h2>Certificate verified</h2>
<dl>
<dt>Certificate ID</dt><dd><code>{id}</code></dd>
<dt>Name</dt><dd>{name}</dd>
{rows}</dl>
{share}
</section>"#,
        id = escape_html(&record.certificate_id),
        name = escape_html(&record.name),
        rows = rows,
        share = share,
    )
}

/// Renders a toast notification.
pub fn render_toast(toast: &Toast) -> String {
    format!(
        r#"<div class="toast toast-{kind}" role="alert" data-dismiss-ms="{ms}">{message}</div>"#,
        kind = toast_class(toast.kind),
        ms = toast.duration.as_millis(),
        message = escape_html(&toast.message),
    )
}

/// Wraps a result card in a standalone page.
pub fn render_result_page(title: &str, card_html: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title} | Certificate Verification</title>
</head>
<body>
<main id="main-content">
{card_html}
</main>
</body>
</html>
"##,
        title = escape_html(title),
        card_html = card_html,
    )
}

/// Renders `card_html` as a standalone page and writes it to `path`,
/// creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be written.
pub fn write_result_page(path: &Path, title: &str, card_html: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create result directory {}", dir.display()))?;
    }
    fs::write(path, render_result_page(title, card_html))
        .with_context(|| format!("Cannot write result page {}", path.display()))
}

/// Turns `eventDate` / `event_date` into `Event date`.
pub fn field_label(key: &str) -> String {
    let mut words = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c == '_' || c == '-' {
            words.push(' ');
        } else if c.is_uppercase() && i > 0 {
            words.push(' ');
            words.extend(c.to_lowercase());
        } else if i == 0 {
            words.extend(c.to_uppercase());
        } else {
            words.push(c);
        }
    }
    words
}

/// Plain-text form of a metadata value; strings lose their quotes.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn toast_class(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Success => "success",
        ToastKind::Error => "error",
        ToastKind::Info => "info",
    }
}
