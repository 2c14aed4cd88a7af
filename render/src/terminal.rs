//! A [`Presenter`] that writes a plain-text transcript to any writer.

use std::io::{self, Write};

use url::Url;

use certify_core::{LoadError, Presenter, Toast, ToastKind, VerificationResult};

use crate::html::{field_label, value_text};

/// Writes session feedback as lines of text.
///
/// Write failures do not interrupt the session; the first one is kept and
/// can be collected with [`TerminalPresenter::take_error`].
#[derive(Debug)]
pub struct TerminalPresenter<W> {
    out: W,
    error: Option<io::Error>,
    form_enabled: bool,
}

impl<W: Write> TerminalPresenter<W> {
    /// Creates a presenter writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            error: None,
            form_enabled: false,
        }
    }

    /// Returns the first write error, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Returns whether the form was last reported enabled.
    pub fn form_enabled(&self) -> bool {
        self.form_enabled
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            self.error.get_or_insert(e);
        }
    }
}

/// Formats a result as indented text lines.
pub fn result_text(result: &VerificationResult) -> String {
    match result {
        VerificationResult::Verified { record } => {
            let mut text = format!(
                "VERIFIED  {}\n  Name: {}",
                record.certificate_id, record.name
            );
            for (key, value) in &record.details {
                text.push_str(&format!("\n  {}: {}", field_label(key), value_text(value)));
            }
            text
        }
        VerificationResult::NotFound { queried_id } => {
            format!("NOT FOUND {queried_id}\n  No certificate with this ID was issued.")
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn set_loading(&mut self, loading: bool) {
        if loading {
            self.line("… verifying");
        }
    }

    fn set_form_enabled(&mut self, enabled: bool) {
        self.form_enabled = enabled;
    }

    fn set_input(&mut self, value: &str) {
        self.line(&format!("> {value}"));
    }

    fn show_result(&mut self, result: &VerificationResult) {
        self.line(&result_text(result));
    }

    fn show_countdown(&mut self, remaining_seconds: u64) {
        self.line(&format!("Too many attempts. Try again in {remaining_seconds}s."));
    }

    fn clear_countdown(&mut self) {
        self.line("You can verify again.");
    }

    fn toast(&mut self, toast: Toast) {
        let tag = match toast.kind {
            ToastKind::Success => "ok",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        };
        self.line(&format!("[{tag}] {}", toast.message));
    }

    fn show_fatal(&mut self, error: &LoadError) {
        self.line(&format!("Verification is unavailable: {error}"));
    }

    fn replace_url(&mut self, url: &Url) {
        self.line(&format!("(page: {url})"));
    }
}
