//! The presentation seam: everything a session shows goes through
//! [`Presenter`], and share links leave through [`Clipboard`].

use std::time::Duration;

use url::Url;

use crate::engine::VerificationResult;
use crate::error::{ClipboardError, LoadError};

/// Visual class of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Something worked.
    Success,
    /// Something the user can fix went wrong.
    Error,
    /// Neutral information.
    Info,
}

/// A transient notification that dismisses itself after `duration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Visual class.
    pub kind: ToastKind,
    /// Plain-text message.
    pub message: String,
    /// Time until auto-dismissal.
    pub duration: Duration,
}

/// Renders session state. Implementations own all markup and styling.
pub trait Presenter {
    /// Shows or hides the loading indicator.
    fn set_loading(&mut self, loading: bool);

    /// Enables or disables the input field and submit action.
    fn set_form_enabled(&mut self, enabled: bool);

    /// Replaces the contents of the input field.
    fn set_input(&mut self, value: &str);

    /// Displays a verification result card.
    fn show_result(&mut self, result: &VerificationResult);

    /// Shows or updates the cooldown countdown.
    fn show_countdown(&mut self, remaining_seconds: u64);

    /// Removes the cooldown countdown.
    fn clear_countdown(&mut self);

    /// Shows a transient notification.
    fn toast(&mut self, toast: Toast);

    /// Shows a persistent error that makes the session unusable.
    fn show_fatal(&mut self, error: &LoadError);

    /// Replaces the current history entry with `url`.
    fn replace_url(&mut self, url: &Url);
}

/// Destination for copied share links.
pub trait Clipboard {
    /// Places `text` on the clipboard.
    ///
    /// # Errors
    ///
    /// Returns [`ClipboardError`] if the text could not be copied.
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// One call made on a [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterEvent {
    /// [`Presenter::set_loading`].
    Loading(bool),
    /// [`Presenter::set_form_enabled`].
    FormEnabled(bool),
    /// [`Presenter::set_input`].
    Input(String),
    /// [`Presenter::show_result`].
    Result(VerificationResult),
    /// [`Presenter::show_countdown`].
    Countdown(u64),
    /// [`Presenter::clear_countdown`].
    CountdownCleared,
    /// [`Presenter::toast`].
    Toast(Toast),
    /// [`Presenter::show_fatal`], with the error message.
    Fatal(String),
    /// [`Presenter::replace_url`].
    UrlReplaced(Url),
}

/// A presenter that records every call, for driving sessions headlessly.
#[derive(Debug, Default)]
pub struct Recorder {
    /// Calls in the order they were made.
    pub events: Vec<PresenterEvent>,
}

impl Recorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every result shown so far.
    pub fn results(&self) -> Vec<&VerificationResult> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Result(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    /// Returns every toast shown so far.
    pub fn toasts(&self) -> Vec<&Toast> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Toast(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    /// Returns the most recent input value.
    pub fn input(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            PresenterEvent::Input(v) => Some(v.as_str()),
            _ => None,
        })
    }

    /// Returns the most recent form-enabled state.
    pub fn form_enabled(&self) -> Option<bool> {
        self.events.iter().rev().find_map(|e| match e {
            PresenterEvent::FormEnabled(b) => Some(*b),
            _ => None,
        })
    }

    /// Returns the URL most recently placed in history.
    pub fn current_url(&self) -> Option<&Url> {
        self.events.iter().rev().find_map(|e| match e {
            PresenterEvent::UrlReplaced(u) => Some(u),
            _ => None,
        })
    }

    /// Forgets recorded calls.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Presenter for Recorder {
    fn set_loading(&mut self, loading: bool) {
        self.events.push(PresenterEvent::Loading(loading));
    }

    fn set_form_enabled(&mut self, enabled: bool) {
        self.events.push(PresenterEvent::FormEnabled(enabled));
    }

    fn set_input(&mut self, value: &str) {
        self.events.push(PresenterEvent::Input(value.to_string()));
    }

    fn show_result(&mut self, result: &VerificationResult) {
        self.events.push(PresenterEvent::Result(result.clone()));
    }

    fn show_countdown(&mut self, remaining_seconds: u64) {
        self.events.push(PresenterEvent::Countdown(remaining_seconds));
    }

    fn clear_countdown(&mut self) {
        self.events.push(PresenterEvent::CountdownCleared);
    }

    fn toast(&mut self, toast: Toast) {
        self.events.push(PresenterEvent::Toast(toast));
    }

    fn show_fatal(&mut self, error: &LoadError) {
        self.events.push(PresenterEvent::Fatal(error.to_string()));
    }

    fn replace_url(&mut self, url: &Url) {
        self.events.push(PresenterEvent::UrlReplaced(url.clone()));
    }
}
