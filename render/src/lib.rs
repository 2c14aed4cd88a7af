//! Certify presentation layer.
//!
//! Implements the [`certify_core::Presenter`] and [`certify_core::Clipboard`]
//! seams for terminals and files, and renders results as escaped HTML.
//!
//! # Entry Point
//!
//! ```no_run
//! use std::path::Path;
//!
//! use certify_core::{Dataset, Verifier};
//! use certify_render::{render_result_card, write_result_page};
//!
//! let verifier = Verifier::new(Dataset::load(Path::new("certificates.json"))?);
//! let result = verifier.verify("AWS-17-JAN-26-CC-001")?;
//! let card = render_result_card(&result, None);
//! write_result_page(Path::new("public/result.html"), "Result", &card)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod clipboard;
pub mod html;
pub mod terminal;

pub use clipboard::{FileClipboard, NoClipboard};
pub use html::{
    escape_html, render_result_card, render_result_page, render_toast, write_result_page,
};
pub use terminal::{result_text, TerminalPresenter};
