//! Certify core: certificate lookup for a single verification session.
//!
//! A session loads a static certificate dataset once, then answers
//! "is this certificate ID real?" with an exact, case-insensitive match.
//! Bursts of attempts are throttled by a fixed-window [`limiter`], and page
//! URLs can prefill or auto-submit an ID through [`deeplink`] parameters.
//!
//! # Entry Point
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Instant;
//!
//! use certify_core::{Config, Dataset, Recorder, Session};
//!
//! let config = Config::default();
//! let mut session = Session::new(&config, Recorder::new());
//! session.dataset_loaded(Dataset::load(Path::new("certificates.json")), Instant::now());
//! session.input_changed("aws-17-jan-26-cc-001");
//! session.submit(Instant::now());
//! ```
//!
//! # Components
//!
//! ```text
//! deeplink ─┐
//!           ├─▶ session ─▶ limiter ─▶ engine ─▶ presenter
//! form ─────┘                           │
//!                                    dataset
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod dataset;
pub mod deeplink;
pub mod engine;
pub mod error;
pub mod limiter;
pub mod presenter;
pub mod query;
pub mod session;

pub use config::Config;
pub use dataset::{CertificateRecord, Dataset};
pub use deeplink::{canonical_url, parse_startup_parameters, share_link, StartupParameters};
pub use engine::{VerificationResult, Verifier};
pub use error::{
    CertifyError, ClipboardError, ConfigError, LoadError, RateLimitError, ValidationError,
};
pub use limiter::{LimiterState, RateLimiter};
pub use presenter::{Clipboard, Presenter, PresenterEvent, Recorder, Toast, ToastKind};
pub use query::{sanitize, VerificationQuery};
pub use session::{Session, Submission, Timer};
