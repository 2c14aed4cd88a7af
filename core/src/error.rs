//! Error taxonomy for a verification session.
//!
//! Every error kind is handled where it occurs and turned into presenter
//! feedback; [`CertifyError`] exists for callers (the CLI) that want a single
//! type to propagate with `?`.

use std::path::PathBuf;

use thiserror::Error;

/// The certificate dataset could not be loaded. Fatal to the session.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The dataset resource could not be read.
    #[error("cannot read certificate dataset {}: {source}", .path.display())]
    Unreachable {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The dataset document is not valid JSON or does not match the schema.
    #[error("certificate dataset is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The dataset parsed but lists no certificates.
    #[error("certificate dataset contains no certificates")]
    Empty,
}

/// The submitted identifier is unusable after sanitization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Nothing remained after stripping and trimming.
    #[error("please enter a certificate ID")]
    Empty,
    /// The identifier is longer than the form accepts.
    #[error("certificate ID must be at most {max} characters")]
    TooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

/// A verification attempt was refused by the rate limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("too many attempts, try again in {remaining_seconds}s")]
pub struct RateLimitError {
    /// Whole seconds until the cooldown ends.
    pub remaining_seconds: u64,
}

/// Copying a share link failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not copy link: {reason}")]
pub struct ClipboardError {
    /// Human-readable cause.
    pub reason: String,
}

impl ClipboardError {
    /// Creates a clipboard error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The configuration file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or has fields of the wrong type.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Offending field name.
        field: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },
}

/// Any error the crate produces.
#[derive(Debug, Error)]
pub enum CertifyError {
    /// See [`LoadError`].
    #[error(transparent)]
    Load(#[from] LoadError),
    /// See [`ValidationError`].
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// See [`RateLimitError`].
    #[error(transparent)]
    RateLimit(#[from] RateLimitError),
    /// See [`ClipboardError`].
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_message_names_remaining_seconds() {
        let err = RateLimitError {
            remaining_seconds: 42,
        };
        assert_eq!(err.to_string(), "too many attempts, try again in 42s");
    }

    #[test]
    fn umbrella_is_transparent() {
        let err: CertifyError = ValidationError::Empty.into();
        assert_eq!(err.to_string(), "please enter a certificate ID");
    }
}
