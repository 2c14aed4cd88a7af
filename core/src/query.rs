//! Input sanitization and normalization.

use std::fmt;

use crate::error::ValidationError;

/// Characters removed from input before it is used anywhere.
pub const STRIPPED_CHARS: [char; 5] = ['<', '>', '"', '\'', '&'];

/// Strips markup characters, trims, and collapses whitespace runs to a
/// single space.
///
/// Idempotent: `sanitize(&sanitize(x)) == sanitize(x)`.
pub fn sanitize(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A sanitized, uppercased certificate identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerificationQuery(String);

impl VerificationQuery {
    /// Sanitizes and uppercases `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if nothing remains after
    /// sanitization.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let sanitized = sanitize(raw);
        if sanitized.is_empty() {
            return Err(ValidationError::Empty);
        }
        Ok(Self(sanitized.to_uppercase()))
    }

    /// Returns the normalized identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the query, returning the normalized identifier.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for VerificationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
