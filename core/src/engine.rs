//! Exact-match certificate lookup.

use serde::Serialize;

use crate::dataset::{CertificateRecord, Dataset};
use crate::error::ValidationError;
use crate::query::VerificationQuery;

/// Default upper bound on identifier length, in characters.
pub const DEFAULT_MAX_ID_LENGTH: usize = 64;

/// Outcome of a lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationResult {
    /// The identifier belongs to an issued certificate.
    Verified {
        /// The matching record.
        record: CertificateRecord,
    },
    /// No certificate carries the identifier.
    NotFound {
        /// The normalized identifier that was searched for.
        queried_id: String,
    },
}

impl VerificationResult {
    /// Returns true for [`VerificationResult::Verified`].
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }

    /// Returns the identifier this result is about.
    pub fn certificate_id(&self) -> &str {
        match self {
            Self::Verified { record } => &record.certificate_id,
            Self::NotFound { queried_id } => queried_id,
        }
    }
}

/// Looks identifiers up in a loaded [`Dataset`].
#[derive(Debug, Clone)]
pub struct Verifier {
    dataset: Dataset,
    max_id_length: usize,
}

impl Verifier {
    /// Creates a verifier over `dataset` with the default length limit, raised
    /// to the longest identifier in the dataset.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            max_id_length: DEFAULT_MAX_ID_LENGTH.max(dataset.longest_id_len()),
            dataset,
        }
    }

    /// Sets the maximum identifier length in characters.
    ///
    /// The limit never drops below the longest identifier in the dataset, so
    /// every issued certificate stays verifiable.
    pub fn with_max_id_length(mut self, max_id_length: usize) -> Self {
        self.max_id_length = max_id_length.max(self.dataset.longest_id_len());
        self
    }

    /// Returns the effective identifier length limit.
    pub fn max_id_length(&self) -> usize {
        self.max_id_length
    }

    /// Returns the underlying dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Sanitizes `raw`, then looks it up.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the sanitized identifier is empty or
    /// too long.
    pub fn verify(&self, raw: &str) -> Result<VerificationResult, ValidationError> {
        let query = VerificationQuery::parse(raw)?;
        if query.char_len() > self.max_id_length {
            return Err(ValidationError::TooLong {
                max: self.max_id_length,
            });
        }
        Ok(self.lookup(query))
    }

    /// Looks up an already-normalized query.
    pub fn lookup(&self, query: VerificationQuery) -> VerificationResult {
        match self.dataset.find(&query) {
            Some(record) => VerificationResult::Verified {
                record: record.clone(),
            },
            None => VerificationResult::NotFound {
                queried_id: query.into_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> Verifier {
        let dataset = Dataset::from_json(
            r#"{"certificates": [
                {"certificateId": "AWS-17-JAN-26-CC-001", "name": "Jane Doe"},
                {"certificateId": "AWS-17-JAN-26-CC-002", "name": "John Roe"}
            ]}"#,
        )
        .unwrap();
        Verifier::new(dataset)
    }

    #[test]
    fn every_known_id_verifies_in_any_casing() {
        let v = verifier();
        let ids: Vec<String> = v
            .dataset()
            .records()
            .iter()
            .map(|r| r.certificate_id.clone())
            .collect();
        for id in ids {
            for candidate in [id.clone(), id.to_lowercase(), format!("  {id}\t")] {
                match v.verify(&candidate).unwrap() {
                    VerificationResult::Verified { record } => {
                        assert_eq!(record.certificate_id, id)
                    }
                    other => panic!("{candidate:?} gave {other:?}"),
                }
            }
        }
    }

    #[test]
    fn lowercase_submission_finds_jane() {
        match verifier().verify("aws-17-jan-26-cc-001").unwrap() {
            VerificationResult::Verified { record } => assert_eq!(record.name, "Jane Doe"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_id_reports_normalized_query() {
        assert_eq!(
            verifier().verify("aws-17-jan-26-cc-999 ").unwrap(),
            VerificationResult::NotFound {
                queried_id: "AWS-17-JAN-26-CC-999".to_string()
            }
        );
    }

    #[test]
    fn script_input_is_sanitized_before_lookup() {
        let result = verifier().verify("<script>alert(1)</script>").unwrap();
        assert_eq!(result.certificate_id(), "SCRIPTALERT(1)/SCRIPT");
        assert!(!result.is_verified());
    }

    #[test]
    fn blank_and_oversized_input_fail_validation() {
        let v = verifier().with_max_id_length(8);
        // Dataset IDs are 20 characters, which lifts the limit to 20.
        assert_eq!(v.max_id_length(), 20);
        assert_eq!(v.verify(" \n "), Err(ValidationError::Empty));
        assert_eq!(
            v.verify("AWS-17-JAN-26-CC-0001"),
            Err(ValidationError::TooLong { max: 20 })
        );
    }

    #[test]
    fn long_dataset_ids_stay_verifiable() {
        let long_id = "A".repeat(DEFAULT_MAX_ID_LENGTH + 6);
        let at_limit = "B".repeat(DEFAULT_MAX_ID_LENGTH);
        let dataset = Dataset::from_json(&format!(
            r#"{{"certificates": [
                {{"certificateId": "{long_id}", "name": "Long"}},
                {{"certificateId": "{at_limit}", "name": "Exact"}}
            ]}}"#
        ))
        .unwrap();
        let v = Verifier::new(dataset).with_max_id_length(DEFAULT_MAX_ID_LENGTH);
        assert_eq!(v.max_id_length(), DEFAULT_MAX_ID_LENGTH + 6);

        for (id, name) in [(&long_id, "Long"), (&at_limit, "Exact")] {
            match v.verify(&id.to_lowercase()).unwrap() {
                VerificationResult::Verified { record } => assert_eq!(record.name, name),
                other => panic!("{id} gave {other:?}"),
            }
        }
        assert_eq!(
            v.verify(&"A".repeat(DEFAULT_MAX_ID_LENGTH + 7)),
            Err(ValidationError::TooLong {
                max: DEFAULT_MAX_ID_LENGTH + 6
            })
        );
    }

    #[test]
    fn result_serializes_with_status_tag() {
        let json = serde_json::to_value(verifier().verify("nope").unwrap()).unwrap();
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["queried_id"], "NOPE");
    }
}
