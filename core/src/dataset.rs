//! Loads the static certificate dataset and exposes it as a read-only table.
//!
//! The dataset document has the shape
//!
//! ```json
//! {
//!   "event": { "event": "AWS Cloud Camp", "date": "2026-01-17" },
//!   "certificates": [
//!     { "certificateId": "AWS-17-JAN-26-CC-001", "name": "Jane Doe" }
//!   ]
//! }
//! ```
//!
//! `event` is optional. Its fields are copied into every record so that a
//! verified result carries the event metadata verbatim.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::LoadError;
use crate::query::VerificationQuery;

/// A single issued certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    /// Identifier printed on the certificate. Matched case-insensitively.
    pub certificate_id: String,
    /// Participant name.
    pub name: String,
    /// Every other field of the record, plus inherited event metadata.
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct DatasetDocument {
    certificates: Vec<CertificateRecord>,
    #[serde(default)]
    event: BTreeMap<String, Value>,
}

/// The loaded certificate table. Immutable for the session lifetime.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<CertificateRecord>,
    // Uppercased identifiers, parallel to `records`.
    keys: Vec<String>,
}

impl Dataset {
    /// Reads and parses the dataset document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Unreachable`] if the file cannot be read, and the
    /// errors of [`Dataset::from_json`] otherwise.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let source = fs::read_to_string(path).map_err(|source| LoadError::Unreachable {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json(&source)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            "loaded certificate dataset"
        );
        Ok(dataset)
    }

    /// Parses a dataset document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Malformed`] if the JSON is invalid or lacks the
    /// `certificates` array, and [`LoadError::Empty`] if the array is empty.
    pub fn from_json(source: &str) -> Result<Self, LoadError> {
        let document: DatasetDocument = serde_json::from_str(source)?;
        Self::from_records(document.certificates, &document.event)
    }

    /// Builds a dataset from records, merging `event` metadata into each one.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Empty`] if `records` is empty.
    pub fn from_records(
        mut records: Vec<CertificateRecord>,
        event: &BTreeMap<String, Value>,
    ) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::Empty);
        }

        for record in &mut records {
            for (key, value) in event {
                if key == "certificateId" || key == "name" {
                    continue;
                }
                record
                    .details
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
        }

        let keys: Vec<String> = records
            .iter()
            .map(|r| r.certificate_id.to_uppercase())
            .collect();

        let dataset = Self { records, keys };
        for id in dataset.duplicate_ids() {
            warn!(certificate_id = %id, "duplicate certificate ID in dataset; first entry wins");
        }
        Ok(dataset)
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns all records in document order.
    pub fn records(&self) -> &[CertificateRecord] {
        &self.records
    }

    /// Finds the first record whose identifier equals `query`, ignoring case.
    pub fn find(&self, query: &VerificationQuery) -> Option<&CertificateRecord> {
        self.keys
            .iter()
            .position(|key| key == query.as_str())
            .map(|i| &self.records[i])
    }

    /// Length in characters of the longest identifier.
    pub fn longest_id_len(&self) -> usize {
        self.keys
            .iter()
            .map(|key| key.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Returns identifiers (uppercased) that appear more than once.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for key in &self.keys {
            if !seen.insert(key.as_str()) && reported.insert(key.as_str()) {
                duplicates.push(key.as_str());
            }
        }
        duplicates
    }
}
