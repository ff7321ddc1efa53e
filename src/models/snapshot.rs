//! List metadata and snapshot structures.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::StudentRecord;

/// Scalar fields published alongside the ranking table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListMetadata {
    /// Total number of seats; always positive
    pub seats: u32,

    /// Publication date as printed (e.g. "31.07.2025")
    pub date: String,

    /// Publication time as printed (e.g. "10:01:01")
    pub time: String,

    /// Program / competition group label
    pub program: String,
}

impl ListMetadata {
    /// Key identifying this publication of the list.
    pub fn publication_key(&self) -> Result<PublicationKey> {
        PublicationKey::new(&self.date, &self.time)
    }
}

/// Everything extracted from a single fetch of the ranking page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSnapshot {
    pub metadata: ListMetadata,

    /// Rows in table order, which is ranking order
    pub records: Vec<StudentRecord>,
}

/// Publication date and time joined by a space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PublicationKey(String);

impl PublicationKey {
    /// Build a key from the extracted date and time.
    ///
    /// Fails when neither part was found on the page.
    pub fn new(date: &str, time: &str) -> Result<Self> {
        let date = date.trim();
        let time = time.trim();
        if date.is_empty() && time.is_empty() {
            return Err(AppError::malformed("publication date and time not found"));
        }
        Ok(Self(format!("{} {}", date, time)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the key as a local timestamp, when it follows the
    /// `DD.MM.YYYY HH:MM:SS` layout.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.0, "%d.%m.%Y %H:%M:%S").ok()
    }
}

impl fmt::Display for PublicationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publication_key_joins_parts() {
        let key = PublicationKey::new("31.07.2025", "10:01:01").unwrap();
        assert_eq!(key.as_str(), "31.07.2025 10:01:01");
        assert!(key.timestamp().is_some());
    }

    #[test]
    fn test_publication_key_requires_markers() {
        let err = PublicationKey::new("  ", "").unwrap_err();
        assert!(matches!(err, AppError::MalformedDocument(_)));
    }

    #[test]
    fn test_timestamp_of_unusual_layout() {
        let key = PublicationKey::new("31 июля", "").unwrap();
        assert!(key.timestamp().is_none());
    }
}
