// src/error.rs

//! Unified error handling for the rank watcher.

use std::fmt;

use thiserror::Error;

use crate::models::RecipientId;

/// Result type alias for rank watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Network or transport failure while fetching the ranking page
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Expected markers are absent from the page
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// No table with qualifying rows was found
    #[error("No ranking data found on the page")]
    NoDataFound,

    /// The applicant is absent from the eligible subset
    #[error("Applicant {code} not found or does not hold top passing priority")]
    RankNotFound { code: String },

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Delivery to a recipient failed
    #[error("Delivery to {recipient} failed: {message}")]
    Delivery {
        recipient: RecipientId,
        message: String,
    },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a malformed document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }

    /// Create a rank-not-found error for the given applicant code.
    pub fn rank_not_found(code: impl Into<String>) -> Self {
        Self::RankNotFound { code: code.into() }
    }

    /// Create a delivery error.
    pub fn delivery(recipient: RecipientId, message: impl fmt::Display) -> Self {
        Self::Delivery {
            recipient,
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the page itself could not be turned into a list.
    pub fn is_page_error(&self) -> bool {
        matches!(
            self,
            AppError::Fetch(_) | AppError::MalformedDocument(_) | AppError::NoDataFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_not_found_mentions_code() {
        let err = AppError::rank_not_found("00555");
        assert!(err.to_string().contains("00555"));
        assert!(!err.is_page_error());
    }

    #[test]
    fn no_data_is_page_error() {
        assert!(AppError::NoDataFound.is_page_error());
        assert!(AppError::malformed("no date").is_page_error());
    }
}
