//! Error types for the moneris-rs library.
//!
//! Errors raised before any network call (validation, payment method,
//! transaction reference, card) are kept apart from transport failures so a
//! caller can tell "my input was bad" from "the gateway was unreachable".
//! A gateway that replies with something unreadable is not an error at all:
//! see [`crate::receipt::Receipt::parse`].

use crate::card::CardError;
use thiserror::Error;

/// Main error type for Moneris operations.
#[derive(Error, Debug)]
pub enum MonerisError {
    /// A required parameter is missing or violates its constraint
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// Parameter name, as the caller knows it (e.g. `orderNumber`)
        field: &'static str,
        /// Human-readable reason
        reason: String,
    },

    /// The payment method is not one the gateway client supports
    #[error("Invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    /// The transaction reference does not decode to a receipt
    #[error("Invalid transaction reference: {0}")]
    InvalidTransactionReference(String),

    /// The card failed its own validation
    #[error("Invalid card: {0}")]
    InvalidCard(#[from] CardError),

    /// Error during HTTP request/response handling
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(u16),

    /// The request document could not be serialized
    #[error("XML error: {0}")]
    XmlError(String),

    /// Error during JSON deserialization of loose parameters
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error parsing URL
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl MonerisError {
    /// Shorthand for a [`MonerisError::Validation`].
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        MonerisError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Returns `true` if the error was raised before any network I/O.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            MonerisError::Validation { .. }
                | MonerisError::InvalidPaymentMethod(_)
                | MonerisError::InvalidTransactionReference(_)
                | MonerisError::InvalidCard(_)
        )
    }

    /// The offending field name for validation errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            MonerisError::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}

impl From<quick_xml::DeError> for MonerisError {
    fn from(err: quick_xml::DeError) -> Self {
        MonerisError::XmlError(err.to_string())
    }
}

/// Result type alias for Moneris operations.
pub type Result<T> = std::result::Result<T, MonerisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MonerisError::validation("orderNumber", "must be at most 50 characters");
        assert_eq!(
            err.to_string(),
            "Invalid orderNumber: must be at most 50 characters"
        );
        assert_eq!(err.field(), Some("orderNumber"));
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: MonerisError = json_err.into();
        assert!(matches!(err, MonerisError::JsonError(_)));
        assert!(!err.is_preflight());
    }

    #[test]
    fn test_preflight_classification() {
        assert!(MonerisError::InvalidPaymentMethod("test".to_string()).is_preflight());
        assert!(MonerisError::InvalidTransactionReference("test".to_string()).is_preflight());
        assert!(MonerisError::from(CardError::Expired).is_preflight());
        assert!(!MonerisError::UnexpectedStatus(502).is_preflight());
        assert_eq!(MonerisError::UnexpectedStatus(502).field(), None);
    }
}
