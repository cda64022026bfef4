//! Error types and retry classification for the option-chain data crate.
//!
//! This module provides:
//! - [`ChainDataError`]: The main error enum for all fetch and parse operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while fetching or decoding provider data.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method, which determines whether the
/// caller backs off, fails over, or skips the current ticker.
#[derive(Error, Debug)]
pub enum ChainDataError {
    /// The provider is throttling us (HTTP 429 with a long reset window,
    /// or 429/509 after exhausting in-place retries).
    /// Retryable; the quote path reacts by switching providers.
    #[error("throttled by {provider}")]
    Throttled {
        /// The provider that throttled the request
        provider: String,
    },

    /// The provider returned a status outside 200/203/429/509.
    /// Fatal for this request.
    #[error("unexpected status {status} from {provider}")]
    UnexpectedStatus {
        /// The provider that returned the status
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// The response body could not be decoded as JSON, or had the wrong
    /// shape. Fatal for this request.
    #[error("malformed response from {provider}: {message}")]
    MalformedResponse {
        /// The provider that returned the body
        provider: String,
        /// What went wrong during decoding
        message: String,
    },

    /// An expected key was absent from an otherwise well-formed document.
    /// Fatal for this request; the error names the offending key.
    #[error("missing field: {field}")]
    MissingField {
        /// The JSON key that was expected
        field: String,
    },

    /// No expirations at or before the requested cutoff date.
    /// Terminal for this ticker.
    #[error("no expirations at or before cutoff for {ticker}")]
    NoExpirations {
        /// The ticker with an empty usable chain
        ticker: String,
    },

    /// A provider was constructed with an unusable credential.
    /// Fatal at startup; the batch never begins.
    #[error("invalid credential for {provider}")]
    Credential {
        /// The provider whose credential was rejected
        provider: String,
    },

    /// A transport-level error occurred while talking to a provider.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ChainDataError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use optionchain_data::errors::{ChainDataError, RetryClass};
    ///
    /// let error = ChainDataError::Throttled { provider: "finnhub".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::Backoff);
    ///
    /// let error = ChainDataError::MissingField { field: "bid".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Throttled { .. } => RetryClass::Backoff,

            Self::UnexpectedStatus { .. }
            | Self::MalformedResponse { .. }
            | Self::MissingField { .. }
            | Self::NoExpirations { .. }
            | Self::Credential { .. }
            | Self::Network(_) => RetryClass::Never,
        }
    }

    /// True if a retry or failover could still succeed.
    pub fn is_retryable(&self) -> bool {
        self.retry_class() == RetryClass::Backoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttled_retries_with_backoff() {
        let error = ChainDataError::Throttled {
            provider: "finnhub".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Backoff);
        assert!(error.is_retryable());
    }

    #[test]
    fn test_unexpected_status_never_retries() {
        let error = ChainDataError::UnexpectedStatus {
            provider: "tradeking".to_string(),
            status: 500,
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_malformed_response_never_retries() {
        let error = ChainDataError::MalformedResponse {
            provider: "marketdata".to_string(),
            message: "unexpected end of input".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_missing_field_never_retries() {
        let error = ChainDataError::MissingField {
            field: "underlyingPrice".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_credential_never_retries() {
        let error = ChainDataError::Credential {
            provider: "tradeking".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_error_display() {
        let error = ChainDataError::Throttled {
            provider: "finnhub".to_string(),
        };
        assert_eq!(format!("{}", error), "throttled by finnhub");

        let error = ChainDataError::MissingField {
            field: "strike".to_string(),
        };
        assert_eq!(format!("{}", error), "missing field: strike");

        let error = ChainDataError::UnexpectedStatus {
            provider: "marketdata".to_string(),
            status: 404,
        };
        assert_eq!(
            format!("{}", error),
            "unexpected status 404 from marketdata"
        );
    }
}
