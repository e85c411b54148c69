//! Error types for the NSE client.

use thiserror::Error;

/// Errors that can occur when talking to the NSE public site.
#[derive(Debug, Error)]
pub enum NseError {
    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Non-success HTTP status.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Response body or reason.
        message: String,
    },

    /// Response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The index is absent from the all-indices listing.
    #[error("index not found: {index}")]
    IndexNotFound {
        /// Listing name that was searched for (e.g. "NIFTY 50").
        index: String,
    },

    /// The option chain lists no usable expiry.
    #[error("no expiry listed for {symbol}")]
    NoExpiry {
        /// Option chain symbol.
        symbol: String,
    },

    /// Client could not be configured.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl NseError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates an index not found error.
    pub fn index_not_found(index: impl Into<String>) -> Self {
        Self::IndexNotFound {
            index: index.into(),
        }
    }

    /// Creates a no expiry error.
    pub fn no_expiry(symbol: impl Into<String>) -> Self {
        Self::NoExpiry {
            symbol: symbol.into(),
        }
    }

    /// True when a later attempt could plausibly succeed.
    ///
    /// NSE answers 401/403 when the session cookies were not accepted, which
    /// usually clears up with a fresh session.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Api { status_code, .. } => {
                *status_code >= 500 || *status_code == 401 || *status_code == 403
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for NseError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for NseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type alias for NSE operations.
pub type Result<T> = std::result::Result<T, NseError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Error Construction Tests ====================

    #[test]
    fn test_api_error_construction() {
        let err = NseError::api(403, "Access Denied");
        assert!(matches!(err, NseError::Api { status_code: 403, .. }));
        assert!(err.to_string().contains("403"));
        assert!(err.to_string().contains("Access Denied"));
    }

    #[test]
    fn test_index_not_found_error() {
        let err = NseError::index_not_found("NIFTY BANK");
        assert!(err.to_string().contains("NIFTY BANK"));
    }

    #[test]
    fn test_no_expiry_error() {
        let err = NseError::no_expiry("BANKNIFTY");
        assert!(err.to_string().contains("BANKNIFTY"));
    }

    #[test]
    fn test_parse_error_from_json() {
        let err: NseError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, NseError::Parse(_)));
    }

    // ==================== Transient Tests ====================

    #[test]
    fn test_network_and_timeout_are_transient() {
        assert!(NseError::Network("reset".to_string()).is_transient());
        assert!(NseError::Timeout("10s".to_string()).is_transient());
    }

    #[test]
    fn test_rejected_session_is_transient() {
        assert!(NseError::api(401, "").is_transient());
        assert!(NseError::api(403, "").is_transient());
        assert!(NseError::api(503, "").is_transient());
    }

    #[test]
    fn test_data_errors_are_not_transient() {
        assert!(!NseError::api(404, "").is_transient());
        assert!(!NseError::Parse("bad".to_string()).is_transient());
        assert!(!NseError::index_not_found("X").is_transient());
        assert!(!NseError::no_expiry("NIFTY").is_transient());
    }
}
