//! Error types for report publishing.

use thiserror::Error;

/// Errors that can occur while delivering a report.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Network error, including timeouts.
    #[error("network error: {0}")]
    Network(String),

    /// Webhook answered with a non-success status.
    #[error("webhook error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Response body.
        message: String,
    },

    /// Payload could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// No webhook URL was configured.
    #[error("no Discord webhook URL configured (set DISCORD_WEBHOOK_URL or discord.webhook_url)")]
    MissingWebhook,
}

impl NotifyError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Returns true if the error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status_code, .. } => *status_code == 429 || *status_code >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest errors carry the request URL, which holds the webhook token
        Self::Network(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for NotifyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for publishing operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
