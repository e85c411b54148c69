//! Error types for the range calculation.

use thiserror::Error;

use crate::types::QuoteLeg;

/// Errors raised by the range and strike calculations.
///
/// Every variant is a precondition failure; no partial results are returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    /// An argument is outside its valid domain.
    #[error("invalid input: {field} {reason}")]
    InvalidInput {
        /// Name of the offending argument.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// An implied volatility quote needed for the band was not published.
    #[error("missing implied volatility quote: {leg} at strike {strike}")]
    MissingQuote {
        /// Which of the four quotes is absent.
        leg: QuoteLeg,
        /// Strike the quote was looked up at.
        strike: i64,
    },
}

impl RangeError {
    /// Creates an invalid input error.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Creates a missing quote error.
    #[must_use]
    pub const fn missing_quote(leg: QuoteLeg, strike: i64) -> Self {
        Self::MissingQuote { leg, strike }
    }

    /// True when the failure comes from absent market data rather than bad arguments.
    #[must_use]
    pub const fn is_data_gap(&self) -> bool {
        matches!(self, Self::MissingQuote { .. })
    }
}

/// Result type alias for range operations.
pub type Result<T> = std::result::Result<T, RangeError>;

/// Rejects non-finite or non-positive values.
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(RangeError::invalid(field, format!("must be finite, got {value}")));
    }
    if value <= 0.0 {
        return Err(RangeError::invalid(field, format!("must be positive, got {value}")));
    }
    Ok(())
}

pub(crate) fn ensure_positive_step(step: i64) -> Result<()> {
    if step <= 0 {
        return Err(RangeError::invalid("step_size", format!("must be positive, got {step}")));
    }
    Ok(())
}
