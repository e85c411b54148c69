//! Snapping prices onto the exchange strike grid.

use condor_core::RoundingMode;

use crate::error::{ensure_positive, ensure_positive_step, RangeError, Result};

/// Smallest listed strike at or above `price`.
///
/// # Errors
/// `InvalidInput` for a non-positive price or step, or a price too large
/// for the strike grid.
pub fn nearest_strike(price: f64, step: i64) -> Result<i64> {
    round_strike(price, step, RoundingMode::Ceiling)
}

/// Rounds `price` to a multiple of `step` using the given mode.
///
/// # Errors
/// `InvalidInput` for a non-positive price or step, or a price too large
/// for the strike grid.
pub fn round_strike(price: f64, step: i64, mode: RoundingMode) -> Result<i64> {
    ensure_positive("price", price)?;
    ensure_positive_step(step)?;
    snap("price", price, step, mode)
}

/// Grid snap for a finite value and a positive step.
///
/// Fails when the strike would not fit in an `i64`.
pub(crate) fn snap(field: &'static str, value: f64, step: i64, mode: RoundingMode) -> Result<i64> {
    let units = value / step as f64;
    let units = match mode {
        RoundingMode::Nearest => units.round(),
        RoundingMode::Floor => units.floor(),
        RoundingMode::Ceiling => units.ceil(),
    };
    // i64::MAX as f64 is 2^63, so anything strictly inside casts exactly
    if !units.is_finite() || units.abs() >= i64::MAX as f64 {
        return Err(out_of_grid(field, value));
    }
    (units as i64)
        .checked_mul(step)
        .ok_or_else(|| out_of_grid(field, value))
}

fn out_of_grid(field: &'static str, value: f64) -> RangeError {
    RangeError::invalid(field, format!("{value} is outside the strike grid range"))
}
