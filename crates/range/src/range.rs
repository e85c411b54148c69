//! Volatility band around the last traded price.
//!
//! The band is the classic one-standard-deviation move implied by at-the-money
//! volatility, scaled by a multiplier:
//!
//! ```text
//! civ    = mean(call_atm, call_next, put_atm, put_next)
//! daily  = civ / sqrt(252)
//! period = daily * sqrt(days)
//! band   = (period / 100) * multiplier
//! lower  = price * (1 - band),  upper = price * (1 + band)
//! ```

use tracing::debug;

use crate::error::{ensure_positive, Result};
use crate::types::{MarketObservation, ResolvedVolatility, VolatilityRangeResult};

/// Annual trading-day count used to de-annualise volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Multiplier for a one standard deviation band.
pub const ONE_SD: f64 = 1.0;

/// Computes the volatility band for an observation.
///
/// Zero days to expiry or all-zero volatility collapses the band onto the
/// price; that is a valid result, not an error.
///
/// # Errors
/// `InvalidInput` for a non-positive price or step, negative days, or a
/// non-positive multiplier.
pub fn compute_range(
    observation: &MarketObservation,
    volatility: &ResolvedVolatility,
    sd_multiplier: f64,
) -> Result<VolatilityRangeResult> {
    observation.validate()?;
    ensure_positive("sd_multiplier", sd_multiplier)?;

    let price = observation.last_traded_price;
    let cumulative_iv = volatility.mean();
    let daily_volatility = cumulative_iv / TRADING_DAYS_PER_YEAR.sqrt();
    let period_volatility = daily_volatility * (observation.trading_days_to_expiry as f64).sqrt();
    let band_fraction = (period_volatility / 100.0) * sd_multiplier;

    let result = VolatilityRangeResult {
        cumulative_iv,
        daily_volatility,
        period_volatility,
        sd_multiplier,
        band_fraction,
        lower_bound: price * (1.0 - band_fraction),
        upper_bound: price * (1.0 + band_fraction),
    };

    debug!(
        price,
        days = observation.trading_days_to_expiry,
        civ = cumulative_iv,
        period_vol = period_volatility,
        lower = result.lower_bound,
        upper = result.upper_bound,
        "Computed volatility range"
    );

    Ok(result)
}
