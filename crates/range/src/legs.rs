//! Iron-condor leg selection from volatility bands.
//!
//! The sold legs come from the inner band rounded outward onto the strike
//! grid. The bought legs follow exactly one [`OuterLegPolicy`]:
//! - `FixedOffset`: a fixed number of strikes beyond the sold legs
//! - `SecondBand`: a second, wider band rounded outward the same way

use condor_core::{OuterLegPolicy, RoundingMode};
use tracing::info;

use crate::error::{ensure_positive_step, RangeError, Result};
use crate::range::compute_range;
use crate::strikes::snap;
use crate::types::{
    CondorPlan, MarketObservation, ResolvedVolatility, StrategyLegs, VolatilityRangeResult,
};

/// Placement of the outer legs, already resolved to concrete inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OuterLegs {
    /// Pad the inner legs by this many strikes on each side.
    FixedOffset { padding_steps: i64 },
    /// Round this band outward.
    Band { lower: f64, upper: f64 },
}

/// Rounds a band onto the strike grid: lower bound down, upper bound up.
fn round_outward(field: &'static str, lower: f64, upper: f64, step: i64) -> Result<(i64, i64)> {
    Ok((
        snap(field, lower, step, RoundingMode::Floor)?,
        snap(field, upper, step, RoundingMode::Ceiling)?,
    ))
}

/// Widens the inner legs by `padding_steps` strikes on each side.
fn pad_outward(inner_lower: i64, inner_upper: i64, padding_steps: i64, step: i64) -> Result<(i64, i64)> {
    if padding_steps < 0 {
        return Err(RangeError::invalid(
            "padding_steps",
            format!("must not be negative, got {padding_steps}"),
        ));
    }
    let overflow = || RangeError::invalid("padding_steps", format!("{padding_steps} strikes overflows the strike grid"));
    let pad = padding_steps.checked_mul(step).ok_or_else(overflow)?;
    let lower = inner_lower.checked_sub(pad).ok_or_else(overflow)?;
    let upper = inner_upper.checked_add(pad).ok_or_else(overflow)?;
    Ok((lower, upper))
}

fn validate_bounds(field: &'static str, lower: f64, upper: f64) -> Result<()> {
    if !lower.is_finite() || !upper.is_finite() {
        return Err(RangeError::invalid(field, format!("bounds must be finite, got [{lower}, {upper}]")));
    }
    if lower <= 0.0 {
        return Err(RangeError::invalid(field, format!("lower bound must be positive, got {lower}")));
    }
    if lower > upper {
        return Err(RangeError::invalid(field, format!("lower bound {lower} exceeds upper bound {upper}")));
    }
    Ok(())
}

/// Derives the four strikes from the inner band and an outer placement.
///
/// # Errors
/// `InvalidInput` for a non-positive step, malformed bounds, a negative or
/// overflowing padding, an outer band inside the inner band, or any leg at or
/// below zero.
pub fn derive_legs(lower: f64, upper: f64, step: i64, outer: OuterLegs) -> Result<StrategyLegs> {
    ensure_positive_step(step)?;
    validate_bounds("inner_band", lower, upper)?;

    let (inner_lower, inner_upper) = round_outward("inner_band", lower, upper, step)?;

    let (outer_lower, outer_upper) = match outer {
        OuterLegs::FixedOffset { padding_steps } => {
            pad_outward(inner_lower, inner_upper, padding_steps, step)?
        }
        OuterLegs::Band { lower: outer_lo, upper: outer_hi } => {
            validate_bounds("outer_band", outer_lo, outer_hi)?;
            if outer_lo > lower || outer_hi < upper {
                return Err(RangeError::invalid(
                    "outer_band",
                    format!("[{outer_lo}, {outer_hi}] does not contain inner band [{lower}, {upper}]"),
                ));
            }
            round_outward("outer_band", outer_lo, outer_hi, step)?
        }
    };

    let legs = StrategyLegs {
        inner_lower,
        inner_upper,
        outer_lower,
        outer_upper,
    };

    if legs.outer_lower <= 0 || legs.inner_lower <= 0 {
        return Err(RangeError::invalid(
            "legs",
            format!("strikes must be positive, got put legs {outer_lower}/{inner_lower}"),
        ));
    }

    debug_assert!(legs.is_ordered());
    Ok(legs)
}

/// Computes the inner band, resolves the outer policy and derives the legs.
///
/// Under `SecondBand` the outer band is a second [`compute_range`] call with
/// the policy's multiplier, which must be at least `sd_multiplier`.
///
/// # Errors
/// Any error from [`compute_range`] or [`derive_legs`].
pub fn plan_condor(
    observation: &MarketObservation,
    volatility: &ResolvedVolatility,
    sd_multiplier: f64,
    policy: OuterLegPolicy,
) -> Result<CondorPlan> {
    let inner = compute_range(observation, volatility, sd_multiplier)?;

    let (outer_band, outer): (Option<VolatilityRangeResult>, OuterLegs) = match policy {
        OuterLegPolicy::FixedOffset { padding_steps } => {
            (None, OuterLegs::FixedOffset { padding_steps })
        }
        OuterLegPolicy::SecondBand { sd_multiplier: outer_multiplier } => {
            if outer_multiplier.is_nan() || outer_multiplier < sd_multiplier {
                return Err(RangeError::invalid(
                    "outer_sd_multiplier",
                    format!("{outer_multiplier} is narrower than inner multiplier {sd_multiplier}"),
                ));
            }
            let band = compute_range(observation, volatility, outer_multiplier)?;
            (
                Some(band),
                OuterLegs::Band {
                    lower: band.lower_bound,
                    upper: band.upper_bound,
                },
            )
        }
    };

    let legs = derive_legs(inner.lower_bound, inner.upper_bound, observation.step_size, outer)?;

    info!(
        price = observation.last_traded_price,
        days = observation.trading_days_to_expiry,
        %policy,
        sell_put = legs.inner_lower,
        sell_call = legs.inner_upper,
        buy_put = legs.outer_lower,
        buy_call = legs.outer_upper,
        "Condor legs derived"
    );

    Ok(CondorPlan {
        observation: *observation,
        volatility: *volatility,
        inner,
        outer: outer_band,
        policy,
        legs,
    })
}
