//! Value types for the range calculation.

use std::fmt;

use condor_core::{MarketSnapshot, MissingQuotePolicy, OuterLegPolicy};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ensure_positive, ensure_positive_step, RangeError, Result};

/// Market inputs for one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketObservation {
    pub last_traded_price: f64,
    /// Strike interval (50 for NIFTY, 100 for BANKNIFTY).
    pub step_size: i64,
    pub trading_days_to_expiry: i64,
}

impl MarketObservation {
    #[must_use]
    pub const fn new(last_traded_price: f64, step_size: i64, trading_days_to_expiry: i64) -> Self {
        Self {
            last_traded_price,
            step_size,
            trading_days_to_expiry,
        }
    }

    /// Checks price, step and day count preconditions.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("last_traded_price", self.last_traded_price)?;
        ensure_positive_step(self.step_size)?;
        if self.trading_days_to_expiry < 0 {
            return Err(RangeError::invalid(
                "trading_days_to_expiry",
                format!("must not be negative, got {}", self.trading_days_to_expiry),
            ));
        }
        Ok(())
    }
}

/// One of the four quotes that feed the cumulative IV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteLeg {
    CallAtm,
    CallNext,
    PutAtm,
    PutNext,
}

impl fmt::Display for QuoteLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CallAtm => write!(f, "call (ATM)"),
            Self::CallNext => write!(f, "call (next strike)"),
            Self::PutAtm => write!(f, "put (ATM)"),
            Self::PutNext => write!(f, "put (next strike)"),
        }
    }
}

/// Implied volatility quotes as observed, in percent. `None` = not published.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpliedVolatilityQuote {
    pub atm_strike: i64,
    pub next_strike: i64,
    pub call_atm: Option<f64>,
    pub call_next: Option<f64>,
    pub put_atm: Option<f64>,
    pub put_next: Option<f64>,
}

impl ImpliedVolatilityQuote {
    /// Looks up the ATM and next-strike quotes in a chain snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &MarketSnapshot, atm_strike: i64, next_strike: i64) -> Self {
        Self {
            atm_strike,
            next_strike,
            call_atm: snapshot.call_iv_at(atm_strike),
            call_next: snapshot.call_iv_at(next_strike),
            put_atm: snapshot.put_iv_at(atm_strike),
            put_next: snapshot.put_iv_at(next_strike),
        }
    }

    fn legs(&self) -> [(QuoteLeg, i64, Option<f64>); 4] {
        [
            (QuoteLeg::CallAtm, self.atm_strike, self.call_atm),
            (QuoteLeg::CallNext, self.next_strike, self.call_next),
            (QuoteLeg::PutAtm, self.atm_strike, self.put_atm),
            (QuoteLeg::PutNext, self.next_strike, self.put_next),
        ]
    }

    /// Absent quotes, in calculation order.
    #[must_use]
    pub fn missing(&self) -> Vec<QuoteLeg> {
        self.legs()
            .iter()
            .filter(|(_, _, v)| v.is_none())
            .map(|(leg, _, _)| *leg)
            .collect()
    }

    /// Applies the missing-quote policy and yields four usable values.
    pub fn resolve(&self, policy: MissingQuotePolicy) -> Result<ResolvedVolatility> {
        let mut values = [0.0; 4];
        for (slot, (leg, strike, value)) in values.iter_mut().zip(self.legs()) {
            *slot = match (value, policy) {
                (Some(v), _) => v,
                (None, MissingQuotePolicy::Reject) => {
                    return Err(RangeError::missing_quote(leg, strike));
                }
                (None, MissingQuotePolicy::TreatAsZero) => {
                    warn!(%leg, strike, "Implied volatility missing, substituting 0%");
                    0.0
                }
            };
        }
        ResolvedVolatility::new(values)
    }
}

/// Four implied volatility percentages ready for the band formula.
///
/// Order: call ATM, call next, put ATM, put next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedVolatility {
    values: [f64; 4],
}

impl ResolvedVolatility {
    /// Wraps four percentages; each must be finite and non-negative.
    pub fn new(values: [f64; 4]) -> Result<Self> {
        for v in values {
            if !v.is_finite() || v < 0.0 {
                return Err(RangeError::invalid(
                    "implied_volatility",
                    format!("must be a finite non-negative percentage, got {v}"),
                ));
            }
        }
        Ok(Self { values })
    }

    /// Parses a comma-separated list of exactly four percentages.
    pub fn parse_list(s: &str) -> Result<Self> {
        let parsed: std::result::Result<Vec<f64>, _> =
            s.split(',').map(|p| p.trim().parse::<f64>()).collect();
        let parsed = parsed.map_err(|e| {
            RangeError::invalid("implied_volatility", format!("'{s}' is not a number list: {e}"))
        })?;
        let values: [f64; 4] = parsed.try_into().map_err(|v: Vec<f64>| {
            RangeError::invalid("implied_volatility", format!("expected 4 values, got {}", v.len()))
        })?;
        Self::new(values)
    }

    #[must_use]
    pub const fn values(&self) -> [f64; 4] {
        self.values
    }

    /// Arithmetic mean of the four quotes.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / 4.0
    }
}

/// Output of the band formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityRangeResult {
    /// Mean of the four quotes, annualised percent.
    pub cumulative_iv: f64,
    /// Percent per trading day.
    pub daily_volatility: f64,
    /// Percent over the days to expiry.
    pub period_volatility: f64,
    pub sd_multiplier: f64,
    /// Fractional half-width of the band.
    pub band_fraction: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl VolatilityRangeResult {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }

    /// True when the band has collapsed onto the price.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.band_fraction == 0.0
    }
}

/// The four strikes of the condor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyLegs {
    /// Sold put.
    pub inner_lower: i64,
    /// Sold call.
    pub inner_upper: i64,
    /// Bought put.
    pub outer_lower: i64,
    /// Bought call.
    pub outer_upper: i64,
}

impl StrategyLegs {
    #[must_use]
    pub const fn is_ordered(&self) -> bool {
        self.outer_lower <= self.inner_lower
            && self.inner_lower <= self.inner_upper
            && self.inner_upper <= self.outer_upper
    }

    #[must_use]
    pub const fn put_wing_width(&self) -> i64 {
        self.inner_lower - self.outer_lower
    }

    #[must_use]
    pub const fn call_wing_width(&self) -> i64 {
        self.outer_upper - self.inner_upper
    }

    /// Legs as orders: sells first, then buys.
    #[must_use]
    pub fn orders(&self) -> [LegOrder; 4] {
        [
            LegOrder::new(LegAction::Sell, OptionRight::Put, self.inner_lower),
            LegOrder::new(LegAction::Sell, OptionRight::Call, self.inner_upper),
            LegOrder::new(LegAction::Buy, OptionRight::Put, self.outer_lower),
            LegOrder::new(LegAction::Buy, OptionRight::Call, self.outer_upper),
        ]
    }
}

/// Options contract right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionRight {
    Call,
    Put,
}

impl fmt::Display for OptionRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => write!(f, "CE"),
            Self::Put => write!(f, "PE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegAction {
    Buy,
    Sell,
}

impl fmt::Display for LegAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// One leg of the structure as a trade instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegOrder {
    pub action: LegAction,
    pub right: OptionRight,
    pub strike: i64,
}

impl LegOrder {
    #[must_use]
    pub const fn new(action: LegAction, right: OptionRight, strike: i64) -> Self {
        Self {
            action,
            right,
            strike,
        }
    }
}

/// A complete condor derivation: inputs, bands and legs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CondorPlan {
    pub observation: MarketObservation,
    pub volatility: ResolvedVolatility,
    /// Band that places the sold legs.
    pub inner: VolatilityRangeResult,
    /// Wider band that placed the bought legs, under the second-band policy.
    pub outer: Option<VolatilityRangeResult>,
    pub policy: OuterLegPolicy,
    pub legs: StrategyLegs,
}
