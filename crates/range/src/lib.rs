//! Volatility range and iron-condor strike selection.
//!
//! The calculation is pure and synchronous:
//! - [`range::compute_range`] turns four ATM implied volatilities into a
//!   price band around the last traded price
//! - [`legs::plan_condor`] snaps the band onto the strike grid and places
//!   the sold and bought legs
//! - [`calendar::count_trading_days`] supplies the time to expiry
//!
//! [`service::CondorService`] wires a market data provider and report
//! publishers around it for one analysis run.

pub mod calendar;
pub mod error;
pub mod legs;
pub mod range;
pub mod service;
pub mod strikes;
pub mod types;

pub use calendar::{count_trading_days, is_trading_day};
pub use error::{RangeError, Result};
pub use legs::{derive_legs, plan_condor, OuterLegs};
pub use range::{compute_range, ONE_SD, TRADING_DAYS_PER_YEAR};
pub use service::{build_report, CondorReport, CondorService, CondorSettings, ReportPublisher};
pub use strikes::{nearest_strike, round_strike};
pub use types::{
    CondorPlan, ImpliedVolatilityQuote, LegAction, LegOrder, MarketObservation, OptionRight,
    QuoteLeg, ResolvedVolatility, StrategyLegs, VolatilityRangeResult,
};
