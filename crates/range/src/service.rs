//! One analysis run: fetch a snapshot, derive the condor, publish the report.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use condor_core::{
    DayCountConvention, IndexSymbol, MarketDataProvider, MarketSnapshot, MissingQuotePolicy,
    OuterLegPolicy, StrategyConfig,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::calendar::count_trading_days;
use crate::error::RangeError;
use crate::legs::plan_condor;
use crate::strikes::nearest_strike;
use crate::types::{CondorPlan, ImpliedVolatilityQuote, LegOrder, MarketObservation};

/// Destination for a finished report (webhook, console, ...).
#[async_trait]
pub trait ReportPublisher: Send + Sync {
    async fn publish(&self, report: &CondorReport) -> Result<()>;

    fn name(&self) -> &str;
}

/// Calculation choices for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CondorSettings {
    pub symbol: IndexSymbol,
    pub step: i64,
    pub sd_multiplier: f64,
    pub outer_legs: OuterLegPolicy,
    pub missing_quotes: MissingQuotePolicy,
    pub day_count: DayCountConvention,
}

impl From<&StrategyConfig> for CondorSettings {
    fn from(cfg: &StrategyConfig) -> Self {
        Self {
            symbol: cfg.symbol,
            step: cfg.effective_step(),
            sd_multiplier: cfg.sd_multiplier,
            outer_legs: cfg.outer_legs,
            missing_quotes: cfg.missing_quotes,
            day_count: cfg.day_count,
        }
    }
}

impl Default for CondorSettings {
    fn default() -> Self {
        Self::from(&StrategyConfig::default())
    }
}

/// Everything a publisher needs to render one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondorReport {
    pub symbol: IndexSymbol,
    /// Date the analysis was run.
    pub as_of: NaiveDate,
    pub expiry: NaiveDate,
    pub last_price: f64,
    pub atm_strike: i64,
    pub quote: ImpliedVolatilityQuote,
    pub plan: CondorPlan,
}

impl CondorReport {
    #[must_use]
    pub const fn step(&self) -> i64 {
        self.plan.observation.step_size
    }

    #[must_use]
    pub const fn trading_days(&self) -> i64 {
        self.plan.observation.trading_days_to_expiry
    }

    /// Expiry in contract-name form, e.g. `24-OCT`.
    #[must_use]
    pub fn expiry_tag(&self) -> String {
        self.expiry.format("%d-%b").to_string().to_uppercase()
    }

    /// Band name for headings, e.g. `1SD` or `1.3SD`.
    #[must_use]
    pub fn band_label(&self) -> String {
        format!("{}SD", self.plan.inner.sd_multiplier)
    }

    /// Contract description for one leg, e.g. `NIFTY 24-OCT PE 24050`.
    #[must_use]
    pub fn contract(&self, order: &LegOrder) -> String {
        format!("{} {} {} {}", self.symbol, self.expiry_tag(), order.right, order.strike)
    }

    /// The four legs as `(action, contract)` lines, sells first.
    #[must_use]
    pub fn leg_lines(&self) -> Vec<(String, String)> {
        self.plan
            .legs
            .orders()
            .iter()
            .map(|o| (o.action.to_string(), self.contract(o)))
            .collect()
    }
}

/// Derives a report from a snapshot without any I/O.
///
/// # Errors
/// Range errors for invalid market data or a missing quote under
/// [`MissingQuotePolicy::Reject`].
pub fn build_report(
    snapshot: &MarketSnapshot,
    settings: &CondorSettings,
    today: NaiveDate,
) -> crate::error::Result<CondorReport> {
    let step = settings.step;
    let atm_strike = nearest_strike(snapshot.last_price, step)?;
    let next_strike = atm_strike
        .checked_add(step)
        .ok_or_else(|| RangeError::invalid("price", format!("no strike listed above {atm_strike}")))?;

    let quote = ImpliedVolatilityQuote::from_snapshot(snapshot, atm_strike, next_strike);
    let volatility = quote.resolve(settings.missing_quotes)?;

    let days = count_trading_days(today, snapshot.expiry, settings.day_count);
    let observation = MarketObservation::new(snapshot.last_price, step, days);

    let plan = plan_condor(&observation, &volatility, settings.sd_multiplier, settings.outer_legs)?;

    Ok(CondorReport {
        symbol: snapshot.symbol,
        as_of: today,
        expiry: snapshot.expiry,
        last_price: snapshot.last_price,
        atm_strike,
        quote,
        plan,
    })
}

/// Runs one analysis against a market data provider.
pub struct CondorService {
    provider: Arc<dyn MarketDataProvider>,
    publishers: Vec<Arc<dyn ReportPublisher>>,
    settings: CondorSettings,
}

impl CondorService {
    #[must_use]
    pub fn new(provider: Arc<dyn MarketDataProvider>, settings: CondorSettings) -> Self {
        Self {
            provider,
            publishers: Vec::new(),
            settings,
        }
    }

    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn ReportPublisher>) -> Self {
        self.publishers.push(publisher);
        self
    }

    #[must_use]
    pub const fn settings(&self) -> &CondorSettings {
        &self.settings
    }

    /// Fetches, calculates and publishes.
    ///
    /// Every publisher is attempted; the run fails afterwards if any of them did.
    pub async fn run(&self, today: NaiveDate) -> Result<CondorReport> {
        let symbol = self.settings.symbol;
        info!(
            %symbol,
            provider = self.provider.name(),
            step = self.settings.step,
            outer = %self.settings.outer_legs,
            "Starting condor analysis"
        );

        let snapshot = self
            .provider
            .snapshot(symbol)
            .await
            .with_context(|| format!("Failed to fetch {symbol} snapshot from {}", self.provider.name()))?;

        info!(
            %symbol,
            last_price = snapshot.last_price,
            expiry = %snapshot.expiry,
            strikes = snapshot.rows.len(),
            "Snapshot received"
        );

        let report = build_report(&snapshot, &self.settings, today)
            .with_context(|| format!("Failed to derive condor for {symbol}"))?;

        let mut failed = Vec::new();
        for publisher in &self.publishers {
            match publisher.publish(&report).await {
                Ok(()) => info!(publisher = publisher.name(), "Report published"),
                Err(e) => {
                    error!(publisher = publisher.name(), error = %e, "Failed to publish report");
                    failed.push(publisher.name().to_string());
                }
            }
        }

        if !failed.is_empty() {
            bail!(
                "{} of {} publishers failed: {}",
                failed.len(),
                self.publishers.len(),
                failed.join(", ")
            );
        }

        Ok(report)
    }
}
