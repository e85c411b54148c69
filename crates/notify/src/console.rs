//! Plain-text report for terminals and dry runs.

use std::fmt::Write as _;

use async_trait::async_trait;
use condor_range::{CondorReport, ReportPublisher};

use crate::embed::DISPLAY_DATE_FORMAT;

/// Renders a report as an aligned text block.
#[must_use]
pub fn render_text(report: &CondorReport) -> String {
    let plan = &report.plan;
    let inner = &plan.inner;
    let band = report.band_label();
    let days = report.trading_days();
    let mut out = String::new();

    // writing into a String cannot fail
    let _ = writeln!(out, "{} Option Chain Analysis", report.symbol);
    let _ = writeln!(out, "Data fetched on {}", report.as_of.format(DISPLAY_DATE_FORMAT));
    let _ = writeln!(out);
    let _ = writeln!(out, "  Expiry            {}", report.expiry.format(DISPLAY_DATE_FORMAT));
    let _ = writeln!(out, "  Time to expiry    {days} trading days");
    let _ = writeln!(out, "  Last traded price {}", report.last_price);
    let _ = writeln!(out, "  Nearest strike    {}", report.atm_strike);
    let _ = writeln!(out);
    let _ = writeln!(out, "  CIV               {:.2}%", inner.cumulative_iv);
    let _ = writeln!(out, "  DV                {:.2}%", inner.daily_volatility);
    let _ = writeln!(out, "  MV                {:.2}% for {days} days", inner.period_volatility);
    let _ = writeln!(out, "  Lower {band:<11} {:.2}", inner.lower_bound);
    let _ = writeln!(out, "  Upper {band:<11} {:.2}", inner.upper_bound);
    if let Some(outer) = &plan.outer {
        let outer_band = format!("{}SD", outer.sd_multiplier);
        let _ = writeln!(out, "  Lower {outer_band:<11} {:.2}", outer.lower_bound);
        let _ = writeln!(out, "  Upper {outer_band:<11} {:.2}", outer.upper_bound);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "  Iron condor ({})", plan.policy);
    for (action, contract) in report.leg_lines() {
        let _ = writeln!(out, "    {action:<4} {contract}");
    }
    out
}

/// Prints reports to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePublisher;

#[async_trait]
impl ReportPublisher for ConsolePublisher {
    async fn publish(&self, report: &CondorReport) -> anyhow::Result<()> {
        println!("{}", render_text(report));
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
