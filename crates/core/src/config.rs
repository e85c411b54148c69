use std::fmt;

use serde::{Deserialize, Serialize};

use crate::market::IndexSymbol;
use crate::policy::{DayCountConvention, MissingQuotePolicy, OuterLegPolicy};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub nse: NseConfig,
    pub strategy: StrategyConfig,
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NseConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for NseConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.nseindia.com".to_string(),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub symbol: IndexSymbol,
    /// Strike interval override; the symbol's own step when absent.
    pub step: Option<i64>,
    /// Width of the inner band in standard deviations.
    pub sd_multiplier: f64,
    pub outer_legs: OuterLegPolicy,
    pub missing_quotes: MissingQuotePolicy,
    pub day_count: DayCountConvention,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            symbol: IndexSymbol::Nifty,
            step: None,
            sd_multiplier: 1.0,
            outer_legs: OuterLegPolicy::default(),
            missing_quotes: MissingQuotePolicy::default(),
            day_count: DayCountConvention::default(),
        }
    }
}

impl StrategyConfig {
    /// Strike interval in effect for the configured symbol.
    #[must_use]
    pub fn effective_step(&self) -> i64 {
        self.step.unwrap_or_else(|| self.symbol.default_step())
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    pub webhook_url: Option<String>,
    pub username: Option<String>,
    pub footer: String,
    pub color: u32,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            username: None,
            footer: "Generated by condor".to_string(),
            color: 5_814_783,
        }
    }
}

// The webhook URL embeds its token, keep it out of logs.
impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("webhook_url", &self.webhook_url.as_ref().map(|_| "[REDACTED]"))
            .field("username", &self.username)
            .field("footer", &self.footer)
            .field("color", &self.color)
            .finish()
    }
}
