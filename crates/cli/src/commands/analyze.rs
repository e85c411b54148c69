//! Live analysis: NSE snapshot -> condor -> Discord / console.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use clap::Args;
use condor_core::{AppConfig, ConfigLoader, IndexSymbol, MissingQuotePolicy, OuterLegPolicy};
use condor_nse::{NseClient, NseError};
use condor_notify::{ConsolePublisher, DiscordWebhook};
use condor_range::{CondorService, CondorSettings, RangeError};
use tracing::{info, warn};

/// India Standard Time, UTC+05:30.
const IST_OFFSET_MINUTES: i64 = 330;

/// Arguments for the analyze command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Index to analyse (NIFTY or BANKNIFTY). Defaults to the configured symbol.
    #[arg(short, long)]
    pub symbol: Option<IndexSymbol>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Config profile layered over config/Config.toml (config/Config.<profile>.toml)
    #[arg(long, conflicts_with = "config")]
    pub profile: Option<String>,

    /// Discord webhook URL
    #[arg(long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Print the report without posting to Discord
    #[arg(long)]
    pub dry_run: bool,

    /// Outer leg placement: fixed[:steps] or band[:multiplier]
    #[arg(long)]
    pub outer: Option<OuterLegPolicy>,

    /// Inner band width in standard deviations
    #[arg(long)]
    pub sd: Option<f64>,

    /// Substitute 0% for missing implied volatility quotes instead of failing
    #[arg(long)]
    pub allow_missing_iv: bool,

    /// Analysis date (YYYY-MM-DD). Defaults to today in IST.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl AnalyzeArgs {
    fn load_config(&self) -> Result<AppConfig> {
        match (&self.config, &self.profile) {
            (Some(path), _) => ConfigLoader::load_from(path),
            (None, Some(profile)) => ConfigLoader::load_with_profile(profile),
            (None, None) => ConfigLoader::load(),
        }
    }

    /// Folds command-line overrides into the loaded configuration.
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(symbol) = self.symbol {
            if symbol != config.strategy.symbol {
                // a configured step belongs to the configured symbol
                config.strategy.step = None;
            }
            config.strategy.symbol = symbol;
        }
        if let Some(outer) = self.outer {
            config.strategy.outer_legs = outer;
        }
        if let Some(sd) = self.sd {
            config.strategy.sd_multiplier = sd;
        }
        if self.allow_missing_iv {
            config.strategy.missing_quotes = MissingQuotePolicy::TreatAsZero;
        }
        if let Some(url) = &self.webhook_url {
            config.discord.webhook_url = Some(url.clone());
        }
    }
}

/// Today's date on the exchange's clock.
fn exchange_today() -> NaiveDate {
    (Utc::now() + Duration::minutes(IST_OFFSET_MINUTES)).date_naive()
}

/// Runs one live analysis.
pub async fn run(args: AnalyzeArgs) -> Result<()> {
    let mut config = args.load_config()?;
    args.apply_overrides(&mut config);

    let settings = CondorSettings::from(&config.strategy);
    let today = args.date.unwrap_or_else(exchange_today);

    info!(
        symbol = %settings.symbol,
        %today,
        dry_run = args.dry_run,
        "Running condor analysis"
    );

    let provider = Arc::new(NseClient::new(config.nse.clone()));
    let mut service = CondorService::new(provider, settings).with_publisher(Arc::new(ConsolePublisher));

    if args.dry_run {
        info!("Dry run, Discord delivery skipped");
    } else {
        let webhook = DiscordWebhook::from_config(&config.discord)
            .context("Discord delivery requested; pass --dry-run to only print the report")?;
        service = service.with_publisher(Arc::new(webhook));
    }

    if let Err(err) = service.run(today).await {
        if err
            .chain()
            .find_map(|e| e.downcast_ref::<NseError>())
            .is_some_and(NseError::is_transient)
        {
            warn!("NSE rejected or dropped the session; retrying in a minute usually helps");
        }
        if err
            .chain()
            .find_map(|e| e.downcast_ref::<RangeError>())
            .is_some_and(RangeError::is_data_gap)
        {
            warn!("An ATM quote is missing; --allow-missing-iv substitutes 0% for it");
        }
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> AnalyzeArgs {
        AnalyzeArgs {
            symbol: None,
            config: None,
            profile: None,
            webhook_url: None,
            dry_run: false,
            outer: None,
            sd: None,
            allow_missing_iv: false,
            date: None,
        }
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = AppConfig::default();
        config.strategy.step = Some(25);
        args().apply_overrides(&mut config);

        assert_eq!(config.strategy.symbol, IndexSymbol::Nifty);
        assert_eq!(config.strategy.step, Some(25));
        assert!(config.discord.webhook_url.is_none());
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = AppConfig::default();
        config.strategy.step = Some(25);

        let a = AnalyzeArgs {
            symbol: Some(IndexSymbol::BankNifty),
            webhook_url: Some("https://discord.example/hook".to_string()),
            outer: Some(OuterLegPolicy::SecondBand { sd_multiplier: 1.5 }),
            sd: Some(1.2),
            allow_missing_iv: true,
            ..args()
        };
        a.apply_overrides(&mut config);

        assert_eq!(config.strategy.symbol, IndexSymbol::BankNifty);
        assert_eq!(config.strategy.effective_step(), 100);
        assert_eq!(config.strategy.outer_legs, OuterLegPolicy::SecondBand { sd_multiplier: 1.5 });
        assert!((config.strategy.sd_multiplier - 1.2).abs() < f64::EPSILON);
        assert_eq!(config.strategy.missing_quotes, MissingQuotePolicy::TreatAsZero);
        assert_eq!(config.discord.webhook_url.as_deref(), Some("https://discord.example/hook"));
    }

    #[test]
    fn test_same_symbol_keeps_step() {
        let mut config = AppConfig::default();
        config.strategy.step = Some(25);
        let a = AnalyzeArgs {
            symbol: Some(IndexSymbol::Nifty),
            ..args()
        };
        a.apply_overrides(&mut config);
        assert_eq!(config.strategy.step, Some(25));
    }
}
