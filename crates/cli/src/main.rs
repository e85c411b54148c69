use clap::{Parser, Subcommand};

mod commands;

use commands::{AnalyzeArgs, CalcArgs, TradingDaysArgs};

#[derive(Parser)]
#[command(name = "condor")]
#[command(about = "Volatility range and iron-condor strikes for NSE index options", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch live NSE data, derive the condor and publish the report
    Analyze(AnalyzeArgs),
    /// Compute the range and legs from explicit inputs
    Calc(CalcArgs),
    /// Count trading days between two dates
    TradingDays(TradingDaysArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze(args) => {
            commands::analyze::run(args).await?;
        }
        Commands::Calc(args) => {
            commands::calc::run(args)?;
        }
        Commands::TradingDays(args) => {
            commands::trading_days::run(args)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use condor_core::{IndexSymbol, OuterLegPolicy, RoundingMode};

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_calc() {
        let cli = Cli::try_parse_from([
            "condor", "calc", "--price", "24500", "--days", "5", "--iv", "12,13,12.5,13.5",
            "--outer", "band:1.3",
        ])
        .unwrap();

        let Commands::Calc(args) = cli.command else {
            panic!("expected calc");
        };
        assert_eq!(args.step, 50);
        assert_eq!(args.outer, OuterLegPolicy::SecondBand { sd_multiplier: 1.3 });
        assert_eq!(args.iv.values(), [12.0, 13.0, 12.5, 13.5]);
        assert_eq!(args.atm_rounding, RoundingMode::Ceiling);
    }

    #[test]
    fn test_parse_calc_atm_rounding() {
        let cli = Cli::try_parse_from([
            "condor", "calc", "--price", "24524", "--days", "5", "--iv", "12,13,12.5,13.5",
            "--atm-rounding", "nearest",
        ])
        .unwrap();

        let Commands::Calc(args) = cli.command else {
            panic!("expected calc");
        };
        assert_eq!(args.atm_rounding, RoundingMode::Nearest);

        assert!(Cli::try_parse_from([
            "condor", "calc", "--price", "24524", "--days", "5", "--iv", "12,13,12.5,13.5",
            "--atm-rounding", "banker",
        ])
        .is_err());
    }

    #[test]
    fn test_parse_calc_rejects_short_iv_list() {
        assert!(Cli::try_parse_from([
            "condor", "calc", "--price", "24500", "--days", "5", "--iv", "12,13",
        ])
        .is_err());
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "condor", "analyze", "--symbol", "banknifty", "--dry-run", "--date", "2024-10-21",
        ])
        .unwrap();

        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.symbol, Some(IndexSymbol::BankNifty));
        assert!(args.dry_run);
        assert_eq!(args.date.map(|d| d.to_string()).as_deref(), Some("2024-10-21"));
    }

    #[test]
    fn test_parse_analyze_rejects_unknown_symbol() {
        assert!(Cli::try_parse_from(["condor", "analyze", "--symbol", "SENSEX"]).is_err());
    }

    #[test]
    fn test_parse_trading_days() {
        let cli = Cli::try_parse_from([
            "condor", "trading-days", "--from", "2024-10-21", "--to", "2024-10-25", "--plus-one",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::TradingDays(TradingDaysArgs { plus_one: true, .. })));
    }
}
