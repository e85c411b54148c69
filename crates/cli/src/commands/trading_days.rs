//! Trading-day count between two dates.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use condor_core::DayCountConvention;
use condor_range::count_trading_days;

/// Arguments for the trading-days command.
#[derive(Args, Debug)]
pub struct TradingDaysArgs {
    /// First day (YYYY-MM-DD), counted
    #[arg(long)]
    pub from: NaiveDate,

    /// Expiry day (YYYY-MM-DD), counted
    #[arg(long)]
    pub to: NaiveDate,

    /// Add one day to any non-empty range
    #[arg(long)]
    pub plus_one: bool,
}

impl TradingDaysArgs {
    fn convention(&self) -> DayCountConvention {
        if self.plus_one {
            DayCountConvention::InclusivePlusOne
        } else {
            DayCountConvention::Inclusive
        }
    }
}

/// Prints the weekday count.
pub fn run(args: TradingDaysArgs) -> Result<()> {
    let days = count_trading_days(args.from, args.to, args.convention());
    println!("{days}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convention_from_flag() {
        let mut args = TradingDaysArgs {
            from: NaiveDate::from_ymd_opt(2024, 10, 21).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 10, 25).unwrap(),
            plus_one: false,
        };
        assert_eq!(args.convention(), DayCountConvention::Inclusive);
        args.plus_one = true;
        assert_eq!(args.convention(), DayCountConvention::InclusivePlusOne);
        run(args).unwrap();
    }
}
