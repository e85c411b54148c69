//! CLI commands for the condor range tool.

pub mod analyze;
pub mod calc;
pub mod trading_days;

pub use analyze::AnalyzeArgs;
pub use calc::CalcArgs;
pub use trading_days::TradingDaysArgs;
