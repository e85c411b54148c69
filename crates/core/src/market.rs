//! Market snapshot types shared between data providers and the range service.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index underlyings the tool knows how to analyse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexSymbol {
    Nifty,
    BankNifty,
}

impl IndexSymbol {
    /// Ticker used by the option-chain endpoint (e.g. "NIFTY").
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nifty => "NIFTY",
            Self::BankNifty => "BANKNIFTY",
        }
    }

    /// Name of the index in the all-indices listing.
    #[must_use]
    pub const fn index_name(&self) -> &'static str {
        match self {
            Self::Nifty => "NIFTY 50",
            Self::BankNifty => "NIFTY BANK",
        }
    }

    /// Exchange strike interval for the index.
    #[must_use]
    pub const fn default_step(&self) -> i64 {
        match self {
            Self::Nifty => 50,
            Self::BankNifty => 100,
        }
    }
}

impl fmt::Display for IndexSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a symbol string is not a supported index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown index symbol '{0}' (expected NIFTY or BANKNIFTY)")]
pub struct UnknownSymbol(pub String);

impl FromStr for IndexSymbol {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NIFTY" | "NIFTY50" | "NIFTY 50" => Ok(Self::Nifty),
            "BANKNIFTY" | "NIFTYBANK" | "NIFTY BANK" => Ok(Self::BankNifty),
            _ => Err(UnknownSymbol(s.to_string())),
        }
    }
}

/// Implied volatility quotes for one strike of one expiry.
///
/// `None` means the exchange published no quote for that side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainRow {
    pub strike: i64,
    pub call_iv: Option<f64>,
    pub put_iv: Option<f64>,
}

/// Everything the range calculation needs from the market, for one expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: IndexSymbol,
    /// Last traded price of the underlying index.
    pub last_price: f64,
    /// Nearest listed expiry; `rows` are filtered to it.
    pub expiry: NaiveDate,
    pub rows: Vec<ChainRow>,
    pub fetched_at: DateTime<Utc>,
}

impl MarketSnapshot {
    /// Row for an exact strike, if listed.
    #[must_use]
    pub fn row_at(&self, strike: i64) -> Option<&ChainRow> {
        self.rows.iter().find(|r| r.strike == strike)
    }

    #[must_use]
    pub fn call_iv_at(&self, strike: i64) -> Option<f64> {
        self.row_at(strike).and_then(|r| r.call_iv)
    }

    #[must_use]
    pub fn put_iv_at(&self, strike: i64) -> Option<f64> {
        self.row_at(strike).and_then(|r| r.put_iv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot {
            symbol: IndexSymbol::Nifty,
            last_price: 24_480.5,
            expiry: NaiveDate::from_ymd_opt(2024, 10, 24).unwrap(),
            rows: vec![
                ChainRow { strike: 24_550, call_iv: Some(12.1), put_iv: None },
                ChainRow { strike: 24_500, call_iv: Some(12.4), put_iv: Some(13.0) },
            ],
            fetched_at: Utc::now(),
        }
    }

    // ==================== Symbol Tests ====================

    #[test]
    fn test_parses_symbols_case_insensitively() {
        assert_eq!("nifty".parse::<IndexSymbol>().unwrap(), IndexSymbol::Nifty);
        assert_eq!("BankNifty".parse::<IndexSymbol>().unwrap(), IndexSymbol::BankNifty);
        assert_eq!("NIFTY BANK".parse::<IndexSymbol>().unwrap(), IndexSymbol::BankNifty);
        assert!("FINNIFTY".parse::<IndexSymbol>().is_err());
    }

    #[test]
    fn test_symbol_metadata() {
        assert_eq!(IndexSymbol::Nifty.index_name(), "NIFTY 50");
        assert_eq!(IndexSymbol::BankNifty.index_name(), "NIFTY BANK");
        assert_eq!(IndexSymbol::Nifty.default_step(), 50);
        assert_eq!(IndexSymbol::BankNifty.default_step(), 100);
        assert_eq!(IndexSymbol::BankNifty.to_string(), "BANKNIFTY");
    }

    #[test]
    fn test_symbol_serializes_uppercase() {
        let json = serde_json::to_string(&IndexSymbol::BankNifty).unwrap();
        assert_eq!(json, "\"BANKNIFTY\"");
    }

    // ==================== Snapshot Tests ====================

    #[test]
    fn test_iv_lookup_by_strike() {
        let snap = snapshot();
        assert_eq!(snap.call_iv_at(24_500), Some(12.4));
        assert_eq!(snap.put_iv_at(24_500), Some(13.0));
        assert_eq!(snap.put_iv_at(24_550), None);
        assert_eq!(snap.call_iv_at(24_600), None);
    }
}
