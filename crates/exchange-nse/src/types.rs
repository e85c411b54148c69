//! Wire types for the NSE JSON endpoints.
//!
//! Only the fields the range calculation needs are modelled; everything else
//! in the payloads is ignored.

use chrono::NaiveDate;
use condor_core::ChainRow;
use serde::Deserialize;

use crate::error::{NseError, Result};

/// Date format used throughout the option chain payload (e.g. `24-Oct-2024`).
pub const EXPIRY_FORMAT: &str = "%d-%b-%Y";

/// `GET /api/allIndices`
#[derive(Debug, Clone, Deserialize)]
pub struct AllIndicesResponse {
    #[serde(default)]
    pub data: Vec<IndexQuote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexQuote {
    pub index: String,
    pub last: f64,
}

/// `GET /api/option-chain-indices?symbol=...`
///
/// NSE answers `{}` when the session cookies were not accepted, hence the
/// optional `records`.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionChainResponse {
    pub records: Option<ChainRecords>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRecords {
    #[serde(default)]
    pub expiry_dates: Vec<String>,
    #[serde(default)]
    pub data: Vec<RawChainRow>,
    pub underlying_value: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawChainRow {
    pub strike_price: f64,
    pub expiry_date: String,
    #[serde(rename = "CE")]
    pub ce: Option<RawOptionQuote>,
    #[serde(rename = "PE")]
    pub pe: Option<RawOptionQuote>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOptionQuote {
    pub implied_volatility: Option<f64>,
}

impl From<&RawChainRow> for ChainRow {
    fn from(raw: &RawChainRow) -> Self {
        Self {
            strike: raw.strike_price.round() as i64,
            call_iv: raw.ce.as_ref().and_then(|q| q.implied_volatility),
            put_iv: raw.pe.as_ref().and_then(|q| q.implied_volatility),
        }
    }
}

/// Parses an NSE expiry string.
pub fn parse_expiry(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), EXPIRY_FORMAT)
        .map_err(|e| NseError::Parse(format!("invalid expiry date '{s}': {e}")))
}

/// One expiry's slice of the option chain.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionChain {
    pub expiry: NaiveDate,
    pub rows: Vec<ChainRow>,
}

impl ChainRecords {
    /// Earliest listed expiry.
    pub fn nearest_expiry(&self) -> Result<Option<NaiveDate>> {
        let mut nearest: Option<NaiveDate> = None;
        for raw in &self.expiry_dates {
            let date = parse_expiry(raw)?;
            nearest = Some(nearest.map_or(date, |n| n.min(date)));
        }
        Ok(nearest)
    }

    /// Rows for one expiry, ascending by strike.
    ///
    /// Rows whose expiry string does not parse belong to no expiry and are
    /// skipped.
    #[must_use]
    pub fn rows_for(&self, expiry: NaiveDate) -> Vec<ChainRow> {
        let mut rows: Vec<ChainRow> = self
            .data
            .iter()
            .filter(|r| parse_expiry(&r.expiry_date).is_ok_and(|d| d == expiry))
            .map(ChainRow::from)
            .collect();
        rows.sort_by_key(|r| r.strike);
        rows
    }
}
