//! NSE India market data for the condor analysis.
//!
//! This crate provides:
//! - A cookie-primed session against the NSE public site
//! - Index last-traded-price lookup from the all-indices listing
//! - Option chain implied volatilities for the nearest expiry
//! - A [`condor_core::MarketDataProvider`] implementation
//!
//! # API Endpoints
//!
//! - `GET /option-chain` - HTML page, sets session cookies
//! - `GET /api/allIndices` - Index quotes
//! - `GET /api/option-chain-indices?symbol={SYMBOL}` - Index option chain

pub mod client;
pub mod error;
pub mod types;

pub use client::{NseClient, NseSession, ALL_INDICES_PATH, COOKIE_PRIMING_PATH, OPTION_CHAIN_PATH};
pub use error::{NseError, Result};
pub use types::{parse_expiry, OptionChain, EXPIRY_FORMAT};
