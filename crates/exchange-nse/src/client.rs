//! NSE public-site client.
//!
//! The JSON endpoints only answer browsers that already hold the cookies set
//! by the option-chain page, so every [`NseSession`] starts by loading that
//! page into its own cookie jar.
//!
//! # Example
//!
//! ```ignore
//! use condor_core::{IndexSymbol, NseConfig};
//! use condor_nse::NseSession;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let session = NseSession::open(&NseConfig::default()).await?;
//!     let spot = session.index_quote(IndexSymbol::Nifty).await?;
//!     let chain = session.option_chain(IndexSymbol::Nifty).await?;
//!     println!("NIFTY {spot} expiry {} ({} strikes)", chain.expiry, chain.rows.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use condor_core::{IndexSymbol, MarketDataProvider, MarketSnapshot, NseConfig};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, CONNECTION, REFERER};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{NseError, Result};
use crate::types::{AllIndicesResponse, OptionChain, OptionChainResponse};

// =============================================================================
// Constants
// =============================================================================

/// Page that sets the session cookies.
pub const COOKIE_PRIMING_PATH: &str = "/option-chain";

pub const ALL_INDICES_PATH: &str = "/api/allIndices";

pub const OPTION_CHAIN_PATH: &str = "/api/option-chain-indices";

fn browser_headers(base_url: &str) -> Result<HeaderMap> {
    let referer = HeaderValue::from_str(&format!("{}/", base_url.trim_end_matches('/')))
        .map_err(|e| NseError::Configuration(format!("invalid base url '{base_url}': {e}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(REFERER, referer);
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    Ok(headers)
}

// =============================================================================
// NseSession
// =============================================================================

/// A primed browser-like session against the NSE site.
///
/// Owns its cookie jar; drop it when the run is over.
pub struct NseSession {
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for NseSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NseSession")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl NseSession {
    /// Builds the HTTP client and primes its cookie jar.
    ///
    /// # Errors
    /// Returns error if the client cannot be built or the priming page does
    /// not answer with a success status.
    pub async fn open(config: &NseConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let http = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.as_str())
            .default_headers(browser_headers(&base_url)?)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NseError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let session = Self { base_url, http };
        session.prime_cookies().await?;
        Ok(session)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn prime_cookies(&self) -> Result<()> {
        let url = format!("{}{}", self.base_url, COOKIE_PRIMING_PATH);
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(NseError::api(status.as_u16(), text));
        }

        let cookies = response.cookies().count();
        if cookies == 0 {
            warn!(url = %url, "Priming page set no cookies, API calls may be rejected");
        } else {
            debug!(cookies, "Session cookies primed");
        }
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(NseError::api(status.as_u16(), text));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Last traded price of an index.
    ///
    /// # Errors
    /// Returns `IndexNotFound` if the listing does not contain the index.
    pub async fn index_quote(&self, symbol: IndexSymbol) -> Result<f64> {
        let listing: AllIndicesResponse = self.get(ALL_INDICES_PATH).await?;
        let name = symbol.index_name();

        listing
            .data
            .iter()
            .find(|q| q.index == name)
            .map(|q| q.last)
            .ok_or_else(|| NseError::index_not_found(name))
    }

    /// Option chain rows for the nearest listed expiry.
    ///
    /// # Errors
    /// Returns `Parse` for an empty payload and `NoExpiry` if no expiry is listed.
    pub async fn option_chain(&self, symbol: IndexSymbol) -> Result<OptionChain> {
        let path = format!("{}?symbol={}", OPTION_CHAIN_PATH, symbol.as_str());
        let response: OptionChainResponse = self.get(&path).await?;

        let records = response.records.ok_or_else(|| {
            NseError::Parse("option chain response has no records (session rejected?)".to_string())
        })?;

        let expiry = records
            .nearest_expiry()?
            .ok_or_else(|| NseError::no_expiry(symbol.as_str()))?;

        Ok(OptionChain {
            expiry,
            rows: records.rows_for(expiry),
        })
    }
}

// =============================================================================
// NseClient
// =============================================================================

/// [`MarketDataProvider`] backed by the NSE site.
///
/// Opens a fresh session for every snapshot.
#[derive(Debug, Clone, Default)]
pub struct NseClient {
    config: NseConfig,
}

impl NseClient {
    #[must_use]
    pub const fn new(config: NseConfig) -> Self {
        Self { config }
    }

    /// Sets a custom base URL (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    #[must_use]
    pub fn config(&self) -> &NseConfig {
        &self.config
    }

    /// Fetches the index price and the nearest expiry's chain in one session.
    ///
    /// # Errors
    /// Any session, HTTP or payload error.
    pub async fn fetch_snapshot(&self, symbol: IndexSymbol) -> Result<MarketSnapshot> {
        let session = NseSession::open(&self.config).await?;
        let last_price = session.index_quote(symbol).await?;
        let chain = session.option_chain(symbol).await?;

        info!(
            %symbol,
            last_price,
            expiry = %chain.expiry,
            strikes = chain.rows.len(),
            "Fetched NSE option chain"
        );

        Ok(MarketSnapshot {
            symbol,
            last_price,
            expiry: chain.expiry,
            rows: chain.rows,
            fetched_at: Utc::now(),
        })
    }
}

#[async_trait]
impl MarketDataProvider for NseClient {
    async fn snapshot(&self, symbol: IndexSymbol) -> anyhow::Result<MarketSnapshot> {
        self.fetch_snapshot(symbol)
            .await
            .with_context(|| format!("NSE request failed for {symbol}"))
    }

    fn name(&self) -> &str {
        "nse"
    }
}
