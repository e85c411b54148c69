use crate::market::{IndexSymbol, MarketSnapshot};
use anyhow::Result;
use async_trait::async_trait;

/// Source of index price and option-chain volatility for one expiry.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches the underlying price and the nearest expiry's chain.
    async fn snapshot(&self, symbol: IndexSymbol) -> Result<MarketSnapshot>;

    fn name(&self) -> &str;
}
