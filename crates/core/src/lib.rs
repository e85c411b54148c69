pub mod config;
pub mod config_loader;
pub mod market;
pub mod policy;
pub mod traits;

pub use config::{AppConfig, DiscordConfig, NseConfig, StrategyConfig};
pub use config_loader::ConfigLoader;
pub use market::{ChainRow, IndexSymbol, MarketSnapshot, UnknownSymbol};
pub use policy::{
    DayCountConvention, MissingQuotePolicy, OuterLegPolicy, PolicyParseError, RoundingMode,
    DEFAULT_OUTER_SD_MULTIPLIER, DEFAULT_PADDING_STEPS,
};
pub use traits::MarketDataProvider;
