pub mod config;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod market;
pub mod state;
pub mod utils;

pub use config::FeedConfig;
pub use error::{FeedError, Result};
pub use feed::{CandleSource, MarketFeed, QuoteSource};
pub use market::{CandlePoint, CandleSeries, Period, Quote, QuoteSet};
pub use state::DashboardState;
