use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.binance.com/api/v3";

/// Seed price/change shown for a symbol before the first successful fetch.
#[derive(Debug, Clone, Copy)]
pub struct SeedQuote {
    pub price: f64,
    pub change_24h: f64,
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub api_base: String,
    /// Tracked symbols; the set is fixed for the lifetime of the feed.
    pub symbols: Vec<String>,
    /// Reference symbol used for the historical chart.
    pub chart_symbol: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub seed_quotes: HashMap<String, SeedQuote>,
}

impl FeedConfig {
    pub fn builtin() -> Self {
        let seed_quotes = HashMap::from([
            (
                "BTCUSDT".to_string(),
                SeedQuote {
                    price: 64200.0,
                    change_24h: 2.45,
                },
            ),
            (
                "ETHUSDT".to_string(),
                SeedQuote {
                    price: 3450.0,
                    change_24h: 1.82,
                },
            ),
        ]);

        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            symbols: vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()],
            chart_symbol: "BTCUSDT".to_string(),
            poll_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
            seed_quotes,
        }
    }

    pub fn seed_for(&self, symbol: &str) -> SeedQuote {
        self.seed_quotes.get(symbol).copied().unwrap_or(SeedQuote {
            price: 0.0,
            change_24h: 0.0,
        })
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::builtin()
    }
}
