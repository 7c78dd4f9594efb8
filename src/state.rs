use std::collections::HashMap;

use crate::config::FeedConfig;
use crate::fetch::ParsedQuoteSet;
use crate::market::{CandleSeries, Period, Quote, QuoteSet};

/// View model owned by the pipeline and observed by the render layer.
///
/// Every fetch cycle lands here through one of the `apply_*` methods, which
/// encode the fallback discipline: successful quote cycles replace the set
/// wholesale, failed ones retain the previous set, and only individual
/// unparseable fields fall back to their last known value.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub quotes: QuoteSet,
    pub candles: CandleSeries,
    pub period: Period,
    pub quotes_loading: bool,
    pub candles_loading: bool,
}

impl DashboardState {
    /// Seed the view model with the configured defaults so the render layer
    /// always has a fully populated quote set, even before the first fetch.
    pub fn seeded(config: &FeedConfig) -> Self {
        let quotes = config
            .symbols
            .iter()
            .map(|symbol| {
                let seed = config.seed_for(symbol);
                (symbol.clone(), Quote::seed(seed.price, seed.change_24h))
            })
            .collect();

        Self {
            quotes,
            candles: Vec::new(),
            period: Period::default(),
            quotes_loading: false,
            candles_loading: false,
        }
    }

    pub fn begin_quotes_cycle(&mut self) {
        self.quotes_loading = true;
    }

    /// Replace the quote set wholesale. A field that failed to parse keeps
    /// its previous value (or the seed default before the first success) and
    /// is flagged stale; everything else comes in fresh.
    pub fn apply_quotes_success(&mut self, parsed: ParsedQuoteSet) {
        let mut next = HashMap::with_capacity(parsed.len());

        for (symbol, incoming) in parsed {
            let previous = self.quotes.get(&symbol);

            let (price, price_stale) = match incoming.price {
                Some(value) => (value, false),
                None => (previous.map(|q| q.price).unwrap_or(0.0), true),
            };
            let (change_24h, change_stale) = match incoming.change_24h {
                Some(value) => (value, false),
                None => (previous.map(|q| q.change_24h).unwrap_or(0.0), true),
            };

            next.insert(
                symbol,
                Quote {
                    price,
                    change_24h,
                    price_stale,
                    change_stale,
                },
            );
        }

        self.quotes = next;
        self.quotes_loading = false;
    }

    /// A failed cycle leaves the previous quote set untouched; hardcoded
    /// defaults never reappear once real data has been obtained.
    pub fn apply_quotes_failure(&mut self) {
        self.quotes_loading = false;
    }

    pub fn begin_candles_cycle(&mut self, period: Period) {
        self.period = period;
        self.candles_loading = true;
    }

    pub fn apply_candles_success(&mut self, series: CandleSeries) {
        self.candles = series;
        self.candles_loading = false;
    }

    /// Stale chart data is worse than none: a failed fetch clears the
    /// series so the render layer shows an explicit "no data" state.
    pub fn apply_candles_failure(&mut self) {
        self.candles.clear();
        self.candles_loading = false;
    }
}
