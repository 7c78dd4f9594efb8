use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Latest traded price and 24h percent change for one tracked symbol.
///
/// The `*_stale` flags mark fields that still carry a seed default or a
/// retained previous value because the upstream payload could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quote {
    pub price: f64,
    pub change_24h: f64,
    pub price_stale: bool,
    pub change_stale: bool,
}

impl Quote {
    /// A seed default shown before the first successful fetch.
    pub fn seed(price: f64, change_24h: f64) -> Self {
        Self {
            price,
            change_24h,
            price_stale: true,
            change_stale: true,
        }
    }

    pub fn live(price: f64, change_24h: f64) -> Self {
        Self {
            price,
            change_24h,
            price_stale: false,
            change_stale: false,
        }
    }
}

/// One entry per tracked symbol, always fully populated.
pub type QuoteSet = HashMap<String, Quote>;

/// User-selectable chart range; each maps to a provider interval/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Period {
    Intraday,
    Week,
    Month,
    Year,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::Intraday,
        Period::Week,
        Period::Month,
        Period::Year,
    ];

    /// Parse a display label. Unrecognized labels fall back to intraday
    /// rather than failing.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "1W" => Period::Week,
            "1M" => Period::Month,
            "1Y" => Period::Year,
            _ => Period::Intraday,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Intraday => "1D",
            Period::Week => "1W",
            Period::Month => "1M",
            Period::Year => "1Y",
        }
    }

    /// Provider kline interval and row limit for this range.
    pub fn params(&self) -> (&'static str, u32) {
        match self {
            Period::Intraday => ("5m", 288),
            Period::Week => ("1h", 168),
            Period::Month => ("4h", 180),
            Period::Year => ("1d", 365),
        }
    }

    pub fn interval(&self) -> &'static str {
        self.params().0
    }

    pub fn limit(&self) -> u32 {
        self.params().1
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::Intraday
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandlePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

/// Close prices ordered ascending by open time. An empty series is the
/// "no data" state, distinct from a cycle that is still loading.
pub type CandleSeries = Vec<CandlePoint>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_labels_round_trip() {
        for period in Period::ALL {
            assert_eq!(Period::parse(period.label()), period);
        }
    }

    #[test]
    fn period_mapping_matches_provider_table() {
        assert_eq!(Period::parse("1D").params(), ("5m", 288));
        assert_eq!(Period::parse("1W").params(), ("1h", 168));
        assert_eq!(Period::parse("1M").params(), ("4h", 180));
        assert_eq!(Period::parse("1Y").params(), ("1d", 365));
    }

    #[test]
    fn unknown_period_falls_back_to_intraday() {
        assert_eq!(Period::parse("unknown"), Period::Intraday);
        assert_eq!(Period::parse(""), Period::Intraday);
        assert_eq!(Period::parse("unknown").params(), Period::Intraday.params());
    }

    #[test]
    fn period_parse_accepts_lowercase_labels() {
        assert_eq!(Period::parse("1w"), Period::Week);
        assert_eq!(Period::parse(" 1y "), Period::Year);
    }

    #[test]
    fn seed_quotes_are_marked_stale() {
        let quote = Quote::seed(64200.0, 2.45);
        assert!(quote.price_stale);
        assert!(quote.change_stale);
        assert!(!Quote::live(64200.0, 2.45).price_stale);
    }
}
