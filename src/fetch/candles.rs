use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde_json::Value;

use crate::config::FeedConfig;
use crate::error::{Context, FeedError};
use crate::fetch::FetchResult;
use crate::market::{CandlePoint, CandleSeries, Period};

/// Fetches kline history for the chart reference symbol.
pub struct CandleFetcher {
    client: Client,
    api_base: String,
    symbol: String,
}

impl CandleFetcher {
    pub fn new(config: &FeedConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to construct candle HTTP client")?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            symbol: config.chart_symbol.clone(),
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub async fn fetch_candles(&self, period: Period) -> FetchResult<CandleSeries> {
        let (interval, limit) = period.params();
        let url = format!(
            "{}/klines?symbol={}&interval={}&limit={}",
            self.api_base, self.symbol, interval, limit
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Status {
                symbol: self.symbol.clone(),
                status: response.status(),
            });
        }

        let body = response.text().await?;
        decode_klines(&body)
            .with_context(|| format!("Failed to decode kline payload for {}", self.symbol))
            .map_err(FeedError::from)
    }
}

/// Transform raw kline rows into chart points.
///
/// Rows are positional: `[openTime, open, high, low, close, ...]` with
/// `openTime` in epoch milliseconds and `close` as a decimal string. Only
/// positions 0 and 4 are kept. The provider returns rows ascending by open
/// time and that ordering is preserved as-is; rows with a malformed
/// timestamp or close are skipped.
fn decode_klines(body: &str) -> FetchResult<CandleSeries> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)?;

    let mut series = Vec::with_capacity(rows.len());
    for row in &rows {
        let Some(open_time) = row.first().and_then(Value::as_i64) else {
            continue;
        };
        let Some(close) = row.get(4).and_then(parse_number) else {
            continue;
        };
        let Some(timestamp) = Utc.timestamp_millis_opt(open_time).single() else {
            continue;
        };

        series.push(CandlePoint { timestamp, close });
    }

    Ok(series)
}

fn parse_number(value: &Value) -> Option<f64> {
    value
        .as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .or_else(|| value.as_f64())
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_open_time_and_close_only() {
        let body = r#"[
            [1700000000000, "100", "110", "90", "105", "42.0", 1700000299999, "0", 10, "0", "0", "0"]
        ]"#;

        let series = decode_klines(body).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].timestamp.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(series[0].close, 105.0);
    }

    #[test]
    fn preserves_provider_ordering() {
        let body = r#"[
            [1700000000000, "1", "1", "1", "10"],
            [1700000300000, "1", "1", "1", "20"],
            [1700000600000, "1", "1", "1", "30"]
        ]"#;

        let series = decode_klines(body).unwrap();
        let closes: Vec<f64> = series.iter().map(|point| point.close).collect();
        assert_eq!(closes, vec![10.0, 20.0, 30.0]);
        assert!(series[0].timestamp < series[2].timestamp);
    }

    #[test]
    fn skips_rows_with_malformed_close() {
        let body = r#"[
            [1700000000000, "1", "1", "1", "10"],
            [1700000300000, "1", "1", "1", "not-a-price"],
            [1700000600000, "1", "1", "1", "30"]
        ]"#;

        let series = decode_klines(body).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].close, 30.0);
    }

    #[test]
    fn accepts_numeric_close_values() {
        let body = r#"[[1700000000000, "1", "1", "1", 105.5]]"#;
        let series = decode_klines(body).unwrap();
        assert_eq!(series[0].close, 105.5);
    }

    #[test]
    fn empty_payload_is_a_valid_empty_series() {
        assert!(decode_klines("[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(decode_klines("<html>oops</html>").is_err());
        assert!(decode_klines(r#"{"code": -1121}"#).is_err());
    }
}
