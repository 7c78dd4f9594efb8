use std::collections::HashMap;

use futures::future;
use reqwest::Client;
use serde::Deserialize;

use crate::config::FeedConfig;
use crate::error::{Context, FeedError};
use crate::fetch::FetchResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TickerPayload {
    last_price: String,
    price_change_percent: String,
}

/// Quote fields straight off the wire. `None` marks a field whose payload
/// value failed numeric parsing; the policy layer substitutes the last
/// known value instead of failing the symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedQuote {
    pub price: Option<f64>,
    pub change_24h: Option<f64>,
}

pub type ParsedQuoteSet = HashMap<String, ParsedQuote>;

/// Fetches 24h ticker statistics for the tracked symbols concurrently.
///
/// The call succeeds only when every symbol request succeeds at the
/// transport level; a single network error or non-2xx status fails the
/// whole cycle, and the policy layer retains the previous quote set.
pub struct QuoteFetcher {
    client: Client,
    api_base: String,
    symbols: Vec<String>,
}

impl QuoteFetcher {
    pub fn new(config: &FeedConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to construct quote HTTP client")?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            symbols: config.symbols.clone(),
        })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Issue one request per tracked symbol, jointly awaited. Fails as a
    /// whole if any request fails; no partial merge happens here.
    pub async fn fetch_quotes(&self) -> FetchResult<ParsedQuoteSet> {
        let requests = self.symbols.iter().map(|symbol| self.fetch_symbol(symbol));
        let rows = future::try_join_all(requests).await?;
        Ok(rows.into_iter().collect())
    }

    async fn fetch_symbol(&self, symbol: &str) -> FetchResult<(String, ParsedQuote)> {
        let url = format!("{}/ticker/24hr?symbol={}", self.api_base, symbol);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Status {
                symbol: symbol.to_string(),
                status: response.status(),
            });
        }

        let body = response.text().await?;
        let quote = decode_ticker(&body)
            .with_context(|| format!("Failed to decode ticker payload for {}", symbol))?;

        Ok((symbol.to_string(), quote))
    }
}

fn decode_ticker(body: &str) -> FetchResult<ParsedQuote> {
    let payload: TickerPayload = serde_json::from_str(body)?;

    Ok(ParsedQuote {
        price: parse_price(&payload.last_price),
        change_24h: parse_change(&payload.price_change_percent),
    })
}

/// Prices must be finite and non-negative; anything else is zero-confidence.
fn parse_price(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

fn parse_change(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}
