use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::FeedConfig;
use crate::fetch::{CandleFetcher, FetchResult, ParsedQuoteSet, QuoteFetcher};
use crate::market::{CandleSeries, Period};
use crate::state::DashboardState;

/// Source of one quote cycle's worth of parsed ticker data.
pub trait QuoteSource: Send + Sync + 'static {
    fn fetch_quotes(&self) -> impl Future<Output = FetchResult<ParsedQuoteSet>> + Send;
}

/// Source of one candle series for a requested period.
pub trait CandleSource: Send + Sync + 'static {
    fn fetch_candles(&self, period: Period)
        -> impl Future<Output = FetchResult<CandleSeries>> + Send;
}

impl QuoteSource for QuoteFetcher {
    async fn fetch_quotes(&self) -> FetchResult<ParsedQuoteSet> {
        QuoteFetcher::fetch_quotes(self).await
    }
}

impl CandleSource for CandleFetcher {
    async fn fetch_candles(&self, period: Period) -> FetchResult<CandleSeries> {
        CandleFetcher::fetch_candles(self, period).await
    }
}

/// Drives the quote poller and the period-triggered candle pipeline over a
/// shared view model.
///
/// The poller tick never waits for the in-flight round-trip: each cycle is
/// spawned fire-and-forget, overlapping requests are tolerated, and the
/// last-completed write wins. Stopping the feed does not abort in-flight
/// requests; their results are discarded by the liveness check instead.
pub struct MarketFeed<Q: QuoteSource, C: CandleSource> {
    state: Arc<Mutex<DashboardState>>,
    quotes: Arc<Q>,
    candles: Arc<C>,
    alive: Arc<AtomicBool>,
    candle_epoch: Arc<AtomicU64>,
    poll_interval: Duration,
    poll_task: Option<JoinHandle<()>>,
}

impl MarketFeed<QuoteFetcher, CandleFetcher> {
    pub fn new(config: &FeedConfig) -> crate::error::Result<Self> {
        let quotes = QuoteFetcher::new(config)?;
        let candles = CandleFetcher::new(config)?;
        Ok(Self::with_sources(config, quotes, candles))
    }
}

impl<Q: QuoteSource, C: CandleSource> MarketFeed<Q, C> {
    pub fn with_sources(config: &FeedConfig, quotes: Q, candles: C) -> Self {
        Self {
            state: Arc::new(Mutex::new(DashboardState::seeded(config))),
            quotes: Arc::new(quotes),
            candles: Arc::new(candles),
            alive: Arc::new(AtomicBool::new(true)),
            candle_epoch: Arc::new(AtomicU64::new(0)),
            poll_interval: config.poll_interval,
            poll_task: None,
        }
    }

    /// Begin polling: one quote cycle fires immediately, then one per tick.
    /// The initial candle fetch for the current period is triggered as well.
    pub fn start(&mut self) {
        if self.poll_task.is_some() {
            return;
        }
        self.alive.store(true, Ordering::SeqCst);

        let state = Arc::clone(&self.state);
        let quotes = Arc::clone(&self.quotes);
        let alive = Arc::clone(&self.alive);
        let poll_interval = self.poll_interval;

        self.poll_task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if !alive.load(Ordering::SeqCst) {
                    break;
                }

                lock_state(&state).begin_quotes_cycle();
                tokio::spawn(run_quote_cycle(
                    Arc::clone(&quotes),
                    Arc::clone(&state),
                    Arc::clone(&alive),
                ));
            }
        }));

        let period = lock_state(&self.state).period;
        self.refresh_candles(period);
    }

    /// Cancel the recurring timer. In-flight requests keep running but any
    /// result arriving after this point is discarded, never applied.
    pub fn stop(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }

        // A cycle interrupted between begin and apply would otherwise leave
        // its loading flag stuck for any late snapshot reader.
        let mut state = lock_state(&self.state);
        state.quotes_loading = false;
        state.candles_loading = false;
    }

    /// Re-trigger the candle pipeline for a newly selected period. If a
    /// previous request is still in flight its response is superseded:
    /// the last requested period wins.
    pub fn set_period(&self, period: Period) {
        self.refresh_candles(period);
    }

    /// Clone of the current view model for the render layer.
    pub fn snapshot(&self) -> DashboardState {
        lock_state(&self.state).clone()
    }

    fn refresh_candles(&self, period: Period) {
        let epoch = self.candle_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        lock_state(&self.state).begin_candles_cycle(period);

        tokio::spawn(run_candle_cycle(
            Arc::clone(&self.candles),
            Arc::clone(&self.state),
            Arc::clone(&self.alive),
            Arc::clone(&self.candle_epoch),
            epoch,
            period,
        ));
    }
}

impl<Q: QuoteSource, C: CandleSource> Drop for MarketFeed<Q, C> {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_quote_cycle<Q: QuoteSource>(
    source: Arc<Q>,
    state: Arc<Mutex<DashboardState>>,
    alive: Arc<AtomicBool>,
) {
    let result = source.fetch_quotes().await;

    // The liveness check happens under the state lock: a response that
    // lands after stop() is discarded, not an error, and stop() cannot
    // slip in between the check and the apply.
    let mut state = lock_state(&state);
    if !alive.load(Ordering::SeqCst) {
        log::debug!("discarding quote result that resolved after stop");
        return;
    }

    match result {
        Ok(parsed) => state.apply_quotes_success(parsed),
        Err(err) => {
            log::warn!("quote poll cycle failed: {}", err);
            state.apply_quotes_failure();
        }
    }
}

async fn run_candle_cycle<C: CandleSource>(
    source: Arc<C>,
    state: Arc<Mutex<DashboardState>>,
    alive: Arc<AtomicBool>,
    candle_epoch: Arc<AtomicU64>,
    epoch: u64,
    period: Period,
) {
    let result = source.fetch_candles(period).await;

    // Both guards are checked under the state lock so neither a stop()
    // nor a newer period selection can land between check and apply.
    let mut state = lock_state(&state);
    if !alive.load(Ordering::SeqCst) {
        log::debug!("discarding candle result that resolved after stop");
        return;
    }
    if candle_epoch.load(Ordering::SeqCst) != epoch {
        log::debug!("discarding candle result superseded by a newer period");
        return;
    }

    match result {
        Ok(series) => state.apply_candles_success(series),
        Err(err) => {
            log::warn!("candle fetch failed for {}: {}", period.label(), err);
            state.apply_candles_failure();
        }
    }
}

fn lock_state(state: &Mutex<DashboardState>) -> MutexGuard<'_, DashboardState> {
    // State mutations never panic while holding the lock; recover the inner
    // value anyway rather than poisoning the whole pipeline.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
