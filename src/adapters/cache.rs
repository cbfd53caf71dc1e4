//! Time-to-live memoization for market-data providers.
//!
//! [`CachedMarketData`] puts a pair of bounded `moka` caches in front of any
//! provider, keyed by the provider function name and its arguments. Errors
//! are never cached. A zero TTL turns caching off.

use moka::sync::Cache;
use std::time::Duration;
use tracing::debug;

use crate::domain::error::FinboardError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::timeframe::{ChartRange, Interval};
use crate::ports::price_history_port::PriceHistoryPort;
use crate::ports::quote_port::QuotePort;

pub const HISTORY_CAPACITY: u64 = 256;
pub const QUOTE_CAPACITY: u64 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub function: &'static str,
    pub args: Vec<String>,
}

impl CacheKey {
    pub fn new(function: &'static str, args: &[&str]) -> Self {
        Self {
            function,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

pub struct CachedMarketData<P> {
    inner: P,
    ttl: Duration,
    history: Cache<CacheKey, PriceSeries>,
    quotes: Cache<CacheKey, f64>,
}

impl<P> CachedMarketData<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            history: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(HISTORY_CAPACITY)
                .build(),
            quotes: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(QUOTE_CAPACITY)
                .build(),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn invalidate_all(&self) {
        self.history.invalidate_all();
        self.quotes.invalidate_all();
    }

    fn enabled(&self) -> bool {
        !self.ttl.is_zero()
    }
}

impl<P: PriceHistoryPort> PriceHistoryPort for CachedMarketData<P> {
    fn fetch_history(
        &self,
        ticker: &str,
        range: ChartRange,
        interval: Interval,
    ) -> Result<PriceSeries, FinboardError> {
        let ticker = ticker.trim().to_uppercase();
        if !self.enabled() {
            return self.inner.fetch_history(&ticker, range, interval);
        }

        let key = CacheKey::new(
            "fetch_history",
            &[&ticker, range.as_str(), interval.as_str()],
        );
        if let Some(series) = self.history.get(&key) {
            debug!(ticker = %ticker, "history cache hit");
            return Ok(series);
        }

        let series = self.inner.fetch_history(&ticker, range, interval)?;
        self.history.insert(key, series.clone());
        Ok(series)
    }
}

impl<P: QuotePort> QuotePort for CachedMarketData<P> {
    fn fetch_quote(&self, ticker: &str) -> Result<f64, FinboardError> {
        let ticker = ticker.trim().to_uppercase();
        if !self.enabled() {
            return self.inner.fetch_quote(&ticker);
        }

        let key = CacheKey::new("fetch_quote", &[&ticker]);
        if let Some(price) = self.quotes.get(&key) {
            debug!(ticker = %ticker, "quote cache hit");
            return Ok(price);
        }

        let price = self.inner.fetch_quote(&ticker)?;
        self.quotes.insert(key, price);
        Ok(price)
    }
}
