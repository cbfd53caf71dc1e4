#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use finboard::domain::error::FinboardError;
pub use finboard::domain::ohlcv::{PriceBar, PriceSeries};
use finboard::domain::timeframe::{ChartRange, Interval};
use finboard::ports::price_history_port::PriceHistoryPort;
use finboard::ports::quote_port::QuotePort;
use std::cell::Cell;
use std::collections::HashMap;

/// In-memory provider for both ports. Counts every call it serves.
pub struct MockMarketData {
    pub series: HashMap<String, Vec<PriceBar>>,
    pub quotes: HashMap<String, f64>,
    pub errors: HashMap<String, String>,
    pub calls: Cell<usize>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            series: HashMap::new(),
            quotes: HashMap::new(),
            errors: HashMap::new(),
            calls: Cell::new(0),
        }
    }

    pub fn with_series(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.series.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_quote(mut self, ticker: &str, price: f64) -> Self {
        self.quotes.insert(ticker.to_string(), price);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }

    fn check(&self, ticker: &str) -> Result<(), FinboardError> {
        self.calls.set(self.calls.get() + 1);
        match self.errors.get(ticker) {
            Some(reason) => Err(FinboardError::DataSource {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl PriceHistoryPort for MockMarketData {
    fn fetch_history(
        &self,
        ticker: &str,
        range: ChartRange,
        interval: Interval,
    ) -> Result<PriceSeries, FinboardError> {
        self.check(ticker)?;
        let bars = self
            .series
            .get(ticker)
            .cloned()
            .ok_or_else(|| FinboardError::NoData {
                ticker: ticker.to_string(),
            })?;
        Ok(PriceSeries::new(ticker, bars)?
            .resample(interval)
            .within_range(range))
    }
}

impl QuotePort for MockMarketData {
    fn fetch_quote(&self, ticker: &str) -> Result<f64, FinboardError> {
        self.check(ticker)?;
        self.quotes
            .get(ticker)
            .copied()
            .ok_or_else(|| FinboardError::NoData {
                ticker: ticker.to_string(),
            })
    }
}

pub fn ts(date: &str) -> NaiveDateTime {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn make_bar(date: &str, close: f64) -> PriceBar {
    PriceBar {
        timestamp: ts(date),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
    }
}

/// One daily bar per close, starting at `start`.
pub fn daily_bars(start: &str, closes: &[f64]) -> Vec<PriceBar> {
    let start = ts(start);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            timestamp: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        })
        .collect()
}

pub fn make_series(ticker: &str, start: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::new(ticker, daily_bars(start, closes)).unwrap()
}

/// Writes `TICKER.csv` with one daily row per close.
pub fn write_csv(dir: &std::path::Path, ticker: &str, start: &str, closes: &[f64]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for bar in daily_bars(start, closes) {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.timestamp.format("%Y-%m-%d"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", ticker)), content).unwrap();
}
