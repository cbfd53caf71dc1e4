//! CSV directory market-data adapter.
//!
//! One `<TICKER>.csv` per ticker with header
//! `timestamp,open,high,low,close,volume` (`date` is accepted for the first
//! column). Rows with a missing, unparseable or non-finite field are dropped.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::domain::error::FinboardError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::domain::timeframe::{ChartRange, Interval};
use crate::ports::price_history_port::PriceHistoryPort;
use crate::ports::quote_port::QuotePort;

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "date", alias = "Date", alias = "Datetime")]
    timestamp: String,
    #[serde(alias = "Open", deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(alias = "High", deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(alias = "Low", deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(alias = "Close", deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(alias = "Volume", deserialize_with = "csv::invalid_option")]
    volume: Option<f64>,
}

impl CsvRow {
    fn into_bar(self) -> Result<Option<PriceBar>, FinboardError> {
        let timestamp = parse_timestamp(&self.timestamp)?;
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            finite(self.open),
            finite(self.high),
            finite(self.low),
            finite(self.close),
            finite(self.volume),
        ) else {
            return Ok(None);
        };
        Ok(Some(PriceBar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }))
    }
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, FinboardError> {
    let raw = raw.trim();
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(ts);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| FinboardError::DataSource {
            reason: format!("invalid timestamp '{}'", raw),
        })
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.csv", ticker.trim().to_uppercase()))
    }

    /// All bars in the ticker's file, sorted; a repeated timestamp keeps the later row.
    pub fn load_bars(&self, ticker: &str) -> Result<Vec<PriceBar>, FinboardError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FinboardError::NoData {
                ticker: ticker.to_string(),
            },
            _ => FinboardError::DataSource {
                reason: format!("failed to read {}: {}", path.display(), e),
            },
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();
        let mut dropped = 0usize;

        for result in rdr.deserialize::<CsvRow>() {
            let row = result.map_err(|e| FinboardError::DataSource {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            match row.into_bar()? {
                Some(bar) => bars.push(bar),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            debug!(ticker, dropped, "dropped incomplete rows");
        }

        bars.sort_by_key(|b| b.timestamp);
        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.timestamp == bar.timestamp => {
                    warn!(ticker, timestamp = %bar.timestamp, "duplicate timestamp, keeping later row");
                    *last = bar;
                }
                _ => deduped.push(bar),
            }
        }
        Ok(deduped)
    }

    pub fn list_tickers(&self) -> Result<Vec<String>, FinboardError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| FinboardError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FinboardError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            if let Some(ticker) = name.to_string_lossy().strip_suffix(".csv") {
                tickers.push(ticker.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }
}

impl PriceHistoryPort for CsvAdapter {
    fn fetch_history(
        &self,
        ticker: &str,
        range: ChartRange,
        interval: Interval,
    ) -> Result<PriceSeries, FinboardError> {
        let ticker = ticker.trim().to_uppercase();
        let bars = self.load_bars(&ticker)?;
        let series = PriceSeries::new(ticker.clone(), bars)?
            .resample(interval)
            .within_range(range);

        if series.is_empty() {
            return Err(FinboardError::NoData { ticker });
        }
        debug!(ticker = %ticker, bars = series.len(), %range, %interval, "history loaded");
        Ok(series)
    }
}

impl QuotePort for CsvAdapter {
    fn fetch_quote(&self, ticker: &str) -> Result<f64, FinboardError> {
        self.load_bars(ticker)?
            .last()
            .map(|b| b.close)
            .ok_or_else(|| FinboardError::NoData {
                ticker: ticker.trim().to_uppercase(),
            })
    }
}
