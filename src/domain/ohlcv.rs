//! Price bars and ordered price series.

use chrono::NaiveDateTime;

use crate::domain::error::FinboardError;
use crate::domain::timeframe::{ChartRange, Interval};

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Bars for one ticker, strictly increasing by timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, FinboardError> {
        let ticker = ticker.into();
        if let Some(pair) = bars.windows(2).find(|w| w[1].timestamp <= w[0].timestamp) {
            return Err(FinboardError::UnorderedSeries {
                ticker,
                timestamp: pair[1].timestamp.to_string(),
            });
        }
        Ok(Self { ticker, bars })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// The last `n` bars (all of them when `n` exceeds the length).
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }

    /// Bars within `range` of the latest bar.
    pub fn within_range(&self, range: ChartRange) -> PriceSeries {
        let Some(latest) = self.bars.last().map(|b| b.timestamp) else {
            return self.clone();
        };
        let start = range.start_from(latest);
        PriceSeries {
            ticker: self.ticker.clone(),
            bars: self
                .bars
                .iter()
                .filter(|b| b.timestamp >= start)
                .cloned()
                .collect(),
        }
    }

    /// Re-bucket the series to a coarser interval.
    pub fn resample(&self, interval: Interval) -> PriceSeries {
        PriceSeries {
            ticker: self.ticker.clone(),
            bars: resample(&self.bars, interval),
        }
    }
}

/// Aggregates time-ordered bars into `interval` buckets: first open, max high,
/// min low, last close, summed volume. Each bucket is stamped with its start.
pub fn resample(bars: &[PriceBar], interval: Interval) -> Vec<PriceBar> {
    let mut out: Vec<PriceBar> = Vec::new();

    for bar in bars {
        let bucket = interval.bucket_start(bar.timestamp);
        match out.last_mut() {
            Some(current) if current.timestamp == bucket => {
                current.high = current.high.max(bar.high);
                current.low = current.low.min(bar.low);
                current.close = bar.close;
                current.volume += bar.volume;
            }
            _ => out.push(PriceBar {
                timestamp: bucket,
                ..bar.clone()
            }),
        }
    }

    out
}
