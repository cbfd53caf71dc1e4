//! Percentage change and headline price-change summaries.

use crate::domain::ohlcv::PriceSeries;

/// (current - previous) / previous * 100, or 0 when `previous` is zero.
pub fn percentage_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// Percentage change from the first to the last value.
pub fn growth_pct(values: &[f64]) -> f64 {
    match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if values.len() > 1 => percentage_change(first, last),
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub last_close: f64,
    pub prev_close: f64,
    pub change: f64,
    pub change_pct: f64,
}

impl PriceChange {
    /// Last close against the one before it. A single close compares with itself.
    pub fn from_closes(closes: &[f64]) -> Option<Self> {
        let last_close = *closes.last()?;
        let prev_close = if closes.len() > 1 {
            closes[closes.len() - 2]
        } else {
            last_close
        };
        Some(Self {
            last_close,
            prev_close,
            change: last_close - prev_close,
            change_pct: percentage_change(prev_close, last_close),
        })
    }

    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        let tail: Vec<f64> = series.tail(2).iter().map(|b| b.close).collect();
        Self::from_closes(&tail)
    }
}
