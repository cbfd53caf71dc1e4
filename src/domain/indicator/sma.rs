//! Simple Moving Average.
//!
//! SMA[i] = mean(values[i-n+1..=i]), computed with a sliding sum.
//! Warmup: first (n-1) points are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || period > values.len() {
        return out;
    }

    let mut sum: f64 = values[..period - 1].iter().sum();
    for i in period - 1..values.len() {
        sum += values[i];
        out[i] = Some(sum / period as f64);
        sum -= values[i + 1 - period];
    }
    out
}

pub fn calculate_sma(series: &PriceSeries, period: usize) -> IndicatorSeries {
    IndicatorSeries::aligned(
        IndicatorType::Sma(period),
        series,
        sma(&series.closes(), period),
    )
}
