//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first value, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! No warmup: every point is defined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    let k = smoothing_factor(period);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;

    for &value in values {
        let next = match prev {
            None => value,
            Some(ema) => value * k + ema * (1.0 - k),
        };
        prev = Some(next);
        out.push(prev);
    }
    out
}

pub fn calculate_ema(series: &PriceSeries, period: usize) -> IndicatorSeries {
    IndicatorSeries::aligned(
        IndicatorType::Ema(period),
        series,
        ema(&series.closes(), period),
    )
}
