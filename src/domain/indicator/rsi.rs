//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses a simple rolling mean of gains/losses over the last n price changes:
//! - gain = max(change, 0), loss = max(-change, 0)
//! - RS = mean(gain) / mean(loss), RSI = 100 - (100 / (1 + RS))
//! - mean(loss) == 0 and mean(gain) > 0: RSI = 100
//! - both means 0 (flat window): RSI = 50
//!
//! Warmup: first n points are undefined (need n price changes).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;
pub const DEFAULT_OVERSOLD: f64 = 30.0;

/// Running sum over a window that also counts its non-zero members, so an
/// all-zero window reads back as exactly zero.
#[derive(Default)]
struct MoveWindow {
    sum: f64,
    nonzero: usize,
}

impl MoveWindow {
    fn push(&mut self, v: f64) {
        if v != 0.0 {
            self.sum += v;
            self.nonzero += 1;
        }
    }

    fn pop(&mut self, v: f64) {
        if v != 0.0 {
            self.sum -= v;
            self.nonzero -= 1;
        }
    }

    fn mean(&self, period: usize) -> f64 {
        if self.nonzero == 0 {
            0.0
        } else {
            (self.sum / period as f64).max(0.0)
        }
    }
}

/// RSI from mean gain and mean loss, with the zero-loss conventions applied.
pub fn rsi_from_means(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss <= 0.0 {
        if avg_gain <= 0.0 { 50.0 } else { 100.0 }
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }

    let gains: Vec<f64> = values.windows(2).map(|w| (w[1] - w[0]).max(0.0)).collect();
    let losses: Vec<f64> = values.windows(2).map(|w| (w[0] - w[1]).max(0.0)).collect();

    let mut up = MoveWindow::default();
    let mut down = MoveWindow::default();

    // change j sits at point j + 1
    for j in 0..gains.len() {
        up.push(gains[j]);
        down.push(losses[j]);
        if j + 1 < period {
            continue;
        }
        if j + 1 > period {
            up.pop(gains[j - period]);
            down.pop(losses[j - period]);
        }
        out[j + 1] = Some(rsi_from_means(up.mean(period), down.mean(period)));
    }
    out
}

pub fn calculate_rsi(series: &PriceSeries, period: usize) -> IndicatorSeries {
    IndicatorSeries::aligned(
        IndicatorType::Rsi(period),
        series,
        rsi(&series.closes(), period),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiZone {
    Overbought,
    Neutral,
    Oversold,
}

impl RsiZone {
    pub fn label(self) -> &'static str {
        match self {
            RsiZone::Overbought => "overbought",
            RsiZone::Neutral => "neutral",
            RsiZone::Oversold => "oversold",
        }
    }
}

pub fn classify_rsi(value: f64, overbought: f64, oversold: f64) -> RsiZone {
    if value >= overbought {
        RsiZone::Overbought
    } else if value <= oversold {
        RsiZone::Oversold
    } else {
        RsiZone::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rsi_empty() {
        assert!(rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_single_point() {
        assert_eq!(rsi(&[100.0], 14), vec![None]);
    }

    #[test]
    fn rsi_warmup_period() {
        let values: Vec<f64> = (1..=15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let out = rsi(&values, 14);

        assert_eq!(out.len(), 15);
        for (i, v) in out.iter().enumerate().take(14) {
            assert!(v.is_none(), "point {} should be undefined", i);
        }
        assert!(out[14].is_some(), "point 14 should be defined");
    }

    #[test]
    fn rsi_length_equal_to_period_is_undefined() {
        let values: Vec<f64> = (0..14).map(|i| i as f64).collect();
        assert!(rsi(&values, 14).iter().all(Option::is_none));
    }

    #[test]
    fn rsi_all_gains_is_exactly_100() {
        let values: Vec<f64> = (0..30).map(|i| 100.0 + i as f64 * 0.37).collect();
        let out = rsi(&values, 14);
        for v in out.iter().skip(14) {
            assert_eq!(v.unwrap(), 100.0);
        }
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let values: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let out = rsi(&values, 14);
        assert_relative_eq!(out[14].unwrap(), 0.0);
    }

    #[test]
    fn rsi_flat_series_is_50() {
        let out = rsi(&[42.0; 20], 14);
        for v in out.iter().skip(14) {
            assert_eq!(v.unwrap(), 50.0);
        }
    }

    #[test]
    fn rsi_returns_to_100_after_losses_leave_window() {
        // one drop, then only rises: once the drop leaves the 3-change window RSI is 100
        let values = [10.0, 9.0, 10.0, 11.0, 12.0, 13.0];
        let out = rsi(&values, 3);
        assert!(out[3].unwrap() < 100.0);
        assert_eq!(out[4].unwrap(), 100.0);
        assert_eq!(out[5].unwrap(), 100.0);
    }

    #[test]
    fn rsi_known_window() {
        // changes: +2, -1, +3 → mean gain 5/3, mean loss 1/3, RS 5
        let out = rsi(&[10.0, 12.0, 11.0, 14.0], 3);
        assert_relative_eq!(out[3].unwrap(), 100.0 - 100.0 / 6.0, epsilon = 1e-9);
    }

    #[test]
    fn rsi_in_range() {
        let values: Vec<f64> = (1..=60)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        for v in rsi(&values, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI {} out of range", v);
        }
    }

    #[test]
    fn rsi_zero_period() {
        assert_eq!(rsi(&[100.0, 101.0], 0), vec![None, None]);
    }

    #[test]
    fn rsi_from_means_conventions() {
        assert_eq!(rsi_from_means(0.0, 0.0), 50.0);
        assert_eq!(rsi_from_means(1.5, 0.0), 100.0);
        assert_eq!(rsi_from_means(0.0, 2.0), 0.0);
        assert_relative_eq!(rsi_from_means(1.0, 1.0), 50.0);
    }

    #[test]
    fn classify_zones() {
        assert_eq!(classify_rsi(75.0, 70.0, 30.0), RsiZone::Overbought);
        assert_eq!(classify_rsi(70.0, 70.0, 30.0), RsiZone::Overbought);
        assert_eq!(classify_rsi(50.0, 70.0, 30.0), RsiZone::Neutral);
        assert_eq!(classify_rsi(30.0, 70.0, 30.0), RsiZone::Oversold);
        assert_eq!(RsiZone::Oversold.label(), "oversold");
    }
}
