//! Technical indicator implementations.
//!
//! The numeric functions ([`sma::sma`], [`ema::ema`], [`rsi::rsi`]) work on
//! plain `&[f64]` and return one `Option<f64>` per input point, `None` where
//! there is not yet enough history. The `calculate_*` wrappers apply them to
//! the closes of a [`PriceSeries`](crate::domain::ohlcv::PriceSeries) and
//! attach timestamps:
//! - `IndicatorPoint`: a single point in an indicator time series
//! - `IndicatorType`: indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: a time series of indicator values

pub mod change;
pub mod ema;
pub mod rsi;
pub mod sma;

use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

use crate::domain::ohlcv::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
}

impl IndicatorType {
    pub fn period(self) -> usize {
        match self {
            IndicatorType::Sma(p) | IndicatorType::Ema(p) | IndicatorType::Rsi(p) => p,
        }
    }

    /// Runs the indicator over the closes of `series`.
    pub fn calculate(self, series: &PriceSeries) -> IndicatorSeries {
        match self {
            IndicatorType::Sma(p) => sma::calculate_sma(series, p),
            IndicatorType::Ema(p) => ema::calculate_ema(series, p),
            IndicatorType::Rsi(p) => rsi::calculate_rsi(series, p),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub(crate) fn aligned(
        indicator_type: IndicatorType,
        series: &PriceSeries,
        values: Vec<Option<f64>>,
    ) -> Self {
        let values = series
            .bars()
            .iter()
            .zip(values)
            .map(|(bar, value)| IndicatorPoint {
                timestamp: bar.timestamp,
                value,
            })
            .collect();
        Self {
            indicator_type,
            values,
        }
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.last().and_then(|p| p.value)
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|p| p.value.is_some()).count()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}

impl FromStr for IndicatorType {
    type Err = String;

    /// Parses `SMA(20)`, `ema(12)`, `RSI(14)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, rest) = s
            .split_once('(')
            .ok_or_else(|| format!("invalid indicator '{}'", s))?;
        let period: usize = rest
            .strip_suffix(')')
            .and_then(|p| p.trim().parse().ok())
            .filter(|&p| p > 0)
            .ok_or_else(|| format!("invalid period in '{}'", s))?;

        match name.trim().to_uppercase().as_str() {
            "SMA" => Ok(IndicatorType::Sma(period)),
            "EMA" => Ok(IndicatorType::Ema(period)),
            "RSI" => Ok(IndicatorType::Rsi(period)),
            other => Err(format!("unknown indicator '{}'", other)),
        }
    }
}
