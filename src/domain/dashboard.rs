//! Typed dashboard settings.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::indicator::IndicatorType;
use crate::domain::indicator::rsi::{DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD, DEFAULT_RSI_PERIOD};
use crate::domain::timeframe::{ChartRange, Interval};

pub const DEFAULT_SMA_PERIODS: [usize; 2] = [20, 50];
pub const DEFAULT_EMA_PERIODS: [usize; 1] = [20];
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_TAIL_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub range: ChartRange,
    pub interval: Interval,
    pub show_ma: bool,
    pub show_rsi: bool,
    pub sma_periods: Vec<usize>,
    pub ema_periods: Vec<usize>,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub cache_ttl: Duration,
    pub tail_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            range: ChartRange::default(),
            interval: Interval::default(),
            show_ma: true,
            show_rsi: true,
            sma_periods: DEFAULT_SMA_PERIODS.to_vec(),
            ema_periods: DEFAULT_EMA_PERIODS.to_vec(),
            rsi_period: DEFAULT_RSI_PERIOD,
            rsi_overbought: DEFAULT_OVERBOUGHT,
            rsi_oversold: DEFAULT_OVERSOLD,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            tail_rows: DEFAULT_TAIL_ROWS,
        }
    }
}

impl DashboardConfig {
    /// Indicators to compute, honouring the show_ma / show_rsi toggles.
    pub fn indicator_types(&self) -> Vec<IndicatorType> {
        let mut types = Vec::new();
        if self.show_ma {
            types.extend(self.sma_periods.iter().map(|&p| IndicatorType::Sma(p)));
            types.extend(self.ema_periods.iter().map(|&p| IndicatorType::Ema(p)));
        }
        if self.show_rsi {
            types.push(IndicatorType::Rsi(self.rsi_period));
        }
        types
    }
}
