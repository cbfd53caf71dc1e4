//! Price-history provider port.

use crate::domain::error::FinboardError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::timeframe::{ChartRange, Interval};

pub trait PriceHistoryPort {
    /// Ordered bars for `ticker` covering `range` at `interval`.
    ///
    /// An empty result is reported as [`FinboardError::NoData`], never as an
    /// empty series.
    fn fetch_history(
        &self,
        ticker: &str,
        range: ChartRange,
        interval: Interval,
    ) -> Result<PriceSeries, FinboardError>;
}
