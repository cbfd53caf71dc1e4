//! Batch indicator computation and the row-aligned technicals table.

use std::collections::BTreeMap;

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::{PriceBar, PriceSeries};

/// Computes each requested indicator once; duplicates collapse.
pub fn compute_indicators(
    series: &PriceSeries,
    types: &[IndicatorType],
) -> BTreeMap<IndicatorType, IndicatorSeries> {
    let mut out = BTreeMap::new();
    for &indicator_type in types {
        out.entry(indicator_type)
            .or_insert_with(|| indicator_type.calculate(series));
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct TechnicalsRow {
    pub bar: PriceBar,
    /// Same order as [`TechnicalsTable::columns`].
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TechnicalsTable {
    pub columns: Vec<IndicatorType>,
    pub rows: Vec<TechnicalsRow>,
}

impl TechnicalsTable {
    /// Joins the last `tail` bars with their indicator values.
    pub fn build(
        series: &PriceSeries,
        indicators: &BTreeMap<IndicatorType, IndicatorSeries>,
        tail: usize,
    ) -> Self {
        let columns: Vec<IndicatorType> = indicators.keys().copied().collect();
        let start = series.len().saturating_sub(tail);

        let rows = series
            .bars()
            .iter()
            .enumerate()
            .skip(start)
            .map(|(i, bar)| TechnicalsRow {
                bar: bar.clone(),
                values: indicators
                    .values()
                    .map(|s| s.values.get(i).and_then(|p| p.value))
                    .collect(),
            })
            .collect();

        Self { columns, rows }
    }

    pub fn column(&self, indicator_type: IndicatorType) -> Option<usize> {
        self.columns.iter().position(|c| *c == indicator_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_series(prices: &[f64]) -> PriceSeries {
        let bars = prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn compute_collapses_duplicates() {
        let series = make_series(&[1.0, 2.0, 3.0, 4.0]);
        let map = compute_indicators(
            &series,
            &[IndicatorType::Sma(2), IndicatorType::Sma(2), IndicatorType::Ema(2)],
        );
        assert_eq!(map.len(), 2);
        assert_eq!(map[&IndicatorType::Sma(2)].values.len(), 4);
        assert_eq!(map[&IndicatorType::Sma(2)].latest(), Some(3.5));
    }

    #[test]
    fn indicator_points_carry_bar_timestamps() {
        let series = make_series(&[1.0, 2.0, 3.0]);
        let map = compute_indicators(&series, &[IndicatorType::Rsi(2)]);
        let rsi = &map[&IndicatorType::Rsi(2)];
        for (point, bar) in rsi.values.iter().zip(series.bars()) {
            assert_eq!(point.timestamp, bar.timestamp);
        }
        assert_eq!(rsi.defined_count(), 1);
    }

    #[test]
    fn table_takes_tail_rows() {
        let series = make_series(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let map = compute_indicators(&series, &[IndicatorType::Sma(3), IndicatorType::Ema(2)]);
        let table = TechnicalsTable::build(&series, &map, 2);

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].bar.close, 40.0);
        let sma_col = table.column(IndicatorType::Sma(3)).unwrap();
        assert_eq!(table.rows[0].values[sma_col], Some(30.0));
        assert_eq!(table.rows[1].values[sma_col], Some(40.0));
    }

    #[test]
    fn table_keeps_undefined_cells() {
        let series = make_series(&[10.0, 20.0]);
        let map = compute_indicators(&series, &[IndicatorType::Sma(5)]);
        let table = TechnicalsTable::build(&series, &map, 10);
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.iter().all(|r| r.values == vec![None]));
    }
}
