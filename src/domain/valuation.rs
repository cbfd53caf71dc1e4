//! Portfolio valuation: market value, cost basis and P/L per position and in total.
//!
//! Pure function of (positions, quotes). A position without a usable quote
//! keeps its cost basis but has no market value or P/L, and is left out of the
//! market-value total rather than counted as zero.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::indicator::change::percentage_change;
use super::position::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct PositionValuation {
    pub position: Position,
    pub current_price: Option<f64>,
    pub market_value: Option<f64>,
    pub cost_basis: f64,
    pub pl_abs: Option<f64>,
    pub pl_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioValuation {
    pub positions: Vec<PositionValuation>,
    pub total_market_value: f64,
    pub total_cost_basis: f64,
    pub total_pl: f64,
    pub total_pl_pct: f64,
    /// Tickers with no usable quote, first-seen order.
    pub missing_quotes: Vec<String>,
}

impl PortfolioValuation {
    /// Rows by market value, largest first; rows without a value go last.
    pub fn sorted_by_market_value(&self) -> Vec<&PositionValuation> {
        let mut rows: Vec<&PositionValuation> = self.positions.iter().collect();
        rows.sort_by(|a, b| match (a.market_value, b.market_value) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        rows
    }
}

pub fn value_position(position: &Position, quote: Option<f64>) -> PositionValuation {
    let current_price = quote.filter(|p| p.is_finite());
    let cost_basis = position.cost_basis();
    let market_value = current_price.map(|p| position.market_value(p));

    PositionValuation {
        position: position.clone(),
        current_price,
        market_value,
        cost_basis,
        pl_abs: market_value.map(|mv| mv - cost_basis),
        pl_pct: market_value.map(|mv| percentage_change(cost_basis, mv)),
    }
}

pub fn value_positions(positions: &[Position], quotes: &HashMap<String, f64>) -> PortfolioValuation {
    let rows: Vec<PositionValuation> = positions
        .iter()
        .map(|p| value_position(p, quotes.get(&p.ticker).copied()))
        .collect();

    let total_market_value: f64 = rows.iter().filter_map(|r| r.market_value).sum();
    let total_cost_basis: f64 = rows.iter().map(|r| r.cost_basis).sum();
    let total_pl = total_market_value - total_cost_basis;

    let mut missing_quotes: Vec<String> = Vec::new();
    for row in rows.iter().filter(|r| r.market_value.is_none()) {
        if !missing_quotes.contains(&row.position.ticker) {
            missing_quotes.push(row.position.ticker.clone());
        }
    }

    PortfolioValuation {
        positions: rows,
        total_market_value,
        total_cost_basis,
        total_pl,
        total_pl_pct: percentage_change(total_cost_basis, total_market_value),
        missing_quotes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn pos(ticker: &str, shares: f64, buy_price: f64) -> Position {
        Position::new(
            ticker,
            shares,
            buy_price,
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn quotes(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(t, p)| (t.to_string(), *p)).collect()
    }

    #[test]
    fn single_position_profit() {
        let v = value_positions(&[pos("AAPL", 10.0, 100.0)], &quotes(&[("AAPL", 120.0)]));
        let row = &v.positions[0];
        assert_relative_eq!(row.market_value.unwrap(), 1200.0);
        assert_relative_eq!(row.cost_basis, 1000.0);
        assert_relative_eq!(row.pl_abs.unwrap(), 200.0);
        assert_relative_eq!(row.pl_pct.unwrap(), 20.0);
        assert_relative_eq!(v.total_pl_pct, 20.0);
        assert!(v.missing_quotes.is_empty());
    }

    #[test]
    fn missing_quote_is_excluded_not_zero() {
        let positions = [pos("AAPL", 10.0, 100.0), pos("MSFT", 2.0, 50.0)];
        let v = value_positions(&positions, &quotes(&[("AAPL", 110.0)]));

        assert_relative_eq!(v.total_market_value, 1100.0);
        assert_relative_eq!(v.total_cost_basis, 1100.0);
        assert_relative_eq!(v.total_pl, 0.0);

        let msft = &v.positions[1];
        assert_eq!(msft.current_price, None);
        assert_eq!(msft.market_value, None);
        assert_eq!(msft.pl_abs, None);
        assert_eq!(msft.pl_pct, None);
        assert_relative_eq!(msft.cost_basis, 100.0);
        assert_eq!(v.missing_quotes, vec!["MSFT"]);
    }

    #[test]
    fn zero_buy_price_gives_zero_pct() {
        let v = value_positions(&[pos("GIFT", 4.0, 0.0)], &quotes(&[("GIFT", 25.0)]));
        let row = &v.positions[0];
        assert_relative_eq!(row.pl_abs.unwrap(), 100.0);
        assert_eq!(row.pl_pct, Some(0.0));
        assert_eq!(v.total_pl_pct, 0.0);
    }

    #[test]
    fn non_finite_quote_treated_as_missing() {
        let v = value_positions(&[pos("AAPL", 1.0, 1.0)], &quotes(&[("AAPL", f64::NAN)]));
        assert_eq!(v.positions[0].market_value, None);
        assert_eq!(v.total_market_value, 0.0);
        assert_eq!(v.missing_quotes, vec!["AAPL"]);
    }

    #[test]
    fn empty_portfolio() {
        let v = value_positions(&[], &HashMap::new());
        assert!(v.positions.is_empty());
        assert_eq!(v.total_market_value, 0.0);
        assert_eq!(v.total_cost_basis, 0.0);
        assert_eq!(v.total_pl_pct, 0.0);
    }

    #[test]
    fn repeated_ticker_shares_quote() {
        let positions = [pos("AAPL", 1.0, 100.0), pos("AAPL", 3.0, 80.0)];
        let v = value_positions(&positions, &quotes(&[("AAPL", 90.0)]));
        assert_relative_eq!(v.total_market_value, 360.0);
        assert_relative_eq!(v.total_cost_basis, 340.0);
        assert_relative_eq!(v.positions[0].pl_pct.unwrap(), -10.0);
        assert_relative_eq!(v.positions[1].pl_pct.unwrap(), 12.5);
    }

    #[test]
    fn missing_tickers_listed_once() {
        let positions = [pos("X", 1.0, 1.0), pos("X", 2.0, 1.0)];
        let v = value_positions(&positions, &HashMap::new());
        assert_eq!(v.missing_quotes, vec!["X"]);
    }

    #[test]
    fn sorted_by_market_value_desc_missing_last() {
        let positions = [
            pos("SMALL", 1.0, 1.0),
            pos("NONE", 1.0, 1.0),
            pos("BIG", 100.0, 1.0),
        ];
        let v = value_positions(&positions, &quotes(&[("SMALL", 5.0), ("BIG", 5.0)]));
        let order: Vec<&str> = v
            .sorted_by_market_value()
            .iter()
            .map(|r| r.position.ticker.as_str())
            .collect();
        assert_eq!(order, vec!["BIG", "SMALL", "NONE"]);
    }

    #[test]
    fn valuation_is_pure() {
        let positions = [pos("AAPL", 3.0, 10.0), pos("MSFT", 1.0, 7.0)];
        let q = quotes(&[("AAPL", 12.5)]);
        assert_eq!(value_positions(&positions, &q), value_positions(&positions, &q));
    }
}
