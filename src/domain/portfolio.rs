//! Session-scoped portfolio: an append/remove list of positions.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use super::error::PositionError;
use super::position::Position;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    positions: Vec<Position>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        ticker: &str,
        shares: f64,
        buy_price: f64,
        created_at: DateTime<Utc>,
    ) -> Result<&Position, PositionError> {
        let position = Position::new(ticker, shares, buy_price, created_at)?;
        self.positions.push(position);
        Ok(&self.positions[self.positions.len() - 1])
    }

    /// Removes the position at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<Position> {
        if index < self.positions.len() {
            Some(self.positions.remove(index))
        } else {
            None
        }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Tickers in first-seen order, each once.
    pub fn unique_tickers(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.positions
            .iter()
            .filter(|p| seen.insert(p.ticker.as_str()))
            .map(|p| p.ticker.clone())
            .collect()
    }
}
