//! Held positions.

use chrono::{DateTime, Utc};

use crate::domain::error::PositionError;

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub ticker: String,
    pub shares: f64,
    pub buy_price: f64,
    pub created_at: DateTime<Utc>,
}

impl Position {
    /// Validates and normalizes a position; the ticker is trimmed and upper-cased.
    pub fn new(
        ticker: &str,
        shares: f64,
        buy_price: f64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, PositionError> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(PositionError::EmptyTicker);
        }
        if !shares.is_finite() {
            return Err(PositionError::NotFinite { field: "shares" });
        }
        if shares <= 0.0 {
            return Err(PositionError::NonPositiveShares(shares));
        }
        if !buy_price.is_finite() {
            return Err(PositionError::NotFinite { field: "buy_price" });
        }
        if buy_price < 0.0 {
            return Err(PositionError::NegativeBuyPrice(buy_price));
        }

        Ok(Self {
            ticker,
            shares,
            buy_price,
            created_at,
        })
    }

    pub fn cost_basis(&self) -> f64 {
        self.buy_price * self.shares
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares * price
    }
}
