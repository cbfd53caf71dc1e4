//! Current-price provider port.

use crate::domain::error::FinboardError;

pub trait QuotePort {
    fn fetch_quote(&self, ticker: &str) -> Result<f64, FinboardError>;
}
