//! Point-in-time quotes gathered for a valuation request.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::ports::quote_port::QuotePort;

#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub ticker: String,
    /// `None` when the provider could not supply a usable price.
    pub price: Option<f64>,
}

/// Fetches one quote per ticker, in order. Failures become `price: None`.
pub fn fetch_quotes(provider: &dyn QuotePort, tickers: &[String]) -> Vec<Quote> {
    tickers
        .iter()
        .map(|ticker| {
            let price = match provider.fetch_quote(ticker) {
                Ok(p) if p.is_finite() => {
                    debug!(ticker = %ticker, price = p, "quote fetched");
                    Some(p)
                }
                Ok(p) => {
                    warn!(ticker = %ticker, price = p, "discarding non-finite quote");
                    None
                }
                Err(e) => {
                    warn!(ticker = %ticker, error = %e, "quote unavailable");
                    None
                }
            };
            Quote {
                ticker: ticker.clone(),
                price,
            }
        })
        .collect()
}

/// Ticker → price for the quotes that have one.
pub fn quote_map(quotes: &[Quote]) -> HashMap<String, f64> {
    quotes
        .iter()
        .filter_map(|q| q.price.map(|p| (q.ticker.clone(), p)))
        .collect()
}
