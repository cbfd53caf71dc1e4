//! Core domain types and logic.

pub mod ohlcv;
pub mod timeframe;
pub mod indicator;
pub mod indicator_helpers;
pub mod position;
pub mod portfolio;
pub mod quote;
pub mod valuation;
pub mod dashboard;
pub mod config_validation;
pub mod error;
