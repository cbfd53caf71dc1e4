//! Configuration validation.
//!
//! Validates all dashboard config fields before any data is loaded.

use crate::domain::error::FinboardError;
use crate::domain::timeframe::{ChartRange, Interval};
use crate::ports::config_port::ConfigPort;

/// One week.
pub const MAX_CACHE_TTL_SECS: i64 = 7 * 24 * 60 * 60;

pub fn validate_dashboard_config(config: &dyn ConfigPort) -> Result<(), FinboardError> {
    validate_data_directory(config)?;
    parse_range(config)?;
    parse_interval(config)?;
    parse_periods(config, "sma_periods", &[])?;
    parse_periods(config, "ema_periods", &[])?;
    validate_rsi(config)?;
    validate_cache(config)?;
    validate_display(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> FinboardError {
    FinboardError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_data_directory(config: &dyn ConfigPort) -> Result<(), FinboardError> {
    match config.get_string("data", "directory") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(invalid("data", "directory", "directory must not be empty")),
        None => Err(FinboardError::ConfigMissing {
            section: "data".to_string(),
            key: "directory".to_string(),
        }),
    }
}

pub fn parse_range(config: &dyn ConfigPort) -> Result<ChartRange, FinboardError> {
    match config.get_string("chart", "range") {
        Some(s) => s.parse().map_err(|e: String| invalid("chart", "range", e)),
        None => Ok(ChartRange::default()),
    }
}

pub fn parse_interval(config: &dyn ConfigPort) -> Result<Interval, FinboardError> {
    match config.get_string("chart", "interval") {
        Some(s) => s.parse().map_err(|e: String| invalid("chart", "interval", e)),
        None => Ok(Interval::default()),
    }
}

/// Parses a comma-separated `[indicators]` period list; `default` when unset.
pub fn parse_periods(
    config: &dyn ConfigPort,
    key: &str,
    default: &[usize],
) -> Result<Vec<usize>, FinboardError> {
    let Some(items) = config.get_list("indicators", key) else {
        return Ok(default.to_vec());
    };
    items
        .iter()
        .map(|item| match item.parse::<usize>() {
            Ok(p) if p > 0 => Ok(p),
            _ => Err(invalid(
                "indicators",
                key,
                format!("'{}' is not a positive integer period", item),
            )),
        })
        .collect()
}

fn validate_rsi(config: &dyn ConfigPort) -> Result<(), FinboardError> {
    let period = config.get_int("indicators", "rsi_period", 14);
    if period <= 0 {
        return Err(invalid("indicators", "rsi_period", "rsi_period must be positive"));
    }

    let overbought = config.get_double("indicators", "rsi_overbought", 70.0);
    let oversold = config.get_double("indicators", "rsi_oversold", 30.0);
    if !(0.0..=100.0).contains(&overbought) {
        return Err(invalid(
            "indicators",
            "rsi_overbought",
            "rsi_overbought must be between 0 and 100",
        ));
    }
    if !(0.0..=100.0).contains(&oversold) {
        return Err(invalid(
            "indicators",
            "rsi_oversold",
            "rsi_oversold must be between 0 and 100",
        ));
    }
    if oversold >= overbought {
        return Err(invalid(
            "indicators",
            "rsi_oversold",
            "rsi_oversold must be below rsi_overbought",
        ));
    }
    Ok(())
}

fn validate_cache(config: &dyn ConfigPort) -> Result<(), FinboardError> {
    let ttl = config.get_int("cache", "ttl_seconds", 300);
    if ttl < 0 {
        return Err(invalid("cache", "ttl_seconds", "ttl_seconds must be non-negative"));
    }
    if ttl > MAX_CACHE_TTL_SECS {
        return Err(invalid(
            "cache",
            "ttl_seconds",
            format!("ttl_seconds must be at most {}", MAX_CACHE_TTL_SECS),
        ));
    }
    Ok(())
}

fn validate_display(config: &dyn ConfigPort) -> Result<(), FinboardError> {
    let rows = config.get_int("display", "tail_rows", 5);
    if rows <= 0 {
        return Err(invalid("display", "tail_rows", "tail_rows must be positive"));
    }
    Ok(())
}
