//! CLI definition and dispatch.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::adapters::cache::CachedMarketData;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    parse_interval, parse_periods, parse_range, validate_dashboard_config,
};
use crate::domain::dashboard::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_EMA_PERIODS, DEFAULT_SMA_PERIODS, DEFAULT_TAIL_ROWS,
    DashboardConfig,
};
use crate::domain::error::{FinboardError, PositionError};
use crate::domain::indicator::change::{PriceChange, growth_pct};
use crate::domain::indicator::rsi::{
    DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD, DEFAULT_RSI_PERIOD, RsiZone, classify_rsi,
};
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{TechnicalsTable, compute_indicators};
use crate::domain::portfolio::Portfolio;
use crate::domain::quote::{fetch_quotes, quote_map};
use crate::domain::timeframe::{ChartRange, Interval};
use crate::domain::valuation::{PortfolioValuation, value_positions};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_history_port::PriceHistoryPort;
use crate::ports::quote_port::QuotePort;

#[derive(Parser, Debug)]
#[command(name = "finboard", about = "Technical indicators and portfolio P/L from market data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show price change, moving averages and RSI for a ticker
    Technicals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        ticker: String,
        /// 1mo, 3mo, 6mo, 1y, 2y or 5y
        #[arg(long)]
        range: Option<ChartRange>,
        /// 1d, 1wk or 1h
        #[arg(long)]
        interval: Option<Interval>,
        /// Number of trailing rows to print
        #[arg(long)]
        tail: Option<usize>,
    },
    /// Value a set of positions against current quotes
    Portfolio {
        #[arg(short, long)]
        config: PathBuf,
        /// TICKER:SHARES:BUY_PRICE, repeatable
        #[arg(short, long = "position", required = true)]
        positions: Vec<String>,
    },
    /// Validate a dashboard configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List tickers available in the data directory
    Tickers {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the `warn` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Technicals {
            config,
            ticker,
            range,
            interval,
            tail,
        } => run_technicals(&config, &ticker, range, interval, tail),
        Command::Portfolio { config, positions } => run_portfolio(&config, &positions),
        Command::Validate { config } => run_validate(&config),
        Command::Tickers { config } => run_tickers(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, FinboardError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Validates `adapter` and turns it into a typed [`DashboardConfig`].
pub fn build_dashboard_config(adapter: &dyn ConfigPort) -> Result<DashboardConfig, FinboardError> {
    validate_dashboard_config(adapter)?;

    let data_dir = adapter
        .get_string("data", "directory")
        .map(|d| PathBuf::from(d.trim()))
        .ok_or_else(|| FinboardError::ConfigMissing {
            section: "data".into(),
            key: "directory".into(),
        })?;

    Ok(DashboardConfig {
        data_dir,
        range: parse_range(adapter)?,
        interval: parse_interval(adapter)?,
        show_ma: adapter.get_bool("indicators", "show_ma", true),
        show_rsi: adapter.get_bool("indicators", "show_rsi", true),
        sma_periods: parse_periods(adapter, "sma_periods", &DEFAULT_SMA_PERIODS)?,
        ema_periods: parse_periods(adapter, "ema_periods", &DEFAULT_EMA_PERIODS)?,
        rsi_period: adapter.get_int("indicators", "rsi_period", DEFAULT_RSI_PERIOD as i64) as usize,
        rsi_overbought: adapter.get_double("indicators", "rsi_overbought", DEFAULT_OVERBOUGHT),
        rsi_oversold: adapter.get_double("indicators", "rsi_oversold", DEFAULT_OVERSOLD),
        cache_ttl: Duration::from_secs(
            adapter.get_int("cache", "ttl_seconds", DEFAULT_CACHE_TTL_SECS as i64) as u64,
        ),
        tail_rows: adapter.get_int("display", "tail_rows", DEFAULT_TAIL_ROWS as i64) as usize,
    })
}

pub fn market_data(config: &DashboardConfig) -> CachedMarketData<CsvAdapter> {
    CachedMarketData::new(CsvAdapter::new(config.data_dir.clone()), config.cache_ttl)
}

// ---------------------------------------------------------------------------
// technicals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TechnicalsReport {
    pub ticker: String,
    pub range: ChartRange,
    pub interval: Interval,
    pub bars: usize,
    pub change: Option<PriceChange>,
    pub growth_pct: f64,
    pub indicators: BTreeMap<IndicatorType, IndicatorSeries>,
    pub table: TechnicalsTable,
    pub rsi_zone: Option<RsiZone>,
}

pub fn compute_technicals(
    provider: &dyn PriceHistoryPort,
    config: &DashboardConfig,
    ticker: &str,
    range: ChartRange,
    interval: Interval,
    tail: usize,
) -> Result<TechnicalsReport, FinboardError> {
    let series = provider.fetch_history(ticker, range, interval)?;
    let indicators = compute_indicators(&series, &config.indicator_types());
    let table = TechnicalsTable::build(&series, &indicators, tail);

    let rsi_zone = indicators
        .get(&IndicatorType::Rsi(config.rsi_period))
        .and_then(IndicatorSeries::latest)
        .map(|v| classify_rsi(v, config.rsi_overbought, config.rsi_oversold));

    Ok(TechnicalsReport {
        ticker: series.ticker().to_string(),
        range,
        interval,
        bars: series.len(),
        change: PriceChange::from_series(&series),
        growth_pct: growth_pct(&series.closes()),
        indicators,
        table,
        rsi_zone,
    })
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

/// `1234567.891` → `1,234,567.89`
pub fn fmt_money(value: f64) -> String {
    let raw = format!("{:.2}", value.abs());
    let (int_part, frac) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && raw != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

impl fmt::Display for TechnicalsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.change {
            Some(c) => writeln!(
                f,
                "{} | Last close: {:.2} | Change: {:.2} ({:.2}%)",
                self.ticker, c.last_close, c.change, c.change_pct
            )?,
            None => writeln!(f, "{}", self.ticker)?,
        }
        writeln!(
            f,
            "{} bars, range {}, interval {}, growth {:.2}%",
            self.bars, self.range, self.interval, self.growth_pct
        )?;

        for (indicator_type, series) in &self.indicators {
            writeln!(f, "  {:<10} {}", indicator_type.to_string(), fmt_opt(series.latest()))?;
        }
        if let Some(zone) = self.rsi_zone {
            writeln!(f, "  RSI zone:  {}", zone.label())?;
        }

        writeln!(f)?;
        write!(
            f,
            "{:<19} {:>10} {:>10} {:>10} {:>10} {:>14}",
            "timestamp", "open", "high", "low", "close", "volume"
        )?;
        for column in &self.table.columns {
            write!(f, " {:>10}", column.to_string())?;
        }
        writeln!(f)?;

        for row in &self.table.rows {
            let bar = &row.bar;
            write!(
                f,
                "{:<19} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>14.0}",
                bar.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                bar.volume
            )?;
            for value in &row.values {
                write!(f, " {:>10}", fmt_opt(*value))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub fn render_technicals(report: &TechnicalsReport) -> String {
    report.to_string()
}

fn run_technicals(
    config_path: &Path,
    ticker: &str,
    range: Option<ChartRange>,
    interval: Option<Interval>,
    tail: Option<usize>,
) -> Result<(), FinboardError> {
    let adapter = load_config(config_path)?;
    let config = build_dashboard_config(&adapter)?;
    let provider = market_data(&config);

    let range = range.unwrap_or(config.range);
    let interval = interval.unwrap_or(config.interval);
    info!(ticker, %range, %interval, "computing technicals");

    let report = compute_technicals(
        &provider,
        &config,
        ticker,
        range,
        interval,
        tail.unwrap_or(config.tail_rows),
    )?;
    print!("{}", render_technicals(&report));
    Ok(())
}

// ---------------------------------------------------------------------------
// portfolio
// ---------------------------------------------------------------------------

/// Parses `TICKER:SHARES:BUY_PRICE`.
pub fn parse_position_arg(input: &str) -> Result<(String, f64, f64), PositionError> {
    let malformed = || PositionError::Malformed {
        input: input.to_string(),
    };
    let mut parts = input.split(':');
    let (Some(ticker), Some(shares), Some(price), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };
    let shares: f64 = shares.trim().parse().map_err(|_| malformed())?;
    let price: f64 = price.trim().parse().map_err(|_| malformed())?;
    Ok((ticker.to_string(), shares, price))
}

pub fn build_portfolio(args: &[String], created_at: DateTime<Utc>) -> Result<Portfolio, FinboardError> {
    let mut portfolio = Portfolio::new();
    for arg in args {
        let (ticker, shares, price) = parse_position_arg(arg)?;
        portfolio.add(&ticker, shares, price, created_at)?;
    }
    Ok(portfolio)
}

pub fn compute_portfolio(provider: &dyn QuotePort, portfolio: &Portfolio) -> PortfolioValuation {
    let quotes = fetch_quotes(provider, &portfolio.unique_tickers());
    value_positions(portfolio.positions(), &quote_map(&quotes))
}

/// Totals plus one row per position, largest market value first.
pub struct ValuationTable<'a>(pub &'a PortfolioValuation);

impl fmt::Display for ValuationTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valuation = self.0;
        writeln!(f, "Total Market Value: ${}", fmt_money(valuation.total_market_value))?;
        writeln!(
            f,
            "Total P/L: ${} ({:.2}%)",
            fmt_money(valuation.total_pl),
            valuation.total_pl_pct
        )?;
        if !valuation.missing_quotes.is_empty() {
            writeln!(f, "No quote for: {}", valuation.missing_quotes.join(", "))?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:<10} {:>12} {:>12} {:>12} {:>14} {:>14} {:>9}",
            "ticker", "shares", "buy_price", "price", "market_value", "pl_abs", "pl_pct"
        )?;
        for row in valuation.sorted_by_market_value() {
            writeln!(
                f,
                "{:<10} {:>12.4} {:>12.2} {:>12} {:>14} {:>14} {:>9}",
                row.position.ticker,
                row.position.shares,
                row.position.buy_price,
                fmt_opt(row.current_price),
                fmt_opt(row.market_value),
                fmt_opt(row.pl_abs),
                fmt_opt(row.pl_pct),
            )?;
        }
        Ok(())
    }
}

pub fn render_valuation(valuation: &PortfolioValuation) -> String {
    ValuationTable(valuation).to_string()
}

fn run_portfolio(config_path: &Path, positions: &[String]) -> Result<(), FinboardError> {
    let adapter = load_config(config_path)?;
    let config = build_dashboard_config(&adapter)?;
    let portfolio = build_portfolio(positions, Utc::now())?;
    info!(positions = portfolio.len(), "valuing portfolio");

    let valuation = compute_portfolio(&market_data(&config), &portfolio);
    print!("{}", render_valuation(&valuation));
    Ok(())
}

// ---------------------------------------------------------------------------
// validate / tickers
// ---------------------------------------------------------------------------

fn run_validate(config_path: &Path) -> Result<(), FinboardError> {
    let adapter = load_config(config_path)?;
    let config = build_dashboard_config(&adapter)?;

    eprintln!("data directory: {}", config.data_dir.display());
    eprintln!("range: {}, interval: {}", config.range, config.interval);
    let indicators: Vec<String> = config
        .indicator_types()
        .iter()
        .map(|i| i.to_string())
        .collect();
    eprintln!("indicators: {}", indicators.join(", "));
    eprintln!("cache ttl: {}s", config.cache_ttl.as_secs());
    eprintln!("\nConfiguration is valid.");
    Ok(())
}

fn run_tickers(config_path: &Path) -> Result<(), FinboardError> {
    let adapter = load_config(config_path)?;
    let config = build_dashboard_config(&adapter)?;
    let tickers = CsvAdapter::new(config.data_dir.clone()).list_tickers()?;

    if tickers.is_empty() {
        eprintln!("No tickers found in {}", config.data_dir.display());
    } else {
        for ticker in &tickers {
            println!("{}", ticker);
        }
        eprintln!("{} tickers found", tickers.len());
    }
    Ok(())
}
