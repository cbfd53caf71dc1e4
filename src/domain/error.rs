//! Domain error types.

/// Reasons a position is rejected by the session portfolio.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PositionError {
    #[error("ticker must not be empty")]
    EmptyTicker,

    #[error("shares must be positive, got {0}")]
    NonPositiveShares(f64),

    #[error("buy price must be non-negative, got {0}")]
    NegativeBuyPrice(f64),

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("invalid position '{input}': expected TICKER:SHARES:PRICE")]
    Malformed { input: String },
}

/// Top-level error type for finboard.
#[derive(Debug, thiserror::Error)]
pub enum FinboardError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("price series for {ticker} is not strictly increasing at {timestamp}")]
    UnorderedSeries { ticker: String, timestamp: String },

    #[error(transparent)]
    InvalidPosition(#[from] PositionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FinboardError> for std::process::ExitCode {
    fn from(err: &FinboardError) -> Self {
        let code: u8 = match err {
            FinboardError::Io(_) => 1,
            FinboardError::ConfigParse { .. }
            | FinboardError::ConfigMissing { .. }
            | FinboardError::ConfigInvalid { .. } => 2,
            FinboardError::DataSource { .. } | FinboardError::UnorderedSeries { .. } => 3,
            FinboardError::InvalidPosition(_) => 4,
            FinboardError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
