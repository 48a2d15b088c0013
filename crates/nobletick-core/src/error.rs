use thiserror::Error;

/// Validation and contract errors exposed by `nobletick-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("exchange rate must be a positive finite number: {value}")]
    InvalidExchangeRate { value: f64 },
}

/// Transport-level failure for an upstream GET.
///
/// Carries the upstream HTTP status when one exists; timeouts and transport
/// errors report status 500.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("network failure (status {status}): {message}")]
pub struct FetchError {
    status: u16,
    message: String,
}

impl FetchError {
    /// Failure carrying an upstream HTTP status code.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Transport failure with no upstream status (timeout, DNS, connect).
    pub fn transport(message: impl Into<String>) -> Self {
        Self::status(500, message)
    }

    pub const fn status_code(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure locating or decoding the JSON payload embedded in a scraped page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("no script segment carries the market-data markers")]
    DataSegmentNotFound,

    #[error("marker '{marker}' absent or braces never balance")]
    UnbalancedJson { marker: String },

    #[error("embedded JSON failed to parse: {0}")]
    Json(String),

    #[error("embedded JSON has unexpected shape at '{path}'")]
    Shape { path: &'static str },
}

/// Cycle-level error for one scrape attempt against a price source.
///
/// Both variants are caught at the scheduler boundary and turned into a
/// degraded snapshot; they never escape the refresh loop.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Network(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

impl ScrapeError {
    /// Upstream status associated with this failure, 500 when none applies.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Network(err) => err.status_code(),
            Self::Extraction(_) => 500,
        }
    }
}
