use reqwest::StatusCode;
use thiserror::Error;

/// Boxed error returned by a [`Transport`](crate::market_data::adapters::Transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum TickerError {
    #[error("http request failed: {0}")]
    Transport(#[source] BoxError),

    #[error("upstream kept answering 502 Bad Gateway after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("upstream returned status {status}")]
    TerminalStatus { status: StatusCode },

    #[error("could not parse api response data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("api reported failure (success = {success}): {message}")]
    Rejected { success: i64, message: String },

    #[error("market {code} not found in response")]
    MarketNotFound { code: String },

    #[error("invalid decimal value {value:?}")]
    InvalidDecimal { value: String },

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

pub type TickerResult<T> = Result<T, TickerError>;
