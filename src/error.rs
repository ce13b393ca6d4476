use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Boxed error returned by a [`Transport`](crate::Transport) implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    #[error("from ({from}) must be strictly earlier than to ({to})")]
    InvalidRange { from: String, to: String },

    #[error("the maximum date range is limited to 30 days; from ({from}) to ({to})")]
    RangeTooLarge { from: String, to: String },

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("malformed API response: {reason}\n{body}")]
    MalformedResponse { reason: String, body: String },

    #[error("API error; code: {} message: {}", .0.code, .0.message)]
    Api(ApiError),

    #[error("unexpected API response; expected {expected} entry, got {found}\n{body}")]
    UnexpectedEntryCount {
        expected: usize,
        found: usize,
        body: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn malformed(reason: impl fmt::Display, body: &str) -> Self {
        Error::MalformedResponse {
            reason: reason.to_string(),
            body: body.to_string(),
        }
    }
}

/// A caller-supplied parameter outside the range the API accepts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("settlement period {0}; must be 1 <= settlement period <= 48")]
    SettlementPeriod(u32),

    #[error("block size {0:?}; must be between 1 and 24 hours inclusive")]
    BlockSize(Duration),
}

/// Business error reported by the API in an `{"error": {...}}` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
