//! Error types shared across the engine, collaborators and runtime.
//!
//! Data insufficiency and sizing failures never surface as errors: the engine
//! folds them into a `NoAction` intent. Everything here is either a startup
//! problem or a collaborator failure that aborts a single cycle.

use thiserror::Error;

/// Failure of an external collaborator call (exchange, market data, account)
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("exchange returned error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("API credentials are not configured")]
    MissingCredentials,

    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Failure delivering a notification. Logged, never propagated past the sink.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("notification endpoint returned status {0}")]
    Status(u16),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to parse {key}: {value:?}")]
    Parse { key: String, value: String },
}

/// A decision cycle that was aborted before producing an intent
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("balance query failed: {0}")]
    Balance(#[source] CollaboratorError),

    #[error("candle fetch failed: {0}")]
    Candles(#[source] CollaboratorError),

    #[error("position query failed: {0}")]
    Position(#[source] CollaboratorError),

    #[error("order placement failed: {0}")]
    Order(#[source] CollaboratorError),
}

impl CycleError {
    /// Short label used as a metrics dimension and log field
    pub fn step(&self) -> &'static str {
        match self {
            CycleError::Balance(_) => "balance",
            CycleError::Candles(_) => "candles",
            CycleError::Position(_) => "position",
            CycleError::Order(_) => "order",
        }
    }
}
