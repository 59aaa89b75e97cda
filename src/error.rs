use thiserror::Error;
use tokio::task::JoinError;

/// Failure modes of a single upstream fetch.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {message} (status: {status_code})")]
    Status { status_code: u16, message: String },

    #[error("Unexpected payload: {0}")]
    Payload(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("Not configured: {0}")]
    Unconfigured(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

impl SourceError {
    /// Missing configuration disables a source without counting as a failure.
    pub fn is_soft_disable(&self) -> bool {
        matches!(self, SourceError::Unconfigured(_))
    }

    pub fn status<S: Into<String>>(status_code: u16, message: S) -> Self {
        SourceError::Status {
            status_code,
            message: message.into(),
        }
    }

    pub fn payload<S: Into<String>>(message: S) -> Self {
        SourceError::Payload(message.into())
    }
}

/// Settled result of one fan-out branch.
#[derive(Debug)]
pub enum Outcome<T> {
    Succeeded(T),
    Failed(String),
}

impl<T> Outcome<T> {
    pub fn from_join(result: Result<T, JoinError>) -> Self {
        match result {
            Ok(value) => Outcome::Succeeded(value),
            Err(e) if e.is_panic() => Outcome::Failed("branch panicked".to_string()),
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Outcome::Succeeded(_))
    }
}

impl<T> Outcome<Vec<T>> {
    /// A failed branch contributes nothing; the reason is logged under `branch`.
    pub fn into_items(self, branch: &str) -> Vec<T> {
        match self {
            Outcome::Succeeded(items) => items,
            Outcome::Failed(reason) => {
                tracing::warn!(branch, %reason, "Branch failed, contributing no items");
                Vec::new()
            }
        }
    }
}
