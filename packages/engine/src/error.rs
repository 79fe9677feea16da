use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("session {0} is already completed")]
    SessionClosed(String),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("question store error: {0}")]
    Store(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("logging init failed: {0}")]
    Logging(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
