use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid course selection: {0}")]
    InvalidSelection(#[source] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Remote API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// True for failures caught before anything was sent to the remote API.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::InvalidSelection(_) | AppError::Config(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
