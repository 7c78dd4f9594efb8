use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, FeedError>;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("request for {symbol} failed with status {status}")]
    Status {
        symbol: String,
        status: reqwest::StatusCode,
    },
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FeedError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        FeedError::Message(msg.into())
    }
}
