//! Error types for Ladder.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LadderError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl LadderError {
    pub fn code(&self) -> i32 {
        match self {
            LadderError::InvalidInput(_) => -32602,
            LadderError::Config(_) => -32010,
            LadderError::Io(_) => -32006,
            LadderError::Json(_) => -32700,
            LadderError::Toml(_) => -32701,
        }
    }

    /// Caller supplied bad data; the caller should reject or re-fetch it.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, LadderError::InvalidInput(_))
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        LadderError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, LadderError>;
