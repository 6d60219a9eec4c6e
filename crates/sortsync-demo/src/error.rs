#![forbid(unsafe_code)]

use sortsync_core::SortableError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("engine error: {0}")]
    Engine(#[from] SortableError),

    #[error("invalid scenario: {message}")]
    InvalidScenario { message: String },
}

impl DemoError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidScenario { .. } | Self::Json(_) => 2,
            Self::Engine(_) => 3,
            Self::Io(_) => 1,
        }
    }

    #[must_use]
    pub fn scenario(message: impl Into<String>) -> Self {
        Self::InvalidScenario {
            message: message.into(),
        }
    }
}
