//! Error types for file link rendering

use thiserror::Error;

/// Errors raised while resolving or rendering a file element
#[derive(Error, Debug)]
pub enum FileLinkError {
    /// The element or its reference is malformed (content authoring error)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(#[from] std::fmt::Error),
}

impl FileLinkError {
    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Whether this is an authoring error rather than an I/O failure
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

pub type Result<T> = std::result::Result<T, FileLinkError>;
