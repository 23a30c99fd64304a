// ABOUTME: Error types for the fold-deck application
// ABOUTME: Separates fatal configuration failures from recoverable asset problems

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("I/O error: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to parse deck file {path}: {message}")]
    DeckParseError { path: PathBuf, message: String },

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Watch error: {0}")]
    WatchError(String),
}

impl DeckError {
    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        DeckError::DeckParseError {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
