//! Error types for the repository layer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur during repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// File not found at the specified path
    #[error("Rule set not found: {path}")]
    NotFound { path: String },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parser error from verdict-parser
    #[error("Parser error: {0}")]
    Parser(String),

    /// Invalid path provided
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Rule set id not found anywhere in the repository
    #[error("Rule set id not found: {id}")]
    IdNotFound { id: String },

    /// Generic error
    #[error("Repository error: {0}")]
    Other(String),
}

impl From<verdict_parser::ParseError> for RepositoryError {
    fn from(err: verdict_parser::ParseError) -> Self {
        RepositoryError::Parser(err.to_string())
    }
}
