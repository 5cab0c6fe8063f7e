//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Parser error
    #[error("Parser error: {0}")]
    ParseError(#[from] verdict_parser::ParseError),

    /// Rule model error
    #[error("Core error: {0}")]
    CoreError(#[from] verdict_core::CoreError),

    /// Runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(#[from] verdict_runtime::RuntimeError),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(#[from] verdict_repository::RepositoryError),

    /// No rule set was configured or found
    #[error("No rule set configured")]
    NoRuleSet,

    /// Reload requested without a repository to reload from
    #[error("Engine has no repository to reload from")]
    NoRepository,
}

impl From<config::ConfigError> for SdkError {
    fn from(err: config::ConfigError) -> Self {
        SdkError::ConfigError(err.to_string())
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
