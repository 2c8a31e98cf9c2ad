//! services/api/src/error.rs
//!
//! Defines the startup error type for the API service. Request-level failures
//! are `ServiceError`s and are turned into responses in `web::response`.

use crate::config::ConfigError;
use insightlearn_core::token::TokenError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The token service refused the configured secret or algorithm.
    #[error("Token configuration error: {0}")]
    Token(#[from] TokenError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
