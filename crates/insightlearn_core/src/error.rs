//! crates/insightlearn_core/src/error.rs
//!
//! The error taxonomy shared by every application operation. Web handlers turn
//! these into responses; nothing below the boundary knows about HTTP.

use crate::ports::PortError;
use crate::token::TokenError;

/// Why a caller could not be authenticated.
///
/// The variants stay distinct so operators can tell them apart in the logs; the
/// `Display` text is what a client gets to see.
#[derive(Debug, thiserror::Error)]
pub enum AuthFailure {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Not authenticated")]
    MissingToken,
    #[error("Invalid or expired token")]
    Token(#[source] TokenError),
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Unauthorized(#[from] AuthFailure),
    /// Covers both "does not exist" and "belongs to another user".
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<PortError> for ServiceError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(msg) => Self::NotFound(msg),
            PortError::Conflict(msg) => Self::Conflict(msg),
            PortError::Unexpected(msg) => Self::Internal(msg),
        }
    }
}

impl From<TokenError> for ServiceError {
    fn from(err: TokenError) -> Self {
        Self::Unauthorized(AuthFailure::Token(err))
    }
}
