//! crates/insightlearn_core/src/gate.rs
//!
//! The single entry point for protected operations: turns an `Authorization`
//! header into a verified [`Identity`] or rejects the call.

use std::sync::Arc;

use crate::domain::Identity;
use crate::error::{AuthFailure, ServiceError, ServiceResult};
use crate::token::TokenService;

const BEARER_SCHEME: &str = "Bearer";

#[derive(Clone)]
pub struct AuthorizationGate {
    tokens: Arc<TokenService>,
}

impl AuthorizationGate {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// Resolves the raw `Authorization` header value to the caller's identity.
    pub fn authenticate(&self, authorization: Option<&str>) -> ServiceResult<Identity> {
        let token = authorization
            .and_then(bearer_token)
            .ok_or(ServiceError::Unauthorized(AuthFailure::MissingToken))?;
        Ok(self.tokens.identify(token)?)
    }
}

/// Extracts the credentials of a `Bearer <token>` header value.
/// The scheme is matched case-insensitively.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenError;
    use chrono::Duration;

    fn gate() -> (AuthorizationGate, Arc<TokenService>) {
        let tokens = Arc::new(TokenService::new("gate-secret", "HS256", Duration::hours(1)).unwrap());
        (AuthorizationGate::new(tokens.clone()), tokens)
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Basic dXNlcjpwdw=="), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[test]
    fn test_valid_token_yields_identity() {
        let (gate, tokens) = gate();
        let identity = Identity {
            user_id: 7,
            name: "B".to_string(),
            email: "b@x.com".to_string(),
        };
        let header = format!("Bearer {}", tokens.issue(&identity).unwrap());

        assert_eq!(gate.authenticate(Some(&header)).unwrap(), identity);
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let (gate, _) = gate();
        assert!(matches!(
            gate.authenticate(None),
            Err(ServiceError::Unauthorized(AuthFailure::MissingToken))
        ));
        assert!(matches!(
            gate.authenticate(Some("Token abc")),
            Err(ServiceError::Unauthorized(AuthFailure::MissingToken))
        ));
    }

    #[test]
    fn test_bad_token_is_unauthorized() {
        let (gate, _) = gate();
        assert!(matches!(
            gate.authenticate(Some("Bearer nonsense")),
            Err(ServiceError::Unauthorized(AuthFailure::Token(TokenError::Malformed(_))))
        ));
    }
}
