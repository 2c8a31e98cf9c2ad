//! crates/insightlearn_core/src/token.rs
//!
//! Issues and verifies the signed, time-limited bearer tokens handed out at login.
//!
//! Tokens are stateless: nothing is stored server-side, so a token stays valid
//! until its `exp` passes. Identity claims are string-typed on the wire; numeric
//! ids are rendered with `to_string()` when issued and parsed back when the
//! token is turned into an [`Identity`].

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

use crate::domain::Identity;

/// Lifetime of a token when none is configured: one day.
pub const DEFAULT_TTL_MINUTES: i64 = 1440;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token is malformed: {0}")]
    Malformed(String),
    #[error("failed to encode token: {0}")]
    Encoding(String),
    #[error("invalid token configuration: {0}")]
    Configuration(String),
}

/// The claim set carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The user's database id, as a string.
    pub id: String,
    /// The user's display name.
    pub sub: String,
    pub email: String,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds).
    pub exp: i64,
}

impl TryFrom<Claims> for Identity {
    type Error = TokenError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims
            .id
            .parse::<i64>()
            .map_err(|_| TokenError::Malformed(format!("non-numeric id claim '{}'", claims.id)))?;
        Ok(Self {
            user_id,
            name: claims.sub,
            email: claims.email,
        })
    }
}

/// Signs and verifies tokens with a process-wide secret handed over at construction.
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Only the HMAC family (HS256, HS384, HS512) is accepted, since the key is a
    /// shared secret.
    pub fn new(secret: &str, algorithm: &str, ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Configuration("secret key is empty".to_string()));
        }
        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|_| TokenError::Configuration(format!("unknown algorithm '{}'", algorithm)))?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(TokenError::Configuration(format!(
                "algorithm {:?} needs a key pair, only HMAC algorithms are supported",
                algorithm
            )));
        }
        if ttl <= Duration::zero() {
            return Err(TokenError::Configuration("token lifetime must be positive".to_string()));
        }

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    /// Issues a token for `identity` using the configured lifetime.
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_with_ttl(identity, self.ttl)
    }

    pub fn issue_with_ttl(&self, identity: &Identity, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now(), ttl)
    }

    fn issue_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            id: identity.user_id.to_string(),
            sub: identity.name.clone(),
            email: identity.email.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        };
        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Checks the signature and expiry of `token` and returns its claims.
    ///
    /// Failures are logged here with their cause; callers are expected to treat
    /// every variant as "no valid token".
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let result = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })
            // Valid only strictly before `exp`, including its final second.
            .and_then(|data| {
                if data.claims.exp <= Utc::now().timestamp() {
                    Err(TokenError::Expired)
                } else {
                    Ok(data.claims)
                }
            });

        if let Err(e) = &result {
            warn!("Rejected bearer token: {}", e);
        }
        result
    }

    /// Verifies `token` and converts its claims into the caller's identity.
    pub fn identify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify(token).and_then(Identity::try_from)
    }
}
