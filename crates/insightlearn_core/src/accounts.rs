//! crates/insightlearn_core/src/accounts.rs
//!
//! Registration and login.

use std::sync::Arc;
use tracing::{info, warn};

use crate::credentials::{hash_password, verify_password};
use crate::domain::{AccessToken, Identity, User};
use crate::error::{AuthFailure, ServiceError, ServiceResult};
use crate::ports::{DatabaseService, PortError};
use crate::token::TokenService;

pub const TOKEN_TYPE: &str = "bearer";

#[derive(Clone)]
pub struct AccountService {
    db: Arc<dyn DatabaseService>,
    tokens: Arc<TokenService>,
}

impl AccountService {
    pub fn new(db: Arc<dyn DatabaseService>, tokens: Arc<TokenService>) -> Self {
        Self { db, tokens }
    }

    /// Creates a user. A second registration with the same email is a `Conflict`.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ServiceResult<User> {
        if self.db.email_exists(email).await? {
            return Err(ServiceError::Conflict("Email already exists".to_string()));
        }

        let password_hash = hash_password(password).map_err(ServiceError::internal)?;

        // The unique index still guards against two racing registrations.
        let user = self
            .db
            .create_user(name, email, &password_hash)
            .await
            .map_err(|e| match e {
                PortError::Conflict(_) => ServiceError::Conflict("Email already exists".to_string()),
                other => other.into(),
            })?;

        info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Checks the credentials and issues a bearer token for the user.
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<AccessToken> {
        let credentials = match self.db.get_user_by_email(email).await {
            Ok(credentials) => credentials,
            Err(PortError::NotFound(_)) => {
                return Err(AuthFailure::InvalidCredentials.into());
            }
            Err(e) => return Err(e.into()),
        };

        if !verify_password(password, &credentials.password_hash) {
            warn!("Failed login for user {}", credentials.id);
            return Err(AuthFailure::InvalidCredentials.into());
        }

        let identity = Identity::from(&credentials.to_user());
        let access_token = self.tokens.issue(&identity).map_err(ServiceError::internal)?;

        Ok(AccessToken {
            access_token,
            token_type: TOKEN_TYPE,
        })
    }
}
