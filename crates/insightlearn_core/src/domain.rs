//! crates/insightlearn_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

/// Represents a registered user - used throughout app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

// Only used internally for login - contains the stored password hash.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl UserCredentials {
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// The verified caller of a protected operation.
///
/// Only ever produced by the authorization gate from a verified bearer token;
/// request bodies never contribute to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub name: String,
    pub email: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// A PDF uploaded by a user, holding the text extracted from it.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
}

/// What the caller sees of a stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPreview {
    pub document_id: i64,
    pub title: String,
    pub preview: String,
}

/// A generated summary of one document. A document may have many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub id: i64,
    pub document_id: i64,
    pub summary: String,
}

/// A freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: &'static str,
}
