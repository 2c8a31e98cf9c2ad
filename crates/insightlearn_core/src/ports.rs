//! crates/insightlearn_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the database, the PDF library and the LLM provider.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::{Document, Summary, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable storage for users, documents and summaries.
///
/// Every call acquires its own connection and releases it before returning.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    async fn email_exists(&self, email: &str) -> PortResult<bool>;

    /// Fails with `PortError::Conflict` if the email is already taken.
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    // --- Document Management ---
    async fn create_document(&self, user_id: i64, title: &str, content: &str) -> PortResult<Document>;

    /// Looks up a document owned by the user with the given email.
    /// A missing document and a document owned by someone else both yield `NotFound`.
    async fn get_owned_document(&self, document_id: i64, owner_email: &str) -> PortResult<Document>;

    async fn list_documents_for_user(&self, user_id: i64) -> PortResult<Vec<Document>>;

    // --- Summary Management ---
    async fn create_summary(&self, document_id: i64, summary: &str) -> PortResult<Summary>;

    async fn list_summaries_for_document(&self, document_id: i64) -> PortResult<Vec<Summary>>;
}

#[async_trait]
pub trait TextExtractionService: Send + Sync {
    /// Extracts the plain text of the PDF stored at `path`.
    async fn extract_text(&self, path: &Path) -> PortResult<String>;
}

#[async_trait]
pub trait SummarizationService: Send + Sync {
    /// Produces a concise summary of `text`.
    async fn summarize(&self, text: &str) -> PortResult<String>;
}
