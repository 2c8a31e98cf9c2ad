//! crates/insightlearn_core/src/testing.rs
//!
//! In-memory implementations of the ports, for tests that should not need
//! Postgres, a PDF library or an LLM.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::domain::{Document, Summary, User, UserCredentials};
use crate::ports::{
    DatabaseService, PortError, PortResult, SummarizationService, TextExtractionService,
};

#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    documents: Vec<Document>,
    summaries: Vec<Summary>,
}

/// Mirrors the Postgres schema: serial ids starting at 1, unique emails.
#[derive(Default)]
pub struct InMemoryDatabase {
    tables: Mutex<Tables>,
    failing_writes: AtomicBool,
}

impl InMemoryDatabase {
    /// Makes every later document or summary insert fail as if the database
    /// had gone away. Reads keep working.
    pub fn fail_writes(&self) {
        self.failing_writes.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> PortResult<()> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("database unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DatabaseService for InMemoryDatabase {
    async fn email_exists(&self, email: &str) -> PortResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().any(|u| u.email == email))
    }

    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> PortResult<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.email == email) {
            return Err(PortError::Conflict(format!("email {} already registered", email)));
        }
        let credentials = UserCredentials {
            id: tables.users.len() as i64 + 1,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        let user = credentials.to_user();
        tables.users.push(credentials);
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let tables = self.tables.lock().await;
        tables
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn create_document(&self, user_id: i64, title: &str, content: &str) -> PortResult<Document> {
        self.check_writable()?;
        let mut tables = self.tables.lock().await;
        let document = Document {
            id: tables.documents.len() as i64 + 1,
            user_id,
            title: title.to_string(),
            content: content.to_string(),
        };
        tables.documents.push(document.clone());
        Ok(document)
    }

    async fn get_owned_document(&self, document_id: i64, owner_email: &str) -> PortResult<Document> {
        let tables = self.tables.lock().await;
        let owner = tables.users.iter().find(|u| u.email == owner_email);
        tables
            .documents
            .iter()
            .find(|d| d.id == document_id && owner.is_some_and(|o| o.id == d.user_id))
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Document {} not found", document_id)))
    }

    async fn list_documents_for_user(&self, user_id: i64) -> PortResult<Vec<Document>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .documents
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_summary(&self, document_id: i64, summary: &str) -> PortResult<Summary> {
        self.check_writable()?;
        let mut tables = self.tables.lock().await;
        let summary = Summary {
            id: tables.summaries.len() as i64 + 1,
            document_id,
            summary: summary.to_string(),
        };
        tables.summaries.push(summary.clone());
        Ok(summary)
    }

    async fn list_summaries_for_document(&self, document_id: i64) -> PortResult<Vec<Summary>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .summaries
            .iter()
            .filter(|s| s.document_id == document_id)
            .cloned()
            .collect())
    }
}

/// Returns a fixed text (or error) and records what it was asked to read.
pub struct StaticExtractor {
    result: Result<String, String>,
    pub calls: AtomicUsize,
    /// Whether the file existed while the extractor was looking at it.
    pub saw_file: AtomicBool,
    last_path: Mutex<Option<PathBuf>>,
}

impl StaticExtractor {
    pub fn returning(text: &str) -> Self {
        Self::new(Ok(text.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::new(Err(message.to_string()))
    }

    fn new(result: Result<String, String>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
            saw_file: AtomicBool::new(false),
            last_path: Mutex::new(None),
        }
    }

    pub async fn last_path(&self) -> Option<PathBuf> {
        self.last_path.lock().await.clone()
    }
}

#[async_trait]
impl TextExtractionService for StaticExtractor {
    async fn extract_text(&self, path: &Path) -> PortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.saw_file.store(path.exists(), Ordering::SeqCst);
        *self.last_path.lock().await = Some(path.to_path_buf());
        self.result.clone().map_err(PortError::Unexpected)
    }
}

/// Returns a fixed summary (or error), optionally after a delay.
pub struct StaticSummarizer {
    result: Result<String, String>,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
    last_input: Mutex<Option<String>>,
}

impl StaticSummarizer {
    pub fn returning(summary: &str) -> Self {
        Self::new(Ok(summary.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::new(Err(message.to_string()))
    }

    fn new(result: Result<String, String>) -> Self {
        Self {
            result,
            delay: None,
            calls: AtomicUsize::new(0),
            last_input: Mutex::new(None),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn last_input(&self) -> Option<String> {
        self.last_input.lock().await.clone()
    }
}

#[async_trait]
impl SummarizationService for StaticSummarizer {
    async fn summarize(&self, text: &str) -> PortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().await = Some(text.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone().map_err(PortError::Unexpected)
    }
}
