//! crates/insightlearn_core/src/documents.rs
//!
//! The document lifecycle: upload -> extract -> store -> summarize (any number of times).
//!
//! Every operation takes the verified [`Identity`] of the caller and scopes all
//! document access to it.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::domain::{Document, DocumentPreview, Identity, Summary};
use crate::error::{ServiceError, ServiceResult};
use crate::ports::{DatabaseService, PortError, PortResult, SummarizationService, TextExtractionService};

/// Number of characters of extracted text shown back after an upload.
pub const PREVIEW_CHARS: usize = 300;

pub const DOCUMENT_EXTENSION: &str = ".pdf";

const NOT_FOUND_MESSAGE: &str = "Document not found or not yours";

/// The first [`PREVIEW_CHARS`] characters of `text`, with `...` appended when cut short.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Rejects file names that do not carry the `.pdf` extension (any case).
pub fn validate_file_name(file_name: &str) -> ServiceResult<()> {
    let lower = file_name.to_ascii_lowercase();
    if lower.len() > DOCUMENT_EXTENSION.len() && lower.ends_with(DOCUMENT_EXTENSION) {
        Ok(())
    } else {
        Err(ServiceError::InvalidInput("Only PDF files are allowed".to_string()))
    }
}

impl Document {
    pub fn to_preview(&self) -> DocumentPreview {
        DocumentPreview {
            document_id: self.id,
            title: self.title.clone(),
            preview: preview(&self.content),
        }
    }
}

#[derive(Clone)]
pub struct DocumentService {
    db: Arc<dyn DatabaseService>,
    extractor: Arc<dyn TextExtractionService>,
    summarizer: Arc<dyn SummarizationService>,
    /// Upper bound on a single extraction or summarization call.
    collaborator_timeout: Duration,
}

impl DocumentService {
    pub fn new(
        db: Arc<dyn DatabaseService>,
        extractor: Arc<dyn TextExtractionService>,
        summarizer: Arc<dyn SummarizationService>,
        collaborator_timeout: Duration,
    ) -> Self {
        Self {
            db,
            extractor,
            summarizer,
            collaborator_timeout,
        }
    }

    /// Stores an uploaded PDF for `identity`.
    ///
    /// The bytes are written to a temporary file for the extractor; the file is
    /// removed before this returns, whether extraction worked or not.
    pub async fn upload(
        &self,
        identity: &Identity,
        file_name: &str,
        bytes: &[u8],
    ) -> ServiceResult<DocumentPreview> {
        validate_file_name(file_name)?;

        let mut tmp = tempfile::Builder::new()
            .prefix("insightlearn-upload-")
            .suffix(DOCUMENT_EXTENSION)
            .tempfile()
            .map_err(ServiceError::internal)?;
        tmp.write_all(bytes)
            .and_then(|_| tmp.flush())
            .map_err(ServiceError::internal)?;

        let extracted = self
            .bounded("Text extraction", self.extractor.extract_text(tmp.path()))
            .await;
        if let Err(e) = tmp.close() {
            warn!("Failed to remove temporary upload file: {}", e);
        }
        let content = extracted.map_err(into_internal)?;

        let document = self
            .db
            .create_document(identity.user_id, file_name, &content)
            .await
            .map_err(ServiceError::internal)?;

        info!("Stored document {} for user {}", document.id, identity.user_id);
        Ok(document.to_preview())
    }

    /// Summarizes one of the caller's documents and stores the result.
    ///
    /// Documents that do not exist and documents owned by someone else are both
    /// reported as `NotFound`.
    pub async fn summarize(&self, identity: &Identity, document_id: i64) -> ServiceResult<Summary> {
        let document = self.owned_document(identity, document_id).await?;

        if document.content.trim().is_empty() {
            return Err(ServiceError::InvalidInput("No content found in document".to_string()));
        }

        let text = self
            .bounded("Summarization", self.summarizer.summarize(&document.content))
            .await
            .map_err(into_internal)?;

        let summary = self
            .db
            .create_summary(document.id, &text)
            .await
            .map_err(ServiceError::internal)?;

        info!("Stored summary {} for document {}", summary.id, document.id);
        Ok(summary)
    }

    pub async fn list_documents(&self, identity: &Identity) -> ServiceResult<Vec<DocumentPreview>> {
        let documents = self
            .db
            .list_documents_for_user(identity.user_id)
            .await
            .map_err(ServiceError::internal)?;
        Ok(documents.iter().map(Document::to_preview).collect())
    }

    pub async fn list_summaries(&self, identity: &Identity, document_id: i64) -> ServiceResult<Vec<Summary>> {
        let document = self.owned_document(identity, document_id).await?;
        self.db
            .list_summaries_for_document(document.id)
            .await
            .map_err(ServiceError::internal)
    }

    async fn owned_document(&self, identity: &Identity, document_id: i64) -> ServiceResult<Document> {
        self.db
            .get_owned_document(document_id, &identity.email)
            .await
            .map_err(|e| match e {
                PortError::NotFound(_) => ServiceError::NotFound(NOT_FOUND_MESSAGE.to_string()),
                other => ServiceError::internal(other),
            })
    }

    /// Runs a collaborator call under the configured deadline.
    async fn bounded<T>(
        &self,
        what: &str,
        call: impl Future<Output = PortResult<T>>,
    ) -> PortResult<T> {
        tokio::time::timeout(self.collaborator_timeout, call)
            .await
            .unwrap_or_else(|_| {
                Err(PortError::Unexpected(format!(
                    "{} timed out after {}s",
                    what,
                    self.collaborator_timeout.as_secs()
                )))
            })
    }
}

/// Collaborator failures are internal errors regardless of their port kind.
fn into_internal(err: PortError) -> ServiceError {
    ServiceError::internal(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryDatabase, StaticExtractor, StaticSummarizer};
    use std::sync::atomic::Ordering;

    struct Fixture {
        db: Arc<InMemoryDatabase>,
        extractor: Arc<StaticExtractor>,
        summarizer: Arc<StaticSummarizer>,
        documents: DocumentService,
        alice: Identity,
        bob: Identity,
    }

    async fn fixture(extracted: &str) -> Fixture {
        let db = Arc::new(InMemoryDatabase::default());
        let extractor = Arc::new(StaticExtractor::returning(extracted));
        let summarizer = Arc::new(StaticSummarizer::returning("a short summary"));
        let alice = Identity::from(&db.create_user("A", "a@x.com", "hash").await.unwrap());
        let bob = Identity::from(&db.create_user("B", "b@x.com", "hash").await.unwrap());
        let documents = DocumentService::new(
            db.clone(),
            extractor.clone(),
            summarizer.clone(),
            Duration::from_secs(5),
        );
        Fixture {
            db,
            extractor,
            summarizer,
            documents,
            alice,
            bob,
        }
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let long = "x".repeat(PREVIEW_CHARS + 1);
        let short = "y".repeat(PREVIEW_CHARS);

        assert_eq!(preview(&long), format!("{}...", "x".repeat(PREVIEW_CHARS)));
        assert_eq!(preview(&short), short);
        assert_eq!(preview(""), "");
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let text = "é".repeat(PREVIEW_CHARS + 10);
        let shown = preview(&text);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_file_name_validation() {
        assert!(validate_file_name("notes.pdf").is_ok());
        assert!(validate_file_name("NOTES.PDF").is_ok());
        assert!(validate_file_name("notes.txt").is_err());
        assert!(validate_file_name("pdf").is_err());
        assert!(validate_file_name(".pdf").is_err());
    }

    #[tokio::test]
    async fn test_upload_stores_document_and_removes_temp_file() {
        let f = fixture(&"word ".repeat(100)).await;

        let uploaded = f.documents.upload(&f.alice, "paper.pdf", b"%PDF-1.4").await.unwrap();

        assert_eq!(uploaded.title, "paper.pdf");
        assert!(uploaded.preview.ends_with("..."));
        assert_eq!(uploaded.preview.chars().count(), PREVIEW_CHARS + 3);

        let stored = f.db.get_owned_document(uploaded.document_id, "a@x.com").await.unwrap();
        assert_eq!(stored.user_id, f.alice.user_id);
        assert_eq!(stored.content, "word ".repeat(100));

        let seen = f.extractor.last_path().await.unwrap();
        assert!(f.extractor.saw_file.load(Ordering::SeqCst));
        assert!(!seen.exists());
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf_before_extraction() {
        let f = fixture("text").await;

        let result = f.documents.upload(&f.alice, "paper.docx", b"data").await;

        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
        assert_eq!(f.extractor.calls.load(Ordering::SeqCst), 0);
        assert!(f.documents.list_documents(&f.alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_extraction_is_internal_and_cleans_up() {
        let db = Arc::new(InMemoryDatabase::default());
        let extractor = Arc::new(StaticExtractor::failing("corrupt xref table"));
        let documents = DocumentService::new(
            db.clone(),
            extractor.clone(),
            Arc::new(StaticSummarizer::returning("unused")),
            Duration::from_secs(5),
        );
        let alice = Identity::from(&db.create_user("A", "a@x.com", "hash").await.unwrap());

        let result = documents.upload(&alice, "broken.pdf", b"garbage").await;

        match result {
            Err(ServiceError::Internal(msg)) => assert!(msg.contains("corrupt xref table")),
            other => panic!("expected internal error, got {:?}", other),
        }
        assert!(!extractor.last_path().await.unwrap().exists());
        assert!(documents.list_documents(&alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summarize_own_document() {
        let f = fixture("some extracted text").await;
        let uploaded = f.documents.upload(&f.alice, "a.pdf", b"%PDF").await.unwrap();

        let summary = f.documents.summarize(&f.alice, uploaded.document_id).await.unwrap();

        assert_eq!(summary.document_id, uploaded.document_id);
        assert_eq!(summary.summary, "a short summary");
        assert_eq!(f.summarizer.last_input().await.as_deref(), Some("some extracted text"));
    }

    #[tokio::test]
    async fn test_document_can_be_summarized_repeatedly() {
        let f = fixture("some extracted text").await;
        let uploaded = f.documents.upload(&f.alice, "a.pdf", b"%PDF").await.unwrap();

        let first = f.documents.summarize(&f.alice, uploaded.document_id).await.unwrap();
        let second = f.documents.summarize(&f.alice, uploaded.document_id).await.unwrap();

        assert_ne!(first.id, second.id);
        let all = f.documents.list_summaries(&f.alice, uploaded.document_id).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_summarize_other_users_document_is_not_found() {
        let f = fixture("private text").await;
        let uploaded = f.documents.upload(&f.alice, "a.pdf", b"%PDF").await.unwrap();

        let result = f.documents.summarize(&f.bob, uploaded.document_id).await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert_eq!(f.summarizer.calls.load(Ordering::SeqCst), 0);
        assert!(matches!(
            f.documents.list_summaries(&f.bob, uploaded.document_id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_summarize_missing_document_is_not_found() {
        let f = fixture("text").await;

        let result = f.documents.summarize(&f.alice, 999).await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_summarize_empty_document_skips_model() {
        let f = fixture("").await;
        let uploaded = f.documents.upload(&f.alice, "blank.pdf", b"%PDF").await.unwrap();

        let result = f.documents.summarize(&f.alice, uploaded.document_id).await;

        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
        assert_eq!(f.summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_summarizer_failure_is_internal() {
        let db = Arc::new(InMemoryDatabase::default());
        let documents = DocumentService::new(
            db.clone(),
            Arc::new(StaticExtractor::returning("text")),
            Arc::new(StaticSummarizer::failing("rate limited")),
            Duration::from_secs(5),
        );
        let alice = Identity::from(&db.create_user("A", "a@x.com", "hash").await.unwrap());
        let uploaded = documents.upload(&alice, "a.pdf", b"%PDF").await.unwrap();

        let result = documents.summarize(&alice, uploaded.document_id).await;

        assert!(matches!(result, Err(ServiceError::Internal(msg)) if msg.contains("rate limited")));
        assert!(db.list_summaries_for_document(uploaded.document_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_during_upload_is_internal() {
        let f = fixture("text").await;
        f.db.fail_writes();

        let result = f.documents.upload(&f.alice, "a.pdf", b"%PDF").await;

        assert!(matches!(result, Err(ServiceError::Internal(msg)) if msg.contains("database unavailable")));
        assert_eq!(f.extractor.calls.load(Ordering::SeqCst), 1);
        assert!(!f.extractor.last_path().await.unwrap().exists());
        assert!(f.documents.list_documents(&f.alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_during_summarize_is_internal() {
        let f = fixture("some extracted text").await;
        let uploaded = f.documents.upload(&f.alice, "a.pdf", b"%PDF").await.unwrap();
        f.db.fail_writes();

        let result = f.documents.summarize(&f.alice, uploaded.document_id).await;

        assert!(matches!(result, Err(ServiceError::Internal(msg)) if msg.contains("database unavailable")));
        assert_eq!(f.summarizer.calls.load(Ordering::SeqCst), 1);
        assert!(f
            .documents
            .list_summaries(&f.alice, uploaded.document_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_slow_summarizer_times_out() {
        let db = Arc::new(InMemoryDatabase::default());
        let documents = DocumentService::new(
            db.clone(),
            Arc::new(StaticExtractor::returning("text")),
            Arc::new(StaticSummarizer::returning("late").with_delay(Duration::from_millis(200))),
            Duration::from_millis(20),
        );
        let alice = Identity::from(&db.create_user("A", "a@x.com", "hash").await.unwrap());
        let uploaded = documents.upload(&alice, "a.pdf", b"%PDF").await.unwrap();

        let result = documents.summarize(&alice, uploaded.document_id).await;

        assert!(matches!(result, Err(ServiceError::Internal(msg)) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn test_list_documents_is_scoped_to_caller() {
        let f = fixture("text").await;
        f.documents.upload(&f.alice, "a1.pdf", b"%PDF").await.unwrap();
        f.documents.upload(&f.alice, "a2.pdf", b"%PDF").await.unwrap();
        f.documents.upload(&f.bob, "b1.pdf", b"%PDF").await.unwrap();

        let titles: Vec<String> = f
            .documents
            .list_documents(&f.alice)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.title)
            .collect();

        assert_eq!(titles, vec!["a1.pdf".to_string(), "a2.pdf".to_string()]);
    }
}
