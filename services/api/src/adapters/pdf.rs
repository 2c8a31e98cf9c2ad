//! services/api/src/adapters/pdf.rs
//!
//! Implements the `TextExtractionService` port with the `pdf-extract` crate.

use async_trait::async_trait;
use insightlearn_core::ports::{PortError, PortResult, TextExtractionService};
use std::path::Path;

/// Reads the text layer of a PDF on disk.
#[derive(Clone, Default)]
pub struct PdfTextAdapter;

impl PdfTextAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractionService for PdfTextAdapter {
    async fn extract_text(&self, path: &Path) -> PortResult<String> {
        let path = path.to_path_buf();
        // Parsing is CPU-bound and synchronous; keep it off the async workers.
        tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
            .await
            .map_err(|e| PortError::Unexpected(format!("PDF extraction task failed: {}", e)))?
            .map(|text| text.trim().to_string())
            .map_err(|e| PortError::Unexpected(format!("Failed to extract PDF text: {}", e)))
    }
}
