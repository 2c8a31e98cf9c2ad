//! services/api/src/web/documents.rs
//!
//! Upload and listing of the caller's PDF documents.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use insightlearn_core::{DocumentPreview, Identity, ServiceError};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::web::{
    response::{ErrorBody, HttpError},
    state::AppState,
};

/// Name of the multipart field carrying the PDF.
pub const FILE_FIELD: &str = "file";

//=========================================================================================
// Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub document_id: i64,
    pub title: String,
    pub preview: String,
}

#[derive(Serialize, ToSchema)]
pub struct DocumentItem {
    pub document_id: i64,
    pub title: String,
    pub preview: String,
}

impl From<DocumentPreview> for DocumentItem {
    fn from(doc: DocumentPreview) -> Self {
        Self {
            document_id: doc.document_id,
            title: doc.title,
            preview: doc.preview,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /documents/upload - Upload a PDF and store its extracted text.
///
/// Accepts a multipart/form-data request with a `file` part.
#[utoipa::path(
    post,
    path = "/documents/upload",
    request_body(content_type = "multipart/form-data", description = "The PDF to upload."),
    responses(
        (status = 200, description = "Document uploaded successfully", body = UploadResponse),
        (status = 400, description = "Only PDF files are allowed", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody),
        (status = 413, description = "Upload exceeds the size limit", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "documents"
)]
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpError> {
    let (file_name, bytes) = read_file_field(multipart).await?;

    let uploaded = state.documents.upload(&identity, &file_name, &bytes).await?;

    Ok(Json(UploadResponse {
        message: "Document uploaded successfully".to_string(),
        document_id: uploaded.document_id,
        title: uploaded.title,
        preview: uploaded.preview,
    }))
}

/// GET /documents - List the caller's documents.
#[utoipa::path(
    get,
    path = "/documents",
    responses(
        (status = 200, description = "The caller's documents", body = [DocumentItem]),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "documents"
)]
pub async fn list_documents_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, HttpError> {
    let documents = state.documents.list_documents(&identity).await?;
    let items: Vec<DocumentItem> = documents.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(items)))
}

/// Pulls the uploaded file out of the form. Parts without a file name, or named
/// anything other than `file`, are skipped.
async fn read_file_field(mut multipart: Multipart) -> Result<(String, Vec<u8>), HttpError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_failure)? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if field.name().is_some_and(|name| name != FILE_FIELD) {
            continue;
        }
        let data = field.bytes().await.map_err(multipart_failure)?;
        return Ok((file_name, data.to_vec()));
    }

    Err(ServiceError::InvalidInput("Multipart form must include a file".to_string()).into())
}

/// An oversized body keeps its 413; any other read failure is internal.
fn multipart_failure(e: MultipartError) -> HttpError {
    let status = e.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        HttpError::Rejected(status, e.body_text())
    } else {
        ServiceError::internal(format!("Failed to read multipart data: {}", e.body_text())).into()
    }
}
