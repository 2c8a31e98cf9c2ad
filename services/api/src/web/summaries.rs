//! services/api/src/web/summaries.rs
//!
//! Summarization of the caller's documents.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use insightlearn_core::{Identity, Summary};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::web::{
    response::{ErrorBody, HttpError},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct SummaryResponse {
    pub message: String,
    pub summary_id: i64,
    pub document_id: i64,
    pub summary: String,
}

#[derive(Serialize, ToSchema)]
pub struct SummaryItem {
    pub summary_id: i64,
    pub document_id: i64,
    pub summary: String,
}

impl From<Summary> for SummaryItem {
    fn from(summary: Summary) -> Self {
        Self {
            summary_id: summary.id,
            document_id: summary.document_id,
            summary: summary.summary,
        }
    }
}

/// POST /summarize/{doc_id} - Generate and store a summary of one of the caller's documents.
#[utoipa::path(
    post,
    path = "/summarize/{doc_id}",
    params(("doc_id" = i64, Path, description = "Id of the document to summarize.")),
    responses(
        (status = 200, description = "Summary generated successfully", body = SummaryResponse),
        (status = 400, description = "No content found in document", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody),
        (status = 404, description = "Document not found or not yours", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "Summarizer"
)]
pub async fn summarize_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(doc_id): Path<i64>,
) -> Result<Json<SummaryResponse>, HttpError> {
    let summary = state.documents.summarize(&identity, doc_id).await?;

    Ok(Json(SummaryResponse {
        message: "Summary generated successfully".to_string(),
        summary_id: summary.id,
        document_id: summary.document_id,
        summary: summary.summary,
    }))
}

/// GET /documents/{doc_id}/summaries - All summaries generated for one of the caller's documents.
#[utoipa::path(
    get,
    path = "/documents/{doc_id}/summaries",
    params(("doc_id" = i64, Path, description = "Id of the document.")),
    responses(
        (status = 200, description = "Summaries, oldest first", body = [SummaryItem]),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody),
        (status = 404, description = "Document not found or not yours", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "Summarizer"
)]
pub async fn list_summaries_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(doc_id): Path<i64>,
) -> Result<Json<Vec<SummaryItem>>, HttpError> {
    let summaries = state.documents.list_summaries(&identity, doc_id).await?;
    Ok(Json(summaries.into_iter().map(Into::into).collect()))
}
