//! services/api/src/web/rest.rs
//!
//! The root endpoint and the master definition for the OpenAPI specification.

use axum::Json;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::web::{
    auth::{self, LoginRequest, MessageResponse, RegisterRequest, TokenResponse},
    documents::{self, DocumentItem, UploadResponse},
    response::ErrorBody,
    summaries::{self, SummaryItem, SummaryResponse},
};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        root_handler,
        auth::register_handler,
        auth::login_handler,
        documents::upload_handler,
        documents::list_documents_handler,
        summaries::summarize_handler,
        summaries::list_summaries_handler,
    ),
    components(
        schemas(
            RegisterRequest, LoginRequest, MessageResponse, TokenResponse,
            UploadResponse, DocumentItem, SummaryResponse, SummaryItem, ErrorBody
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "InsightLearn API", description = "Registration, PDF upload and LLM summaries.")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme referenced by the protected paths.
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET / - Liveness check.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "The backend is running", body = MessageResponse))
)]
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "InsightLearn Backend is running".to_string(),
    })
}
