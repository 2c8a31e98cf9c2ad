pub mod auth;
pub mod documents;
pub mod middleware;
pub mod response;
pub mod rest;
pub mod state;
pub mod summaries;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use middleware::require_auth;
pub use state::AppState;

/// Builds the API router: public auth routes plus the bearer-protected
/// document and summary routes.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(rest::root_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/documents", get(documents::list_documents_handler))
        .route("/documents/upload", post(documents::upload_handler))
        .route(
            "/documents/{doc_id}/summaries",
            get(summaries::list_summaries_handler),
        )
        .route("/summarize/{doc_id}", post(summaries::summarize_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(app_state.config.max_upload_bytes))
        .with_state(app_state)
}
