//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use insightlearn_core::{AccountService, AuthorizationGate, DocumentService};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub accounts: AccountService,
    pub documents: DocumentService,
    pub gate: AuthorizationGate,
}
