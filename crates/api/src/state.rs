use std::sync::Arc;

use bedwatch_core::backend::Backend;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Storage backend (PostgreSQL or in-memory).
    pub backend: Arc<dyn Backend>,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
}
