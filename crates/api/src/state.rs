use std::sync::Arc;

use abinject_db::store::ScriptStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Script persistence (PostgreSQL in production, in-memory for tests).
    pub store: Arc<dyn ScriptStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
