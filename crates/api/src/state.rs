use std::sync::Arc;

use copypanda_events::RunRegistry;
use copypanda_llm::TextGenerator;

use crate::config::ServerConfig;
use crate::engine::RunLauncher;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: copypanda_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live run status channels.
    pub registry: Arc<RunRegistry>,
    /// Spawns and tracks background generation runs.
    pub launcher: Arc<RunLauncher>,
    /// Text generator used outside runs (section suggestions).
    pub generator: Arc<dyn TextGenerator>,
}
