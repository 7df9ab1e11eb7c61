use std::sync::Arc;

use guardian_agents::AgentRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and everything else sits
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: guardian_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The four agents, already initialized.
    pub agents: Arc<AgentRegistry>,
}
