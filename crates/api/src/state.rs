use std::sync::Arc;

use crate::auth::session::SessionProvider;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: luminar_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Resolves the caller's session from request headers.
    pub sessions: Arc<dyn SessionProvider>,
}
