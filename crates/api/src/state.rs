use std::sync::Arc;

use chimaek_db::PgBackend;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and backend are reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: chimaek_db::DbPool,
    /// Server configuration (JWT secret, timeouts).
    pub config: Arc<ServerConfig>,
    /// Cart and order persistence handed to every `CartStore`.
    pub backend: Arc<PgBackend>,
}

impl AppState {
    pub fn new(pool: chimaek_db::DbPool, config: ServerConfig) -> Self {
        Self {
            backend: Arc::new(PgBackend::new(pool.clone())),
            pool,
            config: Arc::new(config),
        }
    }
}
