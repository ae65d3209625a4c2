use std::sync::Arc;

use medlearn_validator::ValidatorClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: medlearn_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Client for the external validation engine.
    pub validator: Arc<ValidatorClient>,
}
