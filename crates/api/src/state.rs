use std::sync::Arc;

use crate::config::ServerConfig;
use crate::shortener::{self, LinkShortener};
use crate::storage::MediaStorage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: hypeblog_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Uploaded file storage under `MEDIA_ROOT`.
    pub storage: Arc<MediaStorage>,
    /// Link shortener used by the download redirects.
    pub shortener: Arc<dyn LinkShortener>,
}

impl AppState {
    /// Build state from a pool and configuration, wiring storage and the
    /// shortener from the config.
    pub fn new(pool: hypeblog_db::DbPool, config: ServerConfig) -> Self {
        let storage = Arc::new(MediaStorage::new(
            config.media_root.clone(),
            config.media_url.clone(),
        ));
        let shortener = shortener::from_config(&config.shortener);
        Self {
            pool,
            config: Arc::new(config),
            storage,
            shortener,
        }
    }
}
