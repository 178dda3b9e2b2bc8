//! Server state management.

use std::sync::Arc;

use chronicle_core::{
    AdminSurface, ChangelogStore, ChronicleConfig, ChronicleResult, PublicSurface,
    SqliteChangelogStore,
};

use crate::error::{ApiError, ApiResult};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub public: PublicSurface,
    pub admin: AdminSurface,
    pub store: Arc<dyn ChangelogStore>,
    pub config: Arc<ChronicleConfig>,
}

impl AppState {
    /// Create state over an existing store.
    pub fn new(store: Arc<dyn ChangelogStore>, config: ChronicleConfig) -> Self {
        Self {
            public: PublicSurface::new(store.clone()).with_page_size(config.page_size),
            admin: AdminSurface::new(store.clone()).with_page_size(config.page_size),
            store,
            config: Arc::new(config),
        }
    }

    /// Open the SQLite store named by the configuration.
    pub fn open(config: ChronicleConfig) -> ChronicleResult<Self> {
        let store = SqliteChangelogStore::new(&config.database_path)?;
        Ok(Self::new(Arc::new(store), config))
    }

    /// Run blocking store work off the async executor.
    pub async fn blocking<F, T, E>(&self, f: F) -> ApiResult<T>
    where
        F: FnOnce(&AppState) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<ApiError> + Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || f(&state))
            .await
            .map_err(|e| ApiError::internal(format!("Store task failed: {}", e)))?
            .map_err(Into::into)
    }
}
