//! Shared request state.

use pairscope_analytics::{AnalyticsReport, AnalyticsRequest};
use pairscope_store::{TickStore, analyze_source};
use std::sync::Arc;

use crate::ApiError;

/// Handle to the tick store shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn TickStore>,
    snapshot_limit: usize,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("snapshot_limit", &self.snapshot_limit)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Creates state over `store`, reading at most `snapshot_limit` ticks per request.
    pub fn new(store: Arc<dyn TickStore>, snapshot_limit: usize) -> Self {
        Self {
            store,
            snapshot_limit,
        }
    }

    /// Returns the store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn TickStore> {
        &self.store
    }

    /// Returns the snapshot size.
    #[must_use]
    pub const fn snapshot_limit(&self) -> usize {
        self.snapshot_limit
    }

    /// Lists symbols on the blocking pool.
    pub(crate) async fn symbols(&self) -> Result<Vec<String>, ApiError> {
        let store = Arc::clone(&self.store);
        let limit = self.snapshot_limit;
        blocking(move || store.symbols(limit)).await
    }

    /// Runs the pipeline on the blocking pool.
    pub(crate) async fn analyze(&self, request: AnalyticsRequest) -> Result<AnalyticsReport, ApiError> {
        let store = Arc::clone(&self.store);
        let limit = self.snapshot_limit;
        blocking(move || analyze_source(store.as_ref(), limit, &request)).await
    }
}

async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> pairscope_types::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(format!("worker failed: {e}")))?
        .map_err(ApiError::from)
}
