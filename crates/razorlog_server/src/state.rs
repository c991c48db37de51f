//! Shared application state.

use crate::error::AppError;
use razorlog_core::{BackendKind, InventoryService, ServiceResult, StoreBackend};
use std::sync::Arc;

/// Handle to the inventory service, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    service: Arc<InventoryService<StoreBackend>>,
}

impl AppState {
    pub fn new(backend: StoreBackend) -> Self {
        Self {
            service: Arc::new(InventoryService::new(backend)),
        }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.service.backend_kind()
    }

    /// Runs a core call on the blocking pool; SQLite access is synchronous.
    pub async fn run<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&InventoryService<StoreBackend>) -> ServiceResult<T> + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        tokio::task::spawn_blocking(move || op(service.as_ref()))
            .await
            .map_err(|err| AppError::Internal(format!("blocking task failed: {err}")))?
            .map_err(AppError::from)
    }
}
