//! Core domain logic for the razor and blade inventory tracker.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, LogSettings, LoggingError};
pub use model::blade::{Blade, CreateBladeRequest, UpdateBladeRequest};
pub use model::page::{Page, PageRequest, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use model::razor::{CreateRazorRequest, Razor, UpdateRazorRequest};
pub use model::usage::{CreateUsageRecordRequest, UpdateUsageRecordRequest, UsageRecord};
pub use model::{EntityId, EntityKind, ValidationError};
pub use repo::inventory_repo::{BackendKind, InventoryRepository, RepoError, RepoResult};
pub use repo::memory_repo::MemoryInventoryRepository;
pub use repo::sqlite_repo::SqliteInventoryRepository;
pub use repo::store_backend::StoreBackend;
pub use service::inventory_service::{ErrorKind, InventoryService, ServiceError, ServiceResult};
pub use stats::{DashboardData, UsageStatistics, DASHBOARD_RECENT_LIMIT};

/// Core crate version, reported by the server health check.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
