//! Runtime selection between the durable and fallback stores.

use crate::db::{open_db, open_db_in_memory};
use crate::model::blade::Blade;
use crate::model::page::ListQuery;
use crate::model::razor::Razor;
use crate::model::usage::UsageRecord;
use crate::model::EntityId;
use crate::repo::inventory_repo::{
    BackendKind, InventoryRepository, Listing, RepoError, RepoResult,
};
use crate::repo::memory_repo::MemoryInventoryRepository;
use crate::repo::sqlite_repo::SqliteInventoryRepository;
use crate::stats::UsageStatistics;
use log::{info, warn};
use std::path::Path;

/// Backend chosen once at process start.
pub enum StoreBackend {
    Durable(SqliteInventoryRepository),
    Fallback(MemoryInventoryRepository),
}

impl StoreBackend {
    /// Opens the SQLite store at `path` (`None` = in-memory SQLite).
    ///
    /// Any open, migration or readiness failure selects the seeded fallback
    /// store instead; the failure is logged and not returned.
    pub fn open_or_fallback(path: Option<&Path>) -> Self {
        let opened = match path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        };

        let durable = opened
            .map_err(RepoError::from)
            .and_then(SqliteInventoryRepository::try_new);

        match durable {
            Ok(repo) => {
                info!("event=store_select module=repo status=ok backend=durable");
                Self::Durable(repo)
            }
            Err(err) => {
                warn!(
                    "event=store_select module=repo status=fallback backend=fallback error={}",
                    err
                );
                Self::Fallback(MemoryInventoryRepository::new())
            }
        }
    }

    fn repo(&self) -> &dyn InventoryRepository {
        match self {
            Self::Durable(repo) => repo,
            Self::Fallback(repo) => repo,
        }
    }
}

impl InventoryRepository for StoreBackend {
    fn backend_kind(&self) -> BackendKind {
        self.repo().backend_kind()
    }

    fn create_razor(&self, razor: &Razor) -> RepoResult<Razor> {
        self.repo().create_razor(razor)
    }

    fn get_razor(&self, id: EntityId) -> RepoResult<Razor> {
        self.repo().get_razor(id)
    }

    fn list_razors(&self, query: ListQuery) -> RepoResult<Listing<Razor>> {
        self.repo().list_razors(query)
    }

    fn update_razor(&self, razor: &Razor) -> RepoResult<Razor> {
        self.repo().update_razor(razor)
    }

    fn delete_razor(&self, id: EntityId) -> RepoResult<()> {
        self.repo().delete_razor(id)
    }

    fn create_blade(&self, blade: &Blade) -> RepoResult<Blade> {
        self.repo().create_blade(blade)
    }

    fn get_blade(&self, id: EntityId) -> RepoResult<Blade> {
        self.repo().get_blade(id)
    }

    fn list_blades(&self, query: ListQuery) -> RepoResult<Listing<Blade>> {
        self.repo().list_blades(query)
    }

    fn update_blade(&self, blade: &Blade) -> RepoResult<Blade> {
        self.repo().update_blade(blade)
    }

    fn delete_blade(&self, id: EntityId) -> RepoResult<()> {
        self.repo().delete_blade(id)
    }

    fn create_usage_record(&self, record: &UsageRecord) -> RepoResult<UsageRecord> {
        self.repo().create_usage_record(record)
    }

    fn get_usage_record(&self, id: EntityId) -> RepoResult<UsageRecord> {
        self.repo().get_usage_record(id)
    }

    fn list_usage_records(&self, query: ListQuery) -> RepoResult<Listing<UsageRecord>> {
        self.repo().list_usage_records(query)
    }

    fn update_usage_record(&self, record: &UsageRecord) -> RepoResult<UsageRecord> {
        self.repo().update_usage_record(record)
    }

    fn delete_usage_record(&self, id: EntityId) -> RepoResult<()> {
        self.repo().delete_usage_record(id)
    }

    fn usage_statistics(&self) -> RepoResult<UsageStatistics> {
        self.repo().usage_statistics()
    }

    fn recent_usage_records(&self, limit: u32) -> RepoResult<Vec<UsageRecord>> {
        self.repo().recent_usage_records(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::StoreBackend;
    use crate::repo::inventory_repo::{BackendKind, InventoryRepository};

    #[test]
    fn in_memory_sqlite_selects_durable_backend() {
        let store = StoreBackend::open_or_fallback(None);
        assert_eq!(store.backend_kind(), BackendKind::Durable);
        assert_eq!(store.usage_statistics().unwrap().razor_count, 0);
    }

    #[test]
    fn unopenable_path_selects_seeded_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let store = StoreBackend::open_or_fallback(Some(&blocker.join("razorlog.db")));
        assert_eq!(store.backend_kind(), BackendKind::Fallback);
        assert_eq!(store.usage_statistics().unwrap().razor_count, 2);
    }
}
