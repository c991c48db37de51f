//! Inventory repository contract shared by every storage backend.
//!
//! # Responsibility
//! - Define CRUD, paginated list and aggregation operations for razors,
//!   blades and usage records.
//! - Define the repository error taxonomy.
//!
//! # Invariants
//! - Write paths call `validate()` before any mutation.
//! - Missing rows surface as `RepoError::NotFound`, never as `Ok(None)`.
//! - Usage-record writes never store a reference to a missing razor or blade.
//! - Backends that do not support an operation return `RepoError::Unsupported`
//!   instead of silently differing.

use crate::db::DbError;
use crate::model::blade::Blade;
use crate::model::page::ListQuery;
use crate::model::razor::Razor;
use crate::model::usage::UsageRecord;
use crate::model::{EntityId, EntityKind, ValidationError};
use crate::stats::UsageStatistics;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage backend flavour behind the repository contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// SQLite-backed store.
    Durable,
    /// In-process, lock-guarded store used when SQLite is unavailable.
    Fallback,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Durable => "durable",
            Self::Fallback => "fallback",
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from inventory persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Entity failed field-level validation.
    Validation(ValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// No entity with this ID exists.
    NotFound { entity: EntityKind, id: EntityId },
    /// A usage record names a razor or blade that does not exist.
    DanglingReference { entity: EntityKind, id: EntityId },
    /// The active backend does not implement this operation.
    Unsupported {
        backend: BackendKind,
        operation: &'static str,
    },
    /// Backend state cannot be reached (e.g. poisoned lock).
    Unavailable(String),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::DanglingReference { entity, id } => {
                write!(f, "referenced {entity} does not exist: {id}")
            }
            Self::Unsupported { backend, operation } => write!(
                f,
                "operation `{operation}` is not available on the {backend} backend"
            ),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "inventory repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "inventory repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "inventory repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One slice of a collection plus the full collection size.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Repository interface for inventory storage.
///
/// Both backends must produce identical externally observable results for
/// every operation they support.
pub trait InventoryRepository {
    fn backend_kind(&self) -> BackendKind;

    /// Stores a razor draft and returns it with its assigned ID and timestamps.
    fn create_razor(&self, razor: &Razor) -> RepoResult<Razor>;
    fn get_razor(&self, id: EntityId) -> RepoResult<Razor>;
    /// Lists razors in ID order.
    fn list_razors(&self, query: ListQuery) -> RepoResult<Listing<Razor>>;
    /// Replaces a stored razor, re-stamping `updated_at`.
    fn update_razor(&self, razor: &Razor) -> RepoResult<Razor>;
    fn delete_razor(&self, id: EntityId) -> RepoResult<()>;

    fn create_blade(&self, blade: &Blade) -> RepoResult<Blade>;
    fn get_blade(&self, id: EntityId) -> RepoResult<Blade>;
    fn list_blades(&self, query: ListQuery) -> RepoResult<Listing<Blade>>;
    fn update_blade(&self, blade: &Blade) -> RepoResult<Blade>;
    fn delete_blade(&self, id: EntityId) -> RepoResult<()>;

    /// Stores a usage record.
    ///
    /// The razor and blade references are checked under the same lock as the
    /// write; a missing one yields `DanglingReference` (razor checked first).
    fn create_usage_record(&self, record: &UsageRecord) -> RepoResult<UsageRecord>;
    /// Gets one usage record with razor/blade snapshots resolved.
    fn get_usage_record(&self, id: EntityId) -> RepoResult<UsageRecord>;
    /// Lists usage records most-recent first, with snapshots resolved.
    fn list_usage_records(&self, query: ListQuery) -> RepoResult<Listing<UsageRecord>>;
    /// Replaces a stored usage record, checking references like create.
    fn update_usage_record(&self, record: &UsageRecord) -> RepoResult<UsageRecord>;
    fn delete_usage_record(&self, id: EntityId) -> RepoResult<()>;

    fn usage_statistics(&self) -> RepoResult<UsageStatistics>;
    /// Returns at most `limit` usage records, most-recent first.
    fn recent_usage_records(&self, limit: u32) -> RepoResult<Vec<UsageRecord>>;
}

/// Millisecond wall clock that never steps backwards.
#[derive(Debug, Default)]
pub(crate) struct StampClock {
    last_ms: i64,
}

impl StampClock {
    /// Clock that never stamps below `last_ms`, e.g. the newest persisted stamp.
    pub(crate) fn resuming_from(last_ms: i64) -> Self {
        Self { last_ms }
    }

    pub(crate) fn now(&mut self) -> DateTime<Utc> {
        self.last_ms = self.last_ms.max(Utc::now().timestamp_millis());
        DateTime::from_timestamp_millis(self.last_ms).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{RepoError, StampClock};
    use crate::model::EntityKind;

    #[test]
    fn stamp_clock_is_non_decreasing() {
        let mut clock = StampClock::default();
        let mut previous = clock.now();
        for _ in 0..100 {
            let next = clock.now();
            assert!(next >= previous);
            previous = next;
        }
    }

    #[test]
    fn resumed_clock_never_stamps_below_its_floor() {
        let floor = chrono::Utc::now().timestamp_millis() + 86_400_000;
        let mut clock = StampClock::resuming_from(floor);
        assert_eq!(clock.now().timestamp_millis(), floor);
    }

    #[test]
    fn not_found_message_names_entity() {
        let err = RepoError::NotFound {
            entity: EntityKind::UsageRecord,
            id: 42,
        };
        assert_eq!(err.to_string(), "usage record not found: 42");
    }
}
