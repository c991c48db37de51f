//! In-process inventory repository (fallback backend).
//!
//! # Responsibility
//! - Serve the inventory contract when the durable store cannot be opened.
//! - Seed a small demo dataset so a fresh process has something to show.
//!
//! # Invariants
//! - One `RwLock` guards all collections and ID counters; readers never see a
//!   half-applied write.
//! - IDs start at 1 and are never reused while the process runs.
//! - Stored usage records carry no snapshots; they are resolved on every read.
//! - Razor update/delete and usage-record update/delete are not provided and
//!   return `RepoError::Unsupported`.

use crate::model::blade::Blade;
use crate::model::page::ListQuery;
use crate::model::razor::Razor;
use crate::model::usage::UsageRecord;
use crate::model::{truncate_to_millis, EntityId, EntityKind};
use crate::repo::inventory_repo::{
    BackendKind, InventoryRepository, Listing, RepoError, RepoResult, StampClock,
};
use crate::stats::{average_rating, order_by_recency, page_window, UsageStatistics};
use chrono::{Duration, Utc};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Lock-guarded in-memory inventory store.
pub struct MemoryInventoryRepository {
    state: RwLock<MemoryState>,
}

struct MemoryState {
    razors: Vec<Razor>,
    blades: Vec<Blade>,
    usage_records: Vec<UsageRecord>,
    next_razor_id: EntityId,
    next_blade_id: EntityId,
    next_usage_record_id: EntityId,
    clock: StampClock,
}

impl MemoryInventoryRepository {
    /// Creates a store pre-populated with two razors, two blade packs and
    /// one rated usage record from the previous day.
    pub fn new() -> Self {
        let mut state = MemoryState::empty();
        state.seed_demo_data();
        Self {
            state: RwLock::new(state),
        }
    }

    /// Creates a store with no data.
    pub fn empty() -> Self {
        Self {
            state: RwLock::new(MemoryState::empty()),
        }
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| RepoError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| RepoError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl Default for MemoryInventoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryRepository for MemoryInventoryRepository {
    fn backend_kind(&self) -> BackendKind {
        BackendKind::Fallback
    }

    fn create_razor(&self, razor: &Razor) -> RepoResult<Razor> {
        razor.validate()?;
        Ok(self.write()?.insert_razor(razor))
    }

    fn get_razor(&self, id: EntityId) -> RepoResult<Razor> {
        self.read()?.razor(id)
    }

    fn list_razors(&self, query: ListQuery) -> RepoResult<Listing<Razor>> {
        let state = self.read()?;
        let window = page_window(state.razors.len(), query.offset, query.limit);
        Ok(Listing {
            items: state.razors[window].to_vec(),
            total: state.razors.len() as u64,
        })
    }

    fn update_razor(&self, _razor: &Razor) -> RepoResult<Razor> {
        Err(unsupported("update_razor"))
    }

    fn delete_razor(&self, _id: EntityId) -> RepoResult<()> {
        Err(unsupported("delete_razor"))
    }

    fn create_blade(&self, blade: &Blade) -> RepoResult<Blade> {
        blade.validate()?;
        Ok(self.write()?.insert_blade(blade))
    }

    fn get_blade(&self, id: EntityId) -> RepoResult<Blade> {
        self.read()?.blade(id)
    }

    fn list_blades(&self, query: ListQuery) -> RepoResult<Listing<Blade>> {
        let state = self.read()?;
        let window = page_window(state.blades.len(), query.offset, query.limit);
        Ok(Listing {
            items: state.blades[window].to_vec(),
            total: state.blades.len() as u64,
        })
    }

    fn update_blade(&self, blade: &Blade) -> RepoResult<Blade> {
        blade.validate()?;

        let mut state = self.write()?;
        let now = state.clock.now();
        let stored = state
            .blades
            .iter_mut()
            .find(|stored| stored.id == blade.id)
            .ok_or(RepoError::NotFound {
                entity: EntityKind::Blade,
                id: blade.id,
            })?;

        let created_at = stored.created_at;
        *stored = Blade {
            purchase_date: blade.purchase_date.map(truncate_to_millis),
            created_at,
            updated_at: now,
            ..blade.clone()
        };
        Ok(stored.clone())
    }

    fn delete_blade(&self, id: EntityId) -> RepoResult<()> {
        let mut state = self.write()?;
        let index = state
            .blades
            .iter()
            .position(|blade| blade.id == id)
            .ok_or(RepoError::NotFound {
                entity: EntityKind::Blade,
                id,
            })?;
        state.blades.remove(index);
        Ok(())
    }

    fn create_usage_record(&self, record: &UsageRecord) -> RepoResult<UsageRecord> {
        let mut state = self.write()?;
        state.ensure_references(record)?;
        let stored = state.insert_usage_record(record);
        Ok(state.hydrate(stored))
    }

    fn get_usage_record(&self, id: EntityId) -> RepoResult<UsageRecord> {
        let state = self.read()?;
        let stored = state
            .usage_records
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or(RepoError::NotFound {
                entity: EntityKind::UsageRecord,
                id,
            })?;
        Ok(state.hydrate(stored))
    }

    fn list_usage_records(&self, query: ListQuery) -> RepoResult<Listing<UsageRecord>> {
        let state = self.read()?;
        let mut ordered = state.usage_records.clone();
        order_by_recency(&mut ordered);

        let window = page_window(ordered.len(), query.offset, query.limit);
        let items = ordered
            .drain(window)
            .map(|record| state.hydrate(record))
            .collect();
        Ok(Listing {
            items,
            total: state.usage_records.len() as u64,
        })
    }

    fn update_usage_record(&self, _record: &UsageRecord) -> RepoResult<UsageRecord> {
        Err(unsupported("update_usage_record"))
    }

    fn delete_usage_record(&self, _id: EntityId) -> RepoResult<()> {
        Err(unsupported("delete_usage_record"))
    }

    fn usage_statistics(&self) -> RepoResult<UsageStatistics> {
        let state = self.read()?;
        Ok(UsageStatistics {
            total_usage: state.usage_records.len() as u64,
            razor_count: state.razors.len() as u64,
            blade_count: state.blades.len() as u64,
            average_rating: average_rating(state.usage_records.iter().map(|record| record.rating)),
        })
    }

    fn recent_usage_records(&self, limit: u32) -> RepoResult<Vec<UsageRecord>> {
        let state = self.read()?;
        let mut ordered = state.usage_records.clone();
        order_by_recency(&mut ordered);

        let window = page_window(ordered.len(), 0, limit);
        Ok(ordered
            .drain(window)
            .map(|record| state.hydrate(record))
            .collect())
    }
}

impl MemoryState {
    fn empty() -> Self {
        Self {
            razors: Vec::new(),
            blades: Vec::new(),
            usage_records: Vec::new(),
            next_razor_id: 1,
            next_blade_id: 1,
            next_usage_record_id: 1,
            clock: StampClock::default(),
        }
    }

    fn seed_demo_data(&mut self) {
        let now = Utc::now();

        let mut fusion = Razor::new("Gillette", "Fusion 5");
        fusion.purchase_date = Some(now);
        fusion.price = Some(89.9);
        fusion.notes = "Classic five-blade razor".to_string();
        let fusion = self.insert_razor(&fusion);

        let mut oneblade = Razor::new("Philips", "OneBlade Pro");
        oneblade.purchase_date = Some(now);
        oneblade.price = Some(299.0);
        oneblade.notes = "Electric shaver, wet and dry".to_string();
        let oneblade = self.insert_razor(&oneblade);

        let mut cartridges = Blade::new("Gillette", "Fusion 5 Cartridge");
        cartridges.compatible_razors = format!("[{}]", fusion.id);
        cartridges.unit_price = Some(15.9);
        cartridges.total_quantity = 10;
        cartridges.remaining_quantity = 8;
        cartridges.notes = "Genuine replacement cartridges".to_string();
        let cartridges = self.insert_blade(&cartridges);

        let mut replacement = Blade::new("Philips", "OneBlade Replacement Blade");
        replacement.compatible_razors = format!("[{}]", oneblade.id);
        replacement.unit_price = Some(25.0);
        replacement.total_quantity = 5;
        replacement.remaining_quantity = 4;
        replacement.notes = "Blades for the OneBlade".to_string();
        self.insert_blade(&replacement);

        let mut shave = UsageRecord::new(now - Duration::days(1), fusion.id, cartridges.id);
        shave.blade_usage_count = 5;
        shave.rating = Some(4);
        shave.experience_text = "Clean shave, comfortable overall".to_string();
        self.insert_usage_record(&shave);
    }

    fn insert_razor(&mut self, draft: &Razor) -> Razor {
        let now = self.clock.now();
        let razor = Razor {
            id: self.next_razor_id,
            purchase_date: draft.purchase_date.map(truncate_to_millis),
            created_at: now,
            updated_at: now,
            ..draft.clone()
        };
        self.next_razor_id += 1;
        self.razors.push(razor.clone());
        razor
    }

    fn insert_blade(&mut self, draft: &Blade) -> Blade {
        let now = self.clock.now();
        let blade = Blade {
            id: self.next_blade_id,
            purchase_date: draft.purchase_date.map(truncate_to_millis),
            created_at: now,
            updated_at: now,
            ..draft.clone()
        };
        self.next_blade_id += 1;
        self.blades.push(blade.clone());
        blade
    }

    fn insert_usage_record(&mut self, draft: &UsageRecord) -> UsageRecord {
        let now = self.clock.now();
        let record = UsageRecord {
            id: self.next_usage_record_id,
            usage_time: truncate_to_millis(draft.usage_time),
            created_at: now,
            updated_at: now,
            razor: None,
            blade: None,
            ..draft.clone()
        };
        self.next_usage_record_id += 1;
        self.usage_records.push(record.clone());
        record
    }

    fn razor(&self, id: EntityId) -> RepoResult<Razor> {
        self.razors
            .iter()
            .find(|razor| razor.id == id)
            .cloned()
            .ok_or(RepoError::NotFound {
                entity: EntityKind::Razor,
                id,
            })
    }

    fn blade(&self, id: EntityId) -> RepoResult<Blade> {
        self.blades
            .iter()
            .find(|blade| blade.id == id)
            .cloned()
            .ok_or(RepoError::NotFound {
                entity: EntityKind::Blade,
                id,
            })
    }

    fn ensure_references(&self, record: &UsageRecord) -> RepoResult<()> {
        if !self.razors.iter().any(|razor| razor.id == record.razor_id) {
            return Err(RepoError::DanglingReference {
                entity: EntityKind::Razor,
                id: record.razor_id,
            });
        }
        if !self.blades.iter().any(|blade| blade.id == record.blade_id) {
            return Err(RepoError::DanglingReference {
                entity: EntityKind::Blade,
                id: record.blade_id,
            });
        }
        Ok(())
    }

    fn hydrate(&self, mut record: UsageRecord) -> UsageRecord {
        record.razor = self.razor(record.razor_id).ok();
        record.blade = self.blade(record.blade_id).ok();
        record
    }
}

fn unsupported(operation: &'static str) -> RepoError {
    RepoError::Unsupported {
        backend: BackendKind::Fallback,
        operation,
    }
}
