//! Usage record entity and its request shapes.
//!
//! # Invariants
//! - `razor_id` and `blade_id` must reference existing entities at write time.
//! - `blade_usage_count` is at least 1 once stored.
//! - `razor`/`blade` snapshots are read-only copies resolved on read; they are
//!   `None` when the referenced entity has since been deleted.

use super::blade::Blade;
use super::razor::Razor;
use super::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default blade usage count applied when the caller sends zero.
pub const DEFAULT_BLADE_USAGE_COUNT: u32 = 1;

/// A dated shave linking one razor and one blade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Store-assigned ID. `0` marks an unsaved draft.
    pub id: EntityId,
    pub usage_time: DateTime<Utc>,
    pub razor_id: EntityId,
    pub blade_id: EntityId,
    pub blade_usage_count: u32,
    /// Intended range is 1..=5; not enforced.
    pub rating: Option<i32>,
    pub experience_text: String,
    pub need_blade_change: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub razor: Option<Razor>,
    pub blade: Option<Blade>,
}

impl UsageRecord {
    /// Creates an unsaved usage record draft.
    pub fn new(usage_time: DateTime<Utc>, razor_id: EntityId, blade_id: EntityId) -> Self {
        Self {
            id: 0,
            usage_time,
            razor_id,
            blade_id,
            blade_usage_count: DEFAULT_BLADE_USAGE_COUNT,
            rating: None,
            experience_text: String::new(),
            need_blade_change: false,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
            razor: None,
            blade: None,
        }
    }
}

/// Maps a caller-supplied count to the stored count (zero means default).
pub fn effective_blade_usage_count(requested: u32) -> u32 {
    if requested == 0 {
        DEFAULT_BLADE_USAGE_COUNT
    } else {
        requested
    }
}

/// Payload for recording a shave.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateUsageRecordRequest {
    pub usage_time: DateTime<Utc>,
    pub razor_id: EntityId,
    pub blade_id: EntityId,
    #[serde(default)]
    pub blade_usage_count: u32,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub experience_text: String,
    #[serde(default)]
    pub need_blade_change: bool,
}

impl CreateUsageRecordRequest {
    /// Converts the payload into an unsaved draft, applying the count default.
    pub fn into_draft(self) -> UsageRecord {
        let mut record = UsageRecord::new(self.usage_time, self.razor_id, self.blade_id);
        record.blade_usage_count = effective_blade_usage_count(self.blade_usage_count);
        record.rating = self.rating;
        record.experience_text = self.experience_text;
        record.need_blade_change = self.need_blade_change;
        record
    }
}

/// Payload for updating a usage record.
///
/// Absent `usage_time`, `razor_id`, `blade_id` and `rating` keep the stored
/// value; the remaining fields are always overwritten.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpdateUsageRecordRequest {
    pub usage_time: Option<DateTime<Utc>>,
    pub razor_id: Option<EntityId>,
    pub blade_id: Option<EntityId>,
    pub blade_usage_count: u32,
    pub rating: Option<i32>,
    pub experience_text: String,
    pub need_blade_change: bool,
}

#[cfg(test)]
mod tests {
    use super::{effective_blade_usage_count, CreateUsageRecordRequest};

    #[test]
    fn zero_usage_count_defaults_to_one() {
        assert_eq!(effective_blade_usage_count(0), 1);
        assert_eq!(effective_blade_usage_count(7), 7);
    }

    #[test]
    fn create_request_uses_snake_case_keys_and_defaults() {
        let request: CreateUsageRecordRequest = serde_json::from_str(
            r#"{"usage_time":"2024-05-01T06:30:00Z","razor_id":1,"blade_id":2}"#,
        )
        .unwrap();
        let draft = request.into_draft();
        assert_eq!(draft.razor_id, 1);
        assert_eq!(draft.blade_id, 2);
        assert_eq!(draft.blade_usage_count, 1);
        assert_eq!(draft.rating, None);
        assert!(!draft.need_blade_change);
    }

    #[test]
    fn create_request_rejects_missing_usage_time() {
        let result: Result<CreateUsageRecordRequest, _> =
            serde_json::from_str(r#"{"razor_id":1,"blade_id":2}"#);
        assert!(result.is_err());
    }
}
