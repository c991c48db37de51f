//! Inventory domain model for razors, blades and usage events.
//!
//! # Responsibility
//! - Define the canonical entity records and their request shapes.
//! - Own field-level validation shared by every storage backend.
//!
//! # Invariants
//! - Every entity is identified by a store-assigned `EntityId` that is never reused.
//! - Timestamps carry millisecond precision so both backends return identical values.
//! - Serialized keys are snake_case and stable for external clients.

pub mod blade;
pub mod page;
pub mod razor;
pub mod usage;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned numeric identity shared by all entity types.
pub type EntityId = i64;

/// Entity type tag used in error reporting and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Razor,
    Blade,
    UsageRecord,
}

impl EntityKind {
    /// Stable lowercase label, e.g. `usage_record`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Razor => "razor",
            Self::Blade => "blade",
            Self::UsageRecord => "usage_record",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Razor => write!(f, "razor"),
            Self::Blade => write!(f, "blade"),
            Self::UsageRecord => write!(f, "usage record"),
        }
    }
}

/// Field-level validation failure raised before any storage mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty after trim.
    BlankField {
        entity: EntityKind,
        field: &'static str,
    },
    /// A monetary field is negative or not a finite number.
    InvalidAmount {
        entity: EntityKind,
        field: &'static str,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { entity, field } => {
                write!(f, "{entity} `{field}` must not be blank")
            }
            Self::InvalidAmount { entity, field } => {
                write!(f, "{entity} `{field}` must be a non-negative number")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(
    entity: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField { entity, field });
    }
    Ok(())
}

pub(crate) fn require_amount(
    entity: EntityKind,
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    match value {
        Some(amount) if !amount.is_finite() || amount < 0.0 => {
            Err(ValidationError::InvalidAmount { entity, field })
        }
        _ => Ok(()),
    }
}

/// Drops sub-millisecond precision from a timestamp.
///
/// Storage keeps epoch milliseconds, so every value handed to a backend is
/// normalized first to keep create results and read-backs identical.
pub fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or(value)
}
