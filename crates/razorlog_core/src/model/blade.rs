//! Blade entity and its request shapes.
//!
//! # Invariants
//! - `brand` and `model` are non-blank.
//! - `unit_price`, when present, is a finite non-negative amount.
//! - `remaining_quantity <= total_quantity` is expected but not enforced.
//! - `compatible_razors` is opaque text; razor IDs in it are never checked.

use super::{require_amount, require_text, EntityId, EntityKind, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A consumable cutting component with a quantity balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blade {
    /// Store-assigned ID. `0` marks an unsaved draft.
    pub id: EntityId,
    pub brand: String,
    pub model: String,
    /// Serialized list of compatible razor IDs, e.g. `[1,2]`.
    pub compatible_razors: String,
    pub purchase_date: Option<DateTime<Utc>>,
    pub unit_price: Option<f64>,
    pub total_quantity: u32,
    pub remaining_quantity: u32,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blade {
    /// Creates an unsaved blade draft with zero stock.
    pub fn new(brand: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: 0,
            brand: brand.into(),
            model: model.into(),
            compatible_razors: String::new(),
            purchase_date: None,
            unit_price: None,
            total_quantity: 0,
            remaining_quantity: 0,
            notes: String::new(),
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }

    /// Checks field-level invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::Blade, "brand", &self.brand)?;
        require_text(EntityKind::Blade, "model", &self.model)?;
        require_amount(EntityKind::Blade, "unit_price", self.unit_price)
    }
}

/// Payload for creating a blade.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreateBladeRequest {
    pub brand: String,
    pub model: String,
    pub compatible_razors: String,
    pub purchase_date: Option<DateTime<Utc>>,
    pub unit_price: Option<f64>,
    pub total_quantity: u32,
    pub remaining_quantity: u32,
    pub notes: String,
}

impl CreateBladeRequest {
    /// Converts the payload into an unsaved draft.
    pub fn into_draft(self) -> Blade {
        let mut blade = Blade::new(self.brand, self.model);
        blade.compatible_razors = self.compatible_razors;
        blade.purchase_date = self.purchase_date;
        blade.unit_price = self.unit_price;
        blade.total_quantity = self.total_quantity;
        blade.remaining_quantity = self.remaining_quantity;
        blade.notes = self.notes;
        blade
    }
}

/// Payload for updating a blade.
///
/// Empty `brand`/`model` and absent optional fields keep the stored value;
/// compatibility, quantities and notes are always overwritten, even with
/// zero or empty values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpdateBladeRequest {
    pub brand: String,
    pub model: String,
    pub compatible_razors: String,
    pub purchase_date: Option<DateTime<Utc>>,
    pub unit_price: Option<f64>,
    pub total_quantity: u32,
    pub remaining_quantity: u32,
    pub notes: String,
}
