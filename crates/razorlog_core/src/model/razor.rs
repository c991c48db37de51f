//! Razor entity and its request shapes.
//!
//! # Invariants
//! - `brand` and `model` are non-blank.
//! - `price`, when present, is a finite non-negative amount.

use super::{require_amount, require_text, EntityId, EntityKind, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reusable shaving device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Razor {
    /// Store-assigned ID. `0` marks an unsaved draft.
    pub id: EntityId,
    pub brand: String,
    pub model: String,
    pub purchase_date: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Razor {
    /// Creates an unsaved razor draft.
    ///
    /// ID and timestamps are placeholders; the store assigns real values on create.
    pub fn new(brand: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: 0,
            brand: brand.into(),
            model: model.into(),
            purchase_date: None,
            price: None,
            notes: String::new(),
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }

    /// Checks field-level invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(EntityKind::Razor, "brand", &self.brand)?;
        require_text(EntityKind::Razor, "model", &self.model)?;
        require_amount(EntityKind::Razor, "price", self.price)
    }
}

/// Payload for creating a razor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreateRazorRequest {
    pub brand: String,
    pub model: String,
    pub purchase_date: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub notes: String,
}

impl CreateRazorRequest {
    /// Converts the payload into an unsaved draft.
    pub fn into_draft(self) -> Razor {
        let mut razor = Razor::new(self.brand, self.model);
        razor.purchase_date = self.purchase_date;
        razor.price = self.price;
        razor.notes = self.notes;
        razor
    }
}

/// Payload for updating a razor.
///
/// Empty `brand`/`model` and absent optional fields leave the stored value
/// unchanged; `notes` is always overwritten.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpdateRazorRequest {
    pub brand: String,
    pub model: String,
    pub purchase_date: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub notes: String,
}
