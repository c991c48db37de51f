//! Repository layer: inventory storage contract and its backends.
//!
//! # Responsibility
//! - Define the storage contract shared by the durable and fallback stores.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `Unsupported`) in
//!   addition to DB transport errors.

pub mod inventory_repo;
pub mod memory_repo;
pub mod sqlite_repo;
pub mod store_backend;
