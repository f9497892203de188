//! Domain model for persisted calculations.
//!
//! # Responsibility
//! - Define canonical data structures shared by the store and its clients.
//!
//! # Invariants
//! - Every stored calculation is identified by a stable `RecordId`.
//! - Records are immutable once created; deletion is a hard delete.

pub mod calculation;
