//! Domain model for todo records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep validation rules next to the data they guard.
//!
//! # Invariants
//! - Every stored record is identified by a storage-assigned `TodoId`.
//! - Deletion is permanent; there are no tombstones.

pub mod todo;
