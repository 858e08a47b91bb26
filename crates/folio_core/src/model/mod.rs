//! Domain model for the project catalog.
//!
//! # Responsibility
//! - Define canonical data structures used by catalog business logic.
//! - Keep input shapes (`NewItem`, `ItemPatch`) separate from the stored record.
//!
//! # Invariants
//! - Every catalog entry is identified by a store-assigned `ItemId`.
//! - Deletion is a hard removal; ids are never handed out again.

pub mod item;
