//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the persistence collaborator contract the catalog service uses.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Item::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod item_repo;
