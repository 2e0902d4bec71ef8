//! Repository layer for the local department mirror.
//!
//! # Responsibility
//! - Define the persistence contract used by the local store.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod department_repo;
