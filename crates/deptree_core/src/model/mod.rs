//! Department domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by both department stores.
//!
//! # Invariants
//! - Every department is identified by a store-assigned `DepartmentId`.
//! - Deletion is a hard delete; children are promoted, never cascaded.

pub mod department;
