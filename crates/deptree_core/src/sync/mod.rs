//! Remote synchronization of the authoritative department collection.
//!
//! # Responsibility
//! - Define the remote API contract and its GraphQL implementation.
//! - Track each remote operation through an explicit lifecycle.
//!
//! # Invariants
//! - The remote store and the local mirror never merge implicitly.
//! - Every remote call is bounded by a timeout.

pub mod action;
pub mod api;
pub mod credentials;
pub mod error;
pub mod graphql;
pub mod state;
pub mod store;
