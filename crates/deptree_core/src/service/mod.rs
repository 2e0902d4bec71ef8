//! Store-level use cases for the local mirror and department forms.
//!
//! # Responsibility
//! - Orchestrate repository calls into department mutations.
//! - Keep UI layers decoupled from storage details.

pub mod form;
pub mod local_store;
