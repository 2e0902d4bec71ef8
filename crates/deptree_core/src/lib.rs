//! Core engine for the department hierarchy.
//! This crate is the single source of truth for department invariants.
//!
//! Two stores share the same model and derived views but never merge:
//! `RemoteDepartmentStore` (authoritative, synchronized over GraphQL) and
//! `LocalDepartmentStore` (offline mirror persisted in SQLite).

pub mod collection;
pub mod config;
pub mod db;
pub mod hierarchy;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;
pub mod view;

pub use collection::DepartmentCollection;
pub use config::RemoteConfig;
pub use hierarchy::{
    children_of, depth, hierarchy_rows, max_depth, roots_of, ExpansionState, HierarchyRow,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::department::{
    Department, DepartmentId, DepartmentPatch, DepartmentValidationError, NewDepartment,
    SubDepartment,
};
pub use repo::department_repo::{
    DepartmentRepoError, DepartmentRepoResult, DepartmentRepository, SqliteDepartmentRepository,
};
pub use service::form::{DepartmentForm, FormSubmission};
pub use service::local_store::{LocalDepartmentStore, LocalStoreError, LocalStoreResult};
pub use sync::action::{Operation, Phase, SyncAction, UiAction};
pub use sync::api::{DepartmentApi, DepartmentInput};
pub use sync::credentials::{CredentialProvider, NoCredentials, StaticToken};
pub use sync::error::SyncError;
pub use sync::graphql::GraphqlDepartmentApi;
pub use sync::state::SyncState;
pub use sync::store::RemoteDepartmentStore;
pub use view::{project, PageView, ViewQuery, DEFAULT_PAGE_SIZE};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
