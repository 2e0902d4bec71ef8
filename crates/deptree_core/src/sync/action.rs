//! Closed action set driving the remote store.

use crate::model::department::{Department, DepartmentId};

/// Remote operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Stable name used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Message stored when a rejection carries no payload.
    pub fn rejected_fallback(self) -> &'static str {
        match self {
            Self::Fetch => "Failed to fetch departments",
            Self::Create => "Failed to create department",
            Self::Update => "Failed to update department",
            Self::Delete => "Failed to delete department",
        }
    }

    /// Message used when a transport failure has no message of its own.
    pub fn network_fallback(self) -> &'static str {
        match self {
            Self::Fetch => "Network error while fetching departments",
            Self::Create => "Network error while creating department",
            Self::Update => "Network error while updating department",
            Self::Delete => "Network error while deleting department",
        }
    }
}

/// Lifecycle phase of one remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<T> {
    Pending,
    Fulfilled(T),
    /// Rejection message; `None` falls back to the operation default.
    Rejected(Option<String>),
}

/// Remote operation transitions: `{Fetch, Create, Update, Delete} × Phase`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    Fetch(Phase<Vec<Department>>),
    Create(Phase<Department>),
    Update(Phase<Department>),
    Delete(Phase<DepartmentId>),
}

impl SyncAction {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Fetch(_) => Operation::Fetch,
            Self::Create(_) => Operation::Create,
            Self::Update(_) => Operation::Update,
            Self::Delete(_) => Operation::Delete,
        }
    }
}

/// Synchronous UI-state actions on the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    SetModalOpen(bool),
    SetFormSuccess(bool),
    /// Clears `error` and `form_success`.
    ClearDepartmentState,
    SetEditing(Option<Department>),
    ClearError,
}
