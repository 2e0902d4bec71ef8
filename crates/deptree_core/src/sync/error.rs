//! Failure kinds of remote department operations.

use crate::model::department::{DepartmentId, DepartmentValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

const PARENT_CHANGE_MESSAGE: &str = "remote departments cannot set a parent department";

/// Error from a remote operation.
///
/// These never reach callers of the remote store directly; they are folded
/// into the store's `error` field by a rejected transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Input failed validation before any request was sent.
    Validation(DepartmentValidationError),
    /// Target id is not in the remote collection.
    NotFound(DepartmentId),
    /// The remote contract carries no parent; re-parenting is refused.
    ParentChangeUnsupported,
    /// Timeout, connection failure or undecodable transport response.
    /// An empty message falls back to the operation's network default.
    Network(String),
    /// Server returned a structured error message.
    Remote(String),
}

impl SyncError {
    pub fn timeout(limit: Duration) -> Self {
        Self::Network(format!(
            "network error: request timed out after {} ms",
            limit.as_millis()
        ))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Message surfaced in the store `error` field.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Validation(err) => Some(err.to_string()),
            Self::NotFound(id) => Some(format!("department with id {id} not found")),
            Self::ParentChangeUnsupported => Some(PARENT_CHANGE_MESSAGE.to_string()),
            Self::Network(message) | Self::Remote(message) if message.is_empty() => None,
            Self::Network(message) | Self::Remote(message) => Some(message.clone()),
        }
    }
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "department with id {id} not found"),
            Self::ParentChangeUnsupported => write!(f, "{PARENT_CHANGE_MESSAGE}"),
            Self::Network(message) => write!(f, "network failure: {message}"),
            Self::Remote(message) => write!(f, "remote error: {message}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DepartmentValidationError> for SyncError {
    fn from(value: DepartmentValidationError) -> Self {
        Self::Validation(value)
    }
}
