//! Remote department API contract.

use super::error::SyncError;
use crate::model::department::{Department, DepartmentId, SubDepartment};
use async_trait::async_trait;
use serde::Serialize;

/// Payload sent by remote create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentInput {
    pub name: String,
    pub sub_departments: Vec<SubDepartment>,
}

/// Query/mutation contract of the remote department service.
///
/// Implementations report failures as `SyncError::Network` or
/// `SyncError::Remote`; callers bound every call with their own timeout.
#[async_trait]
pub trait DepartmentApi: Send + Sync {
    /// Lists every department, with nested sub-departments.
    async fn fetch_all(&self) -> Result<Vec<Department>, SyncError>;
    /// Creates a department and returns it with its server-assigned id.
    async fn create(&self, input: &DepartmentInput) -> Result<Department, SyncError>;
    /// Overwrites name and sub-departments of `id`.
    async fn update(
        &self,
        id: &DepartmentId,
        input: &DepartmentInput,
    ) -> Result<Department, SyncError>;
    /// Deletes `id` and acknowledges the deleted identifier.
    async fn delete(&self, id: &DepartmentId) -> Result<DepartmentId, SyncError>;
}
