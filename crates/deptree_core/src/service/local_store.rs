//! Local offline department mirror.
//!
//! # Responsibility
//! - Apply create/update/delete synchronously against durable storage.
//! - Keep the in-memory collection consumers observe equal to what was
//!   persisted.
//!
//! # Invariants
//! - The collection only changes after the repository write succeeded.
//! - Delete removes the target and promotes its children in one step.
//! - Errors are returned to the caller; nothing is retried.
//! - This store never talks to the remote store.

use crate::collection::DepartmentCollection;
use crate::model::department::{
    Department, DepartmentId, DepartmentPatch, DepartmentValidationError, NewDepartment,
};
use crate::repo::department_repo::{DepartmentRepoError, DepartmentRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from local mirror operations.
#[derive(Debug)]
pub enum LocalStoreError {
    /// Input failed validation.
    Validation(DepartmentValidationError),
    /// Target department does not exist in the mirror.
    NotFound(DepartmentId),
    /// Repository-level failure.
    Repo(DepartmentRepoError),
}

impl Display for LocalStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "department with id {id} not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LocalStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<DepartmentValidationError> for LocalStoreError {
    fn from(value: DepartmentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DepartmentRepoError> for LocalStoreError {
    fn from(value: DepartmentRepoError) -> Self {
        match value {
            DepartmentRepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type LocalStoreResult<T> = Result<T, LocalStoreError>;

/// Local mirror facade over a department repository.
pub struct LocalDepartmentStore<R: DepartmentRepository> {
    repo: R,
    departments: DepartmentCollection,
    editing: Option<Department>,
}

impl<R: DepartmentRepository> LocalDepartmentStore<R> {
    /// Opens the mirror and loads the persisted collection.
    pub fn open(repo: R) -> LocalStoreResult<Self> {
        let departments = DepartmentCollection::from_vec(repo.list()?);
        info!(
            "event=local_open module=local_store status=ok count={}",
            departments.len()
        );
        Ok(Self {
            repo,
            departments,
            editing: None,
        })
    }

    /// Current collection in insertion order.
    pub fn departments(&self) -> &[Department] {
        self.departments.as_slice()
    }

    pub fn get(&self, id: &DepartmentId) -> Option<&Department> {
        self.departments.get(id)
    }

    /// Re-reads the collection from storage.
    pub fn reload(&mut self) -> LocalStoreResult<()> {
        self.departments.replace_all(self.repo.list()?);
        Ok(())
    }

    /// Creates a department with a locally generated id.
    ///
    /// # Errors
    /// - `Validation` when the name is blank after trim.
    pub fn create(&mut self, input: NewDepartment) -> LocalStoreResult<Department> {
        let input = input.normalized()?;
        let created = self.repo.create(&input)?;
        self.departments.append(created.clone());
        info!(
            "event=local_create module=local_store status=ok id={}",
            created.id
        );
        Ok(created)
    }

    /// Shallow-merges `patch` onto an existing department.
    ///
    /// Clears the editing target on success.
    ///
    /// # Errors
    /// - `NotFound` when `id` is not in the mirror.
    /// - `Validation` when the patch carries a blank name.
    pub fn update(
        &mut self,
        id: &DepartmentId,
        patch: &DepartmentPatch,
    ) -> LocalStoreResult<Department> {
        let mut updated = match self.departments.get(id) {
            Some(existing) => existing.clone(),
            None => {
                warn!("event=local_update module=local_store status=error error_code=not_found id={id}");
                return Err(LocalStoreError::NotFound(id.clone()));
            }
        };
        patch.apply_to(&mut updated)?;

        self.repo.update(&updated)?;
        self.departments.replace(updated.clone());
        self.editing = None;
        info!("event=local_update module=local_store status=ok id={id}");
        Ok(updated)
    }

    /// Deletes a department and promotes its direct children to root.
    ///
    /// Returns the promoted child ids.
    ///
    /// # Errors
    /// - `NotFound` when `id` is not in the mirror.
    pub fn delete(&mut self, id: &DepartmentId) -> LocalStoreResult<Vec<DepartmentId>> {
        if !self.departments.contains(id) {
            warn!("event=local_delete module=local_store status=error error_code=not_found id={id}");
            return Err(LocalStoreError::NotFound(id.clone()));
        }

        let promoted = self.repo.delete_promoting_children(id)?;
        self.departments.remove_promoting_children(id);
        if self.editing.as_ref().is_some_and(|dept| &dept.id == id) {
            self.editing = None;
        }
        info!(
            "event=local_delete module=local_store status=ok id={id} promoted={}",
            promoted.len()
        );
        Ok(promoted)
    }

    /// Transient edit target, separate from the persisted collection.
    pub fn editing(&self) -> Option<&Department> {
        self.editing.as_ref()
    }

    /// Sets or clears the edit target.
    pub fn set_editing(&mut self, department: Option<Department>) {
        self.editing = department;
    }
}
