//! Department domain model.
//!
//! # Responsibility
//! - Define the one entity type shared by the remote store and local mirror.
//! - Provide name/sub-department normalization used by every write path.
//!
//! # Invariants
//! - `id` is assigned by the owning store and never changes afterwards.
//! - `name` is non-blank after trim for every record created by this crate.
//! - `parent_id` may dangle or form a cycle in foreign data; readers must cope.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Department identifier.
///
/// The remote service assigns integer ids, the local mirror assigns opaque
/// uuid strings. Both shapes deserialize transparently from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepartmentId {
    /// Server-assigned numeric id.
    Numeric(i64),
    /// Locally generated or otherwise opaque id.
    Opaque(String),
}

impl DepartmentId {
    /// Generates a fresh local id.
    pub fn generate() -> Self {
        Self::Opaque(Uuid::new_v4().to_string())
    }
}

impl Display for DepartmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric(value) => write!(f, "{value}"),
            Self::Opaque(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for DepartmentId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for DepartmentId {
    fn from(value: &str) -> Self {
        Self::Opaque(value.to_string())
    }
}

/// Lightweight sub-department label carried on a department.
///
/// Not a tree node: it has no id and cannot be addressed on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubDepartment {
    pub name: String,
}

impl SubDepartment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Canonical department record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    /// Store-assigned stable id.
    pub id: DepartmentId,
    /// User-facing label.
    pub name: String,
    /// Parent department id. `None` means root level.
    #[serde(default)]
    pub parent_id: Option<DepartmentId>,
    /// Denormalized label list, order preserved.
    #[serde(default)]
    pub sub_departments: Vec<SubDepartment>,
}

impl Department {
    /// Creates a root-level department without sub-departments.
    pub fn new(id: impl Into<DepartmentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
            sub_departments: Vec::new(),
        }
    }

    /// Returns this department re-parented under `parent_id`.
    pub fn with_parent(mut self, parent_id: impl Into<DepartmentId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Returns this department with the given sub-department labels.
    pub fn with_sub_departments(mut self, sub_departments: Vec<SubDepartment>) -> Self {
        self.sub_departments = sub_departments;
        self
    }

    /// Whether this department sits at root level.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Comma-joined sub-department names, or `None` when the list is empty.
    pub fn sub_department_label(&self) -> String {
        if self.sub_departments.is_empty() {
            return "None".to_string();
        }
        self.sub_departments
            .iter()
            .map(|sub| sub.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Validation failures for department input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepartmentValidationError {
    /// Name is blank after trim.
    BlankName,
}

impl Display for DepartmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "department name must not be blank"),
        }
    }
}

impl Error for DepartmentValidationError {}

/// Input for creating a department in either store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDepartment {
    pub name: String,
    pub sub_departments: Vec<SubDepartment>,
    pub parent_id: Option<DepartmentId>,
}

impl NewDepartment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<DepartmentId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_sub_departments<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sub_departments = names.into_iter().map(SubDepartment::new).collect();
        self
    }

    /// Validates and normalizes input into the shape persisted or submitted.
    ///
    /// # Errors
    /// - `BlankName` when `name` is blank after trim.
    pub fn normalized(self) -> Result<Self, DepartmentValidationError> {
        Ok(Self {
            name: normalize_name(&self.name)?,
            sub_departments: filter_sub_departments(self.sub_departments),
            parent_id: self.parent_id,
        })
    }
}

/// Partial update for an existing department.
///
/// `None` fields are retained from the existing record. `parent_id` uses a
/// nested option so callers can explicitly move a record to root level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentPatch {
    pub name: Option<String>,
    pub parent_id: Option<Option<DepartmentId>>,
    pub sub_departments: Option<Vec<SubDepartment>>,
}

impl DepartmentPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent_id: Option<DepartmentId>) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_sub_departments(mut self, sub_departments: Vec<SubDepartment>) -> Self {
        self.sub_departments = Some(sub_departments);
        self
    }

    /// Shallow-merges this patch onto `target`.
    ///
    /// `target` is left untouched when validation fails.
    pub fn apply_to(&self, target: &mut Department) -> Result<(), DepartmentValidationError> {
        let name = self.name.as_deref().map(normalize_name).transpose()?;
        if let Some(name) = name {
            target.name = name;
        }
        if let Some(parent_id) = &self.parent_id {
            target.parent_id = parent_id.clone();
        }
        if let Some(sub_departments) = &self.sub_departments {
            target.sub_departments = filter_sub_departments(sub_departments.clone());
        }
        Ok(())
    }
}

/// Trims a department name and rejects blank input.
pub fn normalize_name(value: &str) -> Result<String, DepartmentValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DepartmentValidationError::BlankName);
    }
    Ok(trimmed.to_string())
}

/// Drops sub-department rows whose name is blank, keeping order.
pub fn filter_sub_departments(sub_departments: Vec<SubDepartment>) -> Vec<SubDepartment> {
    sub_departments
        .into_iter()
        .filter(|sub| !sub.name.trim().is_empty())
        .collect()
}
