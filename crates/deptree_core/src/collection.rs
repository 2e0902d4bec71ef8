//! In-memory department collection and its state transitions.
//!
//! # Responsibility
//! - Hold the ordered department list observed by consumers of a store.
//! - Apply whole-record transitions (append, replace, remove) in one step.
//!
//! # Invariants
//! - Insertion order is preserved across every transition.
//! - `remove_promoting_children` never leaves a child pointing at the
//!   removed id, not even transiently.

use crate::model::department::{Department, DepartmentId};

/// Ordered department list owned by one store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentCollection {
    items: Vec<Department>,
}

impl DepartmentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<Department>) -> Self {
        Self { items }
    }

    pub fn as_slice(&self) -> &[Department] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &DepartmentId) -> Option<&Department> {
        self.items.iter().find(|dept| &dept.id == id)
    }

    pub fn contains(&self, id: &DepartmentId) -> bool {
        self.get(id).is_some()
    }

    /// Replaces the whole list.
    pub fn replace_all(&mut self, items: Vec<Department>) {
        self.items = items;
    }

    pub fn append(&mut self, department: Department) {
        self.items.push(department);
    }

    /// Replaces every record whose id matches `department.id`, in place.
    ///
    /// Returns whether anything was replaced.
    pub fn replace(&mut self, department: Department) -> bool {
        let mut replaced = false;
        for slot in self.items.iter_mut().filter(|dept| dept.id == department.id) {
            *slot = department.clone();
            replaced = true;
        }
        replaced
    }

    /// Removes every record with `id`. Children keep their `parent_id`.
    pub fn remove(&mut self, id: &DepartmentId) -> bool {
        let before = self.items.len();
        self.items.retain(|dept| &dept.id != id);
        self.items.len() != before
    }

    /// Removes `id` and moves its direct children to root level.
    ///
    /// Returns the ids of promoted children in collection order, or `None`
    /// when `id` was not present (the collection is left unchanged).
    pub fn remove_promoting_children(&mut self, id: &DepartmentId) -> Option<Vec<DepartmentId>> {
        if !self.contains(id) {
            return None;
        }

        let mut promoted = Vec::new();
        let mut next = Vec::with_capacity(self.items.len());
        for mut dept in std::mem::take(&mut self.items) {
            if &dept.id == id {
                continue;
            }
            if dept.parent_id.as_ref() == Some(id) {
                dept.parent_id = None;
                promoted.push(dept.id.clone());
            }
            next.push(dept);
        }
        self.items = next;
        Some(promoted)
    }

    pub fn into_vec(self) -> Vec<Department> {
        self.items
    }
}
