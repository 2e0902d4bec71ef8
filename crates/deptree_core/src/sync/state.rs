//! Observable state of the remote-backed store and its transition function.
//!
//! # Invariants
//! - Every transition is applied to the latest state; callers never write
//!   back a stale copy.
//! - `loading`, `error` and `form_success` are last-writer-wins across
//!   overlapping operations, in settle order.
//! - A remote delete removes only the target; children keep `parent_id`
//!   until the next fetch.

use super::action::{Operation, Phase, SyncAction, UiAction};
use crate::collection::DepartmentCollection;
use crate::model::department::Department;

/// Store-wide state of the remote-backed department collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    pub departments: DepartmentCollection,
    pub loading: bool,
    pub error: Option<String>,
    pub form_success: bool,
    pub is_modal_open: bool,
    pub editing: Option<Department>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one remote lifecycle transition.
    pub fn apply(&mut self, action: SyncAction) {
        let operation = action.operation();
        match action {
            SyncAction::Fetch(Phase::Pending) | SyncAction::Delete(Phase::Pending) => {
                self.loading = true;
                self.error = None;
            }
            SyncAction::Create(Phase::Pending) | SyncAction::Update(Phase::Pending) => {
                self.loading = true;
                self.error = None;
                self.form_success = false;
            }
            SyncAction::Fetch(Phase::Fulfilled(items)) => {
                self.loading = false;
                self.departments.replace_all(items);
            }
            SyncAction::Create(Phase::Fulfilled(created)) => {
                self.loading = false;
                self.form_success = true;
                self.departments.append(created);
            }
            SyncAction::Update(Phase::Fulfilled(updated)) => {
                self.loading = false;
                self.form_success = true;
                self.departments.replace(updated);
            }
            SyncAction::Delete(Phase::Fulfilled(id)) => {
                self.loading = false;
                self.departments.remove(&id);
            }
            SyncAction::Fetch(Phase::Rejected(message))
            | SyncAction::Create(Phase::Rejected(message))
            | SyncAction::Update(Phase::Rejected(message))
            | SyncAction::Delete(Phase::Rejected(message)) => {
                self.reject(operation, message);
            }
        }
    }

    /// Applies one synchronous UI action.
    pub fn apply_ui(&mut self, action: UiAction) {
        match action {
            UiAction::SetModalOpen(open) => self.is_modal_open = open,
            UiAction::SetFormSuccess(success) => self.form_success = success,
            UiAction::ClearDepartmentState => {
                self.error = None;
                self.form_success = false;
            }
            UiAction::SetEditing(department) => self.editing = department,
            UiAction::ClearError => self.error = None,
        }
    }

    pub fn departments(&self) -> &[Department] {
        self.departments.as_slice()
    }

    fn reject(&mut self, operation: Operation, message: Option<String>) {
        self.loading = false;
        self.error = Some(
            message
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| operation.rejected_fallback().to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::department::DepartmentId;

    fn seeded() -> SyncState {
        let mut state = SyncState::new();
        state.apply(SyncAction::Fetch(Phase::Fulfilled(vec![
            Department::new(1, "Eng"),
            Department::new(2, "Backend").with_parent(1),
        ])));
        state
    }

    #[test]
    fn fetch_pending_clears_error_but_keeps_form_success() {
        let mut state = SyncState::new();
        state.error = Some("old".to_string());
        state.form_success = true;

        state.apply(SyncAction::Fetch(Phase::Pending));
        assert!(state.loading);
        assert_eq!(state.error, None);
        assert!(state.form_success);
    }

    #[test]
    fn create_pending_resets_form_success() {
        let mut state = SyncState::new();
        state.form_success = true;
        state.apply(SyncAction::Create(Phase::Pending));
        assert!(state.loading);
        assert!(!state.form_success);
    }

    #[test]
    fn fetch_fulfilled_replaces_whole_collection() {
        let mut state = seeded();
        state.apply(SyncAction::Fetch(Phase::Fulfilled(vec![Department::new(9, "New")])));
        assert!(!state.loading);
        assert_eq!(state.departments(), &[Department::new(9, "New")]);
    }

    #[test]
    fn create_and_update_fulfilled_set_form_success() {
        let mut state = seeded();
        state.apply(SyncAction::Create(Phase::Pending));
        state.apply(SyncAction::Create(Phase::Fulfilled(Department::new(3, "Ops"))));
        assert!(state.form_success);
        assert_eq!(state.departments().len(), 3);

        state.apply(SyncAction::Update(Phase::Pending));
        state.apply(SyncAction::Update(Phase::Fulfilled(Department::new(1, "Engineering"))));
        assert!(state.form_success);
        assert_eq!(state.departments()[0].name, "Engineering");
    }

    #[test]
    fn remote_delete_does_not_promote_children() {
        let mut state = seeded();
        state.apply(SyncAction::Delete(Phase::Pending));
        state.apply(SyncAction::Delete(Phase::Fulfilled(DepartmentId::Numeric(1))));

        assert!(!state.loading);
        assert_eq!(state.departments().len(), 1);
        assert_eq!(
            state.departments()[0].parent_id,
            Some(DepartmentId::Numeric(1))
        );
    }

    #[test]
    fn rejection_uses_payload_or_fallback() {
        let mut state = SyncState::new();
        state.apply(SyncAction::Update(Phase::Rejected(Some("boom".to_string()))));
        assert_eq!(state.error.as_deref(), Some("boom"));

        state.apply(SyncAction::Fetch(Phase::Rejected(None)));
        assert_eq!(state.error.as_deref(), Some("Failed to fetch departments"));
        assert!(!state.loading);
    }

    #[test]
    fn delete_rejection_leaves_form_success() {
        let mut state = seeded();
        state.form_success = true;
        state.apply(SyncAction::Delete(Phase::Pending));
        state.apply(SyncAction::Delete(Phase::Rejected(None)));
        assert!(state.form_success);
        assert_eq!(state.error.as_deref(), Some("Failed to delete department"));
    }

    #[test]
    fn ui_actions_toggle_flags() {
        let mut state = SyncState::new();
        state.error = Some("x".to_string());
        state.form_success = true;

        state.apply_ui(UiAction::SetModalOpen(true));
        state.apply_ui(UiAction::SetEditing(Some(Department::new(1, "Eng"))));
        assert!(state.is_modal_open);
        assert_eq!(state.editing.as_ref().map(|d| d.name.as_str()), Some("Eng"));

        state.apply_ui(UiAction::ClearDepartmentState);
        assert_eq!(state.error, None);
        assert!(!state.form_success);

        state.apply_ui(UiAction::SetEditing(None));
        assert_eq!(state.editing, None);
    }
}
