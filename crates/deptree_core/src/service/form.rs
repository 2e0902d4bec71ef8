//! Department form model shared by both stores.
//!
//! The form is seeded from the editing target: a record pre-fills it, no
//! record yields a blank creation form with one empty sub-department row.

use crate::model::department::{
    filter_sub_departments, Department, DepartmentId, DepartmentPatch, NewDepartment,
    SubDepartment,
};

/// Editable department form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentForm {
    pub name: String,
    rows: Vec<String>,
    editing_id: Option<DepartmentId>,
}

/// What a submitted form asks the store to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSubmission {
    Create(NewDepartment),
    Update {
        id: DepartmentId,
        patch: DepartmentPatch,
    },
}

impl Default for DepartmentForm {
    fn default() -> Self {
        Self::blank()
    }
}

impl DepartmentForm {
    /// Creation-mode form.
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            rows: vec![String::new()],
            editing_id: None,
        }
    }

    /// Builds the form for an editing target, or a blank one.
    pub fn from_editing(editing: Option<&Department>) -> Self {
        let Some(department) = editing else {
            return Self::blank();
        };

        let rows = if department.sub_departments.is_empty() {
            vec![String::new()]
        } else {
            department
                .sub_departments
                .iter()
                .map(|sub| sub.name.clone())
                .collect()
        };
        Self {
            name: department.name.clone(),
            rows,
            editing_id: Some(department.id.clone()),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn add_row(&mut self) {
        self.rows.push(String::new());
    }

    /// Sets one row; out-of-range indexes are ignored.
    pub fn set_row(&mut self, index: usize, value: impl Into<String>) {
        if let Some(row) = self.rows.get_mut(index) {
            *row = value.into();
        }
    }

    /// Removes one row, keeping at least one.
    pub fn remove_row(&mut self, index: usize) -> bool {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        true
    }

    /// Produces the store request, dropping blank sub-department rows.
    ///
    /// The name is passed through as typed; stores validate it.
    pub fn submission(&self) -> FormSubmission {
        let sub_departments =
            filter_sub_departments(self.rows.iter().map(SubDepartment::new).collect());
        match &self.editing_id {
            Some(id) => FormSubmission::Update {
                id: id.clone(),
                patch: DepartmentPatch {
                    name: Some(self.name.clone()),
                    parent_id: None,
                    sub_departments: Some(sub_departments),
                },
            },
            None => FormSubmission::Create(NewDepartment {
                name: self.name.clone(),
                sub_departments,
                parent_id: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_form_has_one_empty_row() {
        let form = DepartmentForm::from_editing(None);
        assert!(!form.is_edit());
        assert_eq!(form.name, "");
        assert_eq!(form.rows(), &[String::new()]);
    }

    #[test]
    fn editing_target_prefills_form() {
        let dept = Department::new(5, "Eng").with_sub_departments(vec![
            SubDepartment::new("Core"),
            SubDepartment::new("Infra"),
        ]);
        let form = DepartmentForm::from_editing(Some(&dept));
        assert!(form.is_edit());
        assert_eq!(form.name, "Eng");
        assert_eq!(form.rows(), &["Core".to_string(), "Infra".to_string()]);
    }

    #[test]
    fn last_row_cannot_be_removed() {
        let mut form = DepartmentForm::blank();
        assert!(!form.remove_row(0));
        form.add_row();
        assert!(form.remove_row(1));
        assert_eq!(form.rows().len(), 1);
    }

    #[test]
    fn submission_filters_blank_rows() {
        let mut form = DepartmentForm::blank();
        form.name = "Eng".to_string();
        form.set_row(0, "Core");
        form.add_row();
        form.add_row();
        form.set_row(2, "Infra");

        let FormSubmission::Create(input) = form.submission() else {
            panic!("blank form must submit a create");
        };
        assert_eq!(
            input.sub_departments,
            vec![SubDepartment::new("Core"), SubDepartment::new("Infra")]
        );
    }

    #[test]
    fn edit_submission_targets_editing_id() {
        let dept = Department::new(5, "Eng");
        let mut form = DepartmentForm::from_editing(Some(&dept));
        form.name = "Engineering".to_string();

        match form.submission() {
            FormSubmission::Update { id, patch } => {
                assert_eq!(id, DepartmentId::Numeric(5));
                assert_eq!(patch.name.as_deref(), Some("Engineering"));
                assert_eq!(patch.parent_id, None);
                assert_eq!(patch.sub_departments, Some(Vec::new()));
            }
            other => panic!("expected update, got {other:?}"),
        }
    }
}
