//! Pure traversal and depth calculations over a flat department list.
//!
//! # Responsibility
//! - Derive root/child relations from `parent_id` without mutating data.
//! - Compute subtree depth for display and diagnostics.
//!
//! # Invariants
//! - Every function terminates on cyclic `parent_id` input.
//! - Collection order is preserved; nothing is sorted.
//! - A dangling `parent_id` never fails; the record is just unreachable
//!   from any root.

mod rows;

pub use rows::{hierarchy_rows, ExpansionState, HierarchyRow};

use crate::model::department::{Department, DepartmentId};
use std::collections::HashSet;

/// Returns all root-level departments in collection order.
pub fn roots_of(list: &[Department]) -> Vec<&Department> {
    list.iter().filter(|dept| dept.parent_id.is_none()).collect()
}

/// Returns direct children of `id` in collection order.
pub fn children_of<'a>(list: &'a [Department], id: &DepartmentId) -> Vec<&'a Department> {
    list.iter()
        .filter(|dept| dept.parent_id.as_ref() == Some(id))
        .collect()
}

/// Computes the depth of the subtree rooted at `id`.
///
/// A leaf has depth `1`. Returns `0` when `id` is already in `visited`,
/// which is how cycles are cut. Each child receives its own copy of the
/// visited set, so a cycle found under one child never hides the depth of
/// a sibling.
pub fn depth(list: &[Department], id: &DepartmentId, visited: &HashSet<DepartmentId>) -> usize {
    if visited.contains(id) {
        return 0;
    }

    let children = children_of(list, id);
    if children.is_empty() {
        return 1;
    }

    let mut path = visited.clone();
    path.insert(id.clone());

    let deepest = children
        .iter()
        .map(|child| depth(list, &child.id, &path))
        .max()
        .unwrap_or(0);
    1 + deepest
}

/// Returns the deepest root subtree, or `0` when there are no roots.
pub fn max_depth(list: &[Department]) -> usize {
    roots_of(list)
        .iter()
        .map(|root| depth(list, &root.id, &HashSet::new()))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[&Department]) -> Vec<DepartmentId> {
        items.iter().map(|dept| dept.id.clone()).collect()
    }

    fn engineering() -> Vec<Department> {
        vec![
            Department::new(1, "Eng"),
            Department::new(2, "Backend").with_parent(1),
            Department::new(3, "Frontend").with_parent(1),
        ]
    }

    #[test]
    fn engineering_scenario_roots_children_and_depth() {
        let list = engineering();
        assert_eq!(ids(&roots_of(&list)), vec![DepartmentId::Numeric(1)]);
        assert_eq!(
            ids(&children_of(&list, &DepartmentId::Numeric(1))),
            vec![DepartmentId::Numeric(2), DepartmentId::Numeric(3)]
        );
        assert_eq!(max_depth(&list), 2);
    }

    #[test]
    fn empty_list_has_zero_depth() {
        assert_eq!(max_depth(&[]), 0);
    }

    #[test]
    fn all_nodes_in_cycle_means_no_roots() {
        let list = vec![
            Department::new(1, "A").with_parent(3),
            Department::new(2, "B").with_parent(1),
            Department::new(3, "C").with_parent(2),
        ];
        assert_eq!(max_depth(&list), 0);
        // Entering the cycle directly still terminates.
        assert_eq!(depth(&list, &DepartmentId::Numeric(1), &HashSet::new()), 3);
    }

    #[test]
    fn self_parent_terminates() {
        let list = vec![Department::new(1, "Loop").with_parent(1)];
        assert_eq!(depth(&list, &DepartmentId::Numeric(1), &HashSet::new()), 1);
    }

    #[test]
    fn cycle_in_one_branch_does_not_hide_sibling_depth() {
        // Duplicate id 2 closes a loop under the first branch; the sibling
        // chain 3 -> 4 -> 5 must still count fully.
        let list = vec![
            Department::new(1, "Root"),
            Department::new(2, "Loop").with_parent(1),
            Department::new(2, "LoopAgain").with_parent(2),
            Department::new(3, "Chain").with_parent(1),
            Department::new(4, "Chain2").with_parent(3),
            Department::new(5, "Chain3").with_parent(4),
        ];
        assert_eq!(max_depth(&list), 4);
    }

    #[test]
    fn dangling_parent_is_tolerated() {
        let list = vec![
            Department::new(1, "Root"),
            Department::new(2, "Orphan").with_parent(99),
        ];
        assert_eq!(ids(&roots_of(&list)), vec![DepartmentId::Numeric(1)]);
        assert_eq!(max_depth(&list), 1);
    }

    #[test]
    fn visited_id_returns_zero() {
        let list = engineering();
        let visited = HashSet::from([DepartmentId::Numeric(1)]);
        assert_eq!(depth(&list, &DepartmentId::Numeric(1), &visited), 0);
    }
}
