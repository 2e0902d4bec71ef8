//! Flattened hierarchy rows for tree display.
//!
//! Expand/collapse state is owned by the presentation layer through
//! `ExpansionState`; it never touches `Department` records.

use super::children_of;
use crate::model::department::{Department, DepartmentId};
use std::collections::{HashMap, HashSet};

/// Per-node expand/collapse flags. Unknown ids are expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    flags: HashMap<DepartmentId, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &DepartmentId) -> bool {
        self.flags.get(id).copied().unwrap_or(true)
    }

    pub fn set_expanded(&mut self, id: DepartmentId, expanded: bool) {
        self.flags.insert(id, expanded);
    }

    /// Flips the flag for `id` when it has children in `list`.
    ///
    /// Returns the new flag, or `None` for leaf nodes, which have nothing
    /// to expand.
    pub fn toggle(&mut self, list: &[Department], id: &DepartmentId) -> Option<bool> {
        if children_of(list, id).is_empty() {
            return None;
        }
        let next = !self.is_expanded(id);
        self.flags.insert(id.clone(), next);
        Some(next)
    }
}

/// One visible line of the hierarchy view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyRow {
    pub id: DepartmentId,
    pub name: String,
    /// `0` for roots.
    pub level: usize,
    pub has_children: bool,
    pub expanded: bool,
}

impl HierarchyRow {
    pub fn is_root(&self) -> bool {
        self.level == 0
    }
}

/// Renders roots and their visible descendants depth-first in collection order.
///
/// Children of collapsed nodes are skipped. A node already on the current
/// path is not entered again, so corrupted input cannot loop.
pub fn hierarchy_rows(list: &[Department], expansion: &ExpansionState) -> Vec<HierarchyRow> {
    let mut rows = Vec::new();
    for root in list.iter().filter(|dept| dept.parent_id.is_none()) {
        push_rows(list, root, 0, &HashSet::new(), expansion, &mut rows);
    }
    rows
}

fn push_rows(
    list: &[Department],
    node: &Department,
    level: usize,
    path: &HashSet<DepartmentId>,
    expansion: &ExpansionState,
    rows: &mut Vec<HierarchyRow>,
) {
    if path.contains(&node.id) {
        return;
    }

    let children = children_of(list, &node.id);
    let expanded = expansion.is_expanded(&node.id);
    rows.push(HierarchyRow {
        id: node.id.clone(),
        name: node.name.clone(),
        level,
        has_children: !children.is_empty(),
        expanded,
    });

    if !expanded {
        return;
    }

    let mut next_path = path.clone();
    next_path.insert(node.id.clone());
    for child in children {
        push_rows(list, child, level + 1, &next_path, expansion, rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Department> {
        vec![
            Department::new(1, "Eng"),
            Department::new(2, "Backend").with_parent(1),
            Department::new(4, "Ops"),
            Department::new(3, "Frontend").with_parent(1),
            Department::new(5, "Api").with_parent(2),
        ]
    }

    fn names(rows: &[HierarchyRow]) -> Vec<(&str, usize)> {
        rows.iter().map(|row| (row.name.as_str(), row.level)).collect()
    }

    #[test]
    fn rows_follow_collection_order_depth_first() {
        let rows = hierarchy_rows(&sample(), &ExpansionState::new());
        assert_eq!(
            names(&rows),
            vec![
                ("Eng", 0),
                ("Backend", 1),
                ("Api", 2),
                ("Frontend", 1),
                ("Ops", 0)
            ]
        );
        assert!(rows[0].is_root());
        assert!(rows[0].has_children);
        assert!(!rows[4].has_children);
    }

    #[test]
    fn collapsed_node_hides_descendants() {
        let list = sample();
        let mut expansion = ExpansionState::new();
        assert_eq!(expansion.toggle(&list, &DepartmentId::Numeric(2)), Some(false));

        let rows = hierarchy_rows(&list, &expansion);
        assert_eq!(
            names(&rows),
            vec![("Eng", 0), ("Backend", 1), ("Frontend", 1), ("Ops", 0)]
        );
        assert!(!rows[1].expanded);
    }

    #[test]
    fn toggle_ignores_leaf_nodes() {
        let list = sample();
        let mut expansion = ExpansionState::new();
        assert_eq!(expansion.toggle(&list, &DepartmentId::Numeric(4)), None);
        assert!(expansion.is_expanded(&DepartmentId::Numeric(4)));
    }

    #[test]
    fn duplicate_ids_do_not_loop() {
        let list = vec![
            Department::new(1, "Root"),
            Department::new(1, "Shadow").with_parent(1),
        ];
        let rows = hierarchy_rows(&list, &ExpansionState::new());
        assert_eq!(names(&rows), vec![("Root", 0)]);
    }
}
