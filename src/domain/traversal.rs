//! Read-only searches over one chart version.
//!
//! Every search is a pre-order depth-first walk starting at the version's
//! root, so "first match" always means first in pre-order.

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::{OrgArena, TreeNode};
use crate::domain::entities::EmployeeId;

impl OrgArena {
    #[instrument(level = "trace", skip(self))]
    pub fn iter_preorder(&self, root: Index) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, root)
    }

    /// Index of the employee with `id` in the version rooted at `root`.
    #[instrument(level = "trace", skip(self))]
    pub fn find_employee(&self, root: Index, id: EmployeeId) -> Option<Index> {
        self.iter_preorder(root)
            .find(|(_, node)| node.data.id == id)
            .map(|(idx, _)| idx)
    }

    /// Index of the node whose direct subordinates contain `id`.
    ///
    /// `None` for the root itself and for unknown ids.
    #[instrument(level = "trace", skip(self))]
    pub fn find_supervisor(&self, root: Index, id: EmployeeId) -> Option<Index> {
        self.iter_preorder(root)
            .find(|(_, node)| {
                node.subordinates
                    .iter()
                    .filter_map(|&child| self.get_node(child))
                    .any(|child| child.data.id == id)
            })
            .map(|(idx, _)| idx)
    }

    /// Indices from `root` down to the employee with `id`, both inclusive.
    #[instrument(level = "trace", skip(self))]
    pub fn path_to(&self, root: Index, id: EmployeeId) -> Option<Vec<Index>> {
        let mut path: Vec<Index> = Vec::new();
        let mut stack = vec![(root, 0usize)];

        while let Some((idx, depth)) = stack.pop() {
            let Some(node) = self.get_node(idx) else {
                continue;
            };
            path.truncate(depth);
            path.push(idx);
            if node.data.id == id {
                return Some(path);
            }
            for &child in node.subordinates.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        None
    }

    /// True if `id` occurs in the subtree rooted at `root` (including `root`).
    pub fn contains(&self, root: Index, id: EmployeeId) -> bool {
        self.find_employee(root, id).is_some()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, root: Index) -> usize {
        match self.get_node(root) {
            Some(node) => {
                1 + node
                    .subordinates
                    .iter()
                    .map(|&child| self.depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }

}

pub struct PreOrderIterator<'a> {
    arena: &'a OrgArena,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(arena: &'a OrgArena, root: Index) -> Self {
        Self {
            arena,
            stack: vec![root],
        }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.subordinates.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Employee;

    fn build() -> (OrgArena, Index) {
        let mut arena = OrgArena::new();
        let root = arena.insert_tree(&Employee::new(1, "CEO").with_subordinates(vec![
            Employee::new(2, "A").with_subordinates(vec![
                Employee::new(4, "C"),
                Employee::new(5, "D"),
            ]),
            Employee::new(3, "B").with_subordinates(vec![Employee::new(6, "E")]),
        ]));
        (arena, root)
    }

    #[test]
    fn preorder_visits_left_to_right() {
        let (arena, root) = build();
        let ids: Vec<_> = arena.iter_preorder(root).map(|(_, n)| n.data.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5, 3, 6]);
    }

    #[test]
    fn find_employee_returns_matching_node() {
        let (arena, root) = build();
        let idx = arena.find_employee(root, 5).unwrap();
        assert_eq!(arena.get_node(idx).unwrap().data.name, "D");
        assert!(arena.find_employee(root, 99).is_none());
    }

    #[test]
    fn find_supervisor_returns_immediate_parent() {
        let (arena, root) = build();
        let idx = arena.find_supervisor(root, 6).unwrap();
        assert_eq!(arena.get_node(idx).unwrap().data.id, 3);
    }

    #[test]
    fn find_supervisor_of_root_or_unknown_is_none() {
        let (arena, root) = build();
        assert!(arena.find_supervisor(root, 1).is_none());
        assert!(arena.find_supervisor(root, 99).is_none());
    }

    #[test]
    fn path_to_lists_ancestors_root_first() {
        let (arena, root) = build();
        let ids: Vec<_> = arena
            .path_to(root, 5)
            .unwrap()
            .into_iter()
            .map(|idx| arena.get_node(idx).unwrap().data.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 5]);
        assert!(arena.path_to(root, 99).is_none());
    }

    #[test]
    fn depth_and_containment() {
        let (arena, root) = build();
        assert_eq!(arena.depth(root), 3);
        assert!(arena.contains(root, 6));
        assert!(!arena.contains(root, 99));
    }
}
