use std::collections::HashSet;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::entities::{Employee, EmployeeId};

/// Data payload for chart nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub id: EmployeeId,
    pub name: String,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Immutable node in the arena.
///
/// Nodes never change after insertion. A new chart version is created by
/// copying the nodes on the path from the root to the changed node; every
/// other subtree is shared with the previous version.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Indices of direct subordinates, in insertion order
    pub subordinates: Vec<Index>,
}

/// Arena holding every version of a chart.
///
/// A version is identified by the `Index` of its root node. Taking a
/// snapshot is copying that index; restoring one is assigning it back.
#[derive(Debug, Default)]
pub struct OrgArena {
    arena: Arena<TreeNode>,
}

impl OrgArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    /// Number of nodes stored across all versions.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, subordinates: Vec<Index>) -> Index {
        self.arena.insert(TreeNode { data, subordinates })
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn employee(&self, idx: Index) -> Option<EmployeeRef<'_>> {
        self.get_node(idx).map(|node| EmployeeRef {
            arena: self,
            index: idx,
            node,
        })
    }

    /// Stores an owned tree as a fresh version and returns its root.
    #[instrument(level = "debug", skip_all, fields(id = employee.id))]
    pub fn insert_tree(&mut self, employee: &Employee) -> Index {
        let subordinates = employee
            .subordinates
            .iter()
            .map(|child| self.insert_tree(child))
            .collect();
        self.insert_node(
            NodeData {
                id: employee.id,
                name: employee.name.clone(),
            },
            subordinates,
        )
    }

    /// Deep, owned copy of the subtree rooted at `idx`.
    pub fn materialize(&self, idx: Index) -> Option<Employee> {
        self.employee(idx).map(|e| e.to_employee())
    }

    /// Copies `path` (root first, target last) bottom-up, giving the target
    /// the new `subordinates`. Returns the root of the new version.
    #[instrument(level = "trace", skip(self, subordinates))]
    pub fn rewrite_path(&mut self, path: &[Index], subordinates: Vec<Index>) -> Option<Index> {
        let (&target, ancestors) = path.split_last()?;
        let data = self.get_node(target)?.data.clone();
        let mut replaced = target;
        let mut current = self.insert_node(data, subordinates);

        for &ancestor in ancestors.iter().rev() {
            let node = self.get_node(ancestor)?;
            let data = node.data.clone();
            let subordinates = node
                .subordinates
                .iter()
                .map(|&child| if child == replaced { current } else { child })
                .collect();
            replaced = ancestor;
            current = self.insert_node(data, subordinates);
        }
        Some(current)
    }

    /// Derives a new version in which employee `id` has the subordinates
    /// returned by `edit`. `None` if `id` is not reachable from `version`.
    pub fn edit_subordinates<F>(&mut self, version: Index, id: EmployeeId, edit: F) -> Option<Index>
    where
        F: FnOnce(&OrgArena, &[Index]) -> Vec<Index>,
    {
        let path = self.path_to(version, id)?;
        let target = *path.last()?;
        let subordinates = {
            let arena: &OrgArena = self;
            edit(arena, &arena.get_node(target)?.subordinates)
        };
        self.rewrite_path(&path, subordinates)
    }

    /// Drops every node not reachable from one of `roots`.
    ///
    /// Returns the number of nodes removed. Indices of removed nodes go stale;
    /// the generational arena reports them as absent instead of aliasing.
    #[instrument(level = "debug", skip(self, roots))]
    pub fn retain_reachable(&mut self, roots: &[Index]) -> usize {
        let mut live: HashSet<Index> = HashSet::new();
        let mut stack: Vec<Index> = roots.to_vec();
        while let Some(idx) = stack.pop() {
            if !live.insert(idx) {
                continue;
            }
            if let Some(node) = self.get_node(idx) {
                stack.extend(node.subordinates.iter().copied());
            }
        }

        let before = self.arena.len();
        self.arena.retain(|idx, _| live.contains(&idx));
        let removed = before - self.arena.len();
        debug!(removed, kept = self.arena.len(), "compacted arena");
        removed
    }
}

/// Borrowed view of one employee in a specific chart version.
#[derive(Debug, Clone, Copy)]
pub struct EmployeeRef<'a> {
    arena: &'a OrgArena,
    index: Index,
    node: &'a TreeNode,
}

impl<'a> EmployeeRef<'a> {
    pub fn id(&self) -> EmployeeId {
        self.node.data.id
    }

    pub fn name(&self) -> &'a str {
        &self.node.data.name
    }

    pub fn index(&self) -> Index {
        self.index
    }

    pub fn data(&self) -> &'a NodeData {
        &self.node.data
    }

    pub fn subordinates(&self) -> impl Iterator<Item = EmployeeRef<'a>> + 'a {
        let arena = self.arena;
        self.node
            .subordinates
            .iter()
            .filter_map(move |&idx| arena.employee(idx))
    }

    pub fn subordinate_ids(&self) -> Vec<EmployeeId> {
        self.subordinates().map(|s| s.id()).collect()
    }

    pub fn to_employee(&self) -> Employee {
        Employee {
            id: self.id(),
            name: self.name().to_string(),
            subordinates: self.subordinates().map(|s| s.to_employee()).collect(),
        }
    }
}
