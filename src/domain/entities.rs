//! Domain entities: core data structures

use serde::{Deserialize, Serialize};

/// Identifier of an employee, unique across the whole chart.
pub type EmployeeId = i64;

/// Owned, nested form of a chart (or any subtree of it).
///
/// This is the shape charts are loaded from and materialized into. Inside the
/// chart, versions live in [`crate::domain::OrgArena`]; two charts are equal when
/// their materialized `Employee` trees are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(default)]
    pub subordinates: Vec<Employee>,
}

impl Employee {
    pub fn new(id: EmployeeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            subordinates: Vec::new(),
        }
    }

    /// Builder-style helper for assembling fixtures and literal charts.
    pub fn with_subordinates(mut self, subordinates: Vec<Employee>) -> Self {
        self.subordinates = subordinates;
        self
    }

    /// Ids of the direct subordinates, in order.
    pub fn subordinate_ids(&self) -> Vec<EmployeeId> {
        self.subordinates.iter().map(|s| s.id).collect()
    }

    /// All ids of this subtree in pre-order.
    pub fn ids(&self) -> Vec<EmployeeId> {
        let mut ids = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            ids.push(node.id);
            // Reverse so the leftmost subordinate is visited first
            for child in node.subordinates.iter().rev() {
                stack.push(child);
            }
        }
        ids
    }

    /// Pre-order search within this owned subtree.
    pub fn find(&self, id: EmployeeId) -> Option<&Employee> {
        if self.id == id {
            return Some(self);
        }
        self.subordinates.iter().find_map(|child| child.find(id))
    }

    /// Number of employees in this subtree, including `self`.
    pub fn headcount(&self) -> usize {
        1 + self
            .subordinates
            .iter()
            .map(Employee::headcount)
            .sum::<usize>()
    }
}
