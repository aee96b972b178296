//! Rendering charts as `termtree` trees.

use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::EmployeeRef;
use crate::domain::entities::Employee;

pub trait ToTermTree {
    fn to_term_tree(&self) -> Tree<String>;
}

impl ToTermTree for EmployeeRef<'_> {
    #[instrument(level = "trace", skip(self), fields(id = self.id()))]
    fn to_term_tree(&self) -> Tree<String> {
        let leaves: Vec<_> = self.subordinates().map(|s| s.to_term_tree()).collect();
        Tree::new(self.data().to_string()).with_leaves(leaves)
    }
}

impl ToTermTree for Employee {
    fn to_term_tree(&self) -> Tree<String> {
        let leaves: Vec<_> = self.subordinates.iter().map(|s| s.to_term_tree()).collect();
        Tree::new(format!("{} ({})", self.name, self.id)).with_leaves(leaves)
    }
}
