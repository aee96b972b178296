//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod chart;
pub mod display;
pub mod entities;
pub mod error;
pub mod history;
pub mod traversal;

pub use arena::{EmployeeRef, NodeData, OrgArena, TreeNode};
pub use chart::{ChartOptions, CyclePolicy, OrgChart};
pub use display::ToTermTree;
pub use entities::*;
pub use error::{DomainError, DomainResult, EntityRole};
pub use history::{History, HistoryKind, HistoryRecord, RedoPolicy, Snapshot};
