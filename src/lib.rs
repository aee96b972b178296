//! Organization chart engine.
//!
//! A chart is a strict hierarchy: one CEO, everyone else with exactly one
//! supervisor. Employees can be moved under a new supervisor, and moves can be
//! undone (and, depending on [`domain::RedoPolicy`], redone).
//!
//! ```
//! use orgchart::domain::{Employee, OrgChart};
//!
//! let ceo = Employee::new(1, "CEO")
//!     .with_subordinates(vec![Employee::new(2, "A"), Employee::new(3, "B")]);
//! let mut chart = OrgChart::new(&ceo).unwrap();
//!
//! chart.move_employee(2, 3).unwrap();
//! assert_eq!(chart.ceo().subordinate_ids(), vec![3]);
//!
//! chart.undo();
//! assert_eq!(chart.snapshot(), ceo);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
