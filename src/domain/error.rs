//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

use crate::domain::entities::EmployeeId;

/// Which side of a move an unresolved id was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRole {
    Employee,
    Supervisor,
}

impl fmt::Display for EntityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRole::Employee => write!(f, "employee"),
            EntityRole::Supervisor => write!(f, "supervisor"),
        }
    }
}

/// Domain errors represent violations of the chart's rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{role} not found: {id}")]
    EntityNotFound { role: EntityRole, id: EmployeeId },

    #[error("duplicate employee id: {0}")]
    DuplicateId(EmployeeId),

    #[error("cannot move employee {employee} under {supervisor}: supervisor is within the employee's subtree")]
    CycleDetected {
        employee: EmployeeId,
        supervisor: EmployeeId,
    },
}

impl DomainError {
    pub fn employee_not_found(id: EmployeeId) -> Self {
        Self::EntityNotFound {
            role: EntityRole::Employee,
            id,
        }
    }

    pub fn supervisor_not_found(id: EmployeeId) -> Self {
        Self::EntityNotFound {
            role: EntityRole::Supervisor,
            id,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
