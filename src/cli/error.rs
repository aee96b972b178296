//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{failed} of {total} session requests failed")]
    SessionFailed { failed: usize, total: usize },

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::SessionFailed { .. } => crate::exitcode::DATAERR,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(DomainError::EntityNotFound { .. }) => {
                        crate::exitcode::NOTFOUND
                    }
                    ApplicationError::Domain(_) | ApplicationError::Parse { .. } => {
                        crate::exitcode::DATAERR
                    }
                    ApplicationError::InvalidRequest(_) | ApplicationError::NoChart => {
                        crate::exitcode::USAGE
                    }
                    ApplicationError::ChartNotFound(_) => crate::exitcode::NOINPUT,
                    ApplicationError::UnsupportedFormat(_) => crate::exitcode::DATAERR,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn exit_codes_follow_error_kind() {
        let not_found: CliError =
            ApplicationError::from(DomainError::employee_not_found(9)).into();
        assert_eq!(not_found.exit_code(), crate::exitcode::NOTFOUND);

        let missing: CliError = ApplicationError::ChartNotFound(PathBuf::from("org.json")).into();
        assert_eq!(missing.exit_code(), crate::exitcode::NOINPUT);

        assert_eq!(
            CliError::Usage("no command".into()).exit_code(),
            crate::exitcode::USAGE
        );

        let session = CliError::SessionFailed { failed: 1, total: 3 };
        assert_eq!(session.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(session.to_string(), "1 of 3 session requests failed");
    }

    #[test]
    fn display_passes_domain_message_through() {
        let err: CliError = ApplicationError::from(DomainError::supervisor_not_found(4)).into();
        assert_eq!(err.to_string(), "supervisor not found: 4");
    }
}
