//! Error conversion helpers for I/O performed by services
//!
//! Attaches the action and path to an `io::Error` so messages read
//! `operation failed: read chart: org.json`.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// # Example
    /// ```ignore
    /// let content = fs.read_to_string(&path)
    ///     .with_path_context("read chart", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_names_action_and_path() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result
            .with_path_context("read chart", Path::new("org.json"))
            .unwrap_err();
        assert_eq!(err.to_string(), "operation failed: read chart: org.json");
    }
}
