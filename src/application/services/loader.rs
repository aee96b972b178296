//! Chart file loading
//!
//! Reads a chart from JSON (`{"id":1,"name":"..","subordinates":[..]}`) or
//! TOML (a `[ceo]` table with nested `[[ceo.subordinates]]`).

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Employee;
use crate::infrastructure::traits::FileSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Json,
    Toml,
}

impl ChartFormat {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> ApplicationResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(ChartFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(ChartFormat::Toml),
            _ => Err(ApplicationError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// TOML documents cannot have an array or table as an anonymous root.
#[derive(Debug, Deserialize)]
struct TomlChart {
    ceo: Employee,
}

/// Service for reading chart files.
pub struct ChartLoader {
    fs: Arc<dyn FileSystem>,
}

impl ChartLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Employee> {
        let format = ChartFormat::from_path(path)?;
        // Check file exists first - give clear error message
        if !self.fs.exists(path) {
            return Err(ApplicationError::ChartNotFound(path.to_path_buf()));
        }
        if !self.fs.is_file(path) {
            return Err(ApplicationError::Parse {
                path: path.to_path_buf(),
                message: "not a file".to_string(),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read chart", path)?;
        let ceo = Self::parse(&content, format).map_err(|message| ApplicationError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(ceo = ceo.id, headcount = ceo.headcount(), "chart loaded");
        Ok(ceo)
    }

    /// Parse chart content in the given format.
    pub fn parse(content: &str, format: ChartFormat) -> Result<Employee, String> {
        match format {
            ChartFormat::Json => Self::parse_json(content).map_err(|e| e.to_string()),
            ChartFormat::Toml => toml::from_str::<TomlChart>(content)
                .map(|doc| doc.ceo)
                .map_err(|e| e.to_string()),
        }
    }

    /// Every reporting level nests an object and a `subordinates` array, so
    /// serde_json's default recursion limit would cap charts at about 64
    /// levels. The limit is lifted and the stack grows on demand instead.
    fn parse_json(content: &str) -> serde_json::Result<Employee> {
        let mut json = serde_json::Deserializer::from_str(content);
        json.disable_recursion_limit();
        let ceo = Employee::deserialize(serde_stacker::Deserializer::new(&mut json))?;
        json.end()?;
        Ok(ceo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            ChartFormat::from_path(Path::new("org.JSON")).unwrap(),
            ChartFormat::Json
        );
        assert_eq!(
            ChartFormat::from_path(Path::new("org.toml")).unwrap(),
            ChartFormat::Toml
        );
        assert!(matches!(
            ChartFormat::from_path(Path::new("org.yaml")),
            Err(ApplicationError::UnsupportedFormat(p)) if p == PathBuf::from("org.yaml")
        ));
    }

    #[test]
    fn json_rejects_trailing_content() {
        let content = r#"{"id": 1, "name": "Ada"} {"id": 2, "name": "Bob"}"#;
        assert!(ChartLoader::parse(content, ChartFormat::Json).is_err());
    }

    #[test]
    fn parses_nested_toml() {
        let content = r#"
[ceo]
id = 1
name = "Ada"

[[ceo.subordinates]]
id = 2
name = "Bob"

[[ceo.subordinates]]
id = 3
name = "Cy"
"#;
        let ceo = ChartLoader::parse(content, ChartFormat::Toml).unwrap();
        assert_eq!(ceo.subordinate_ids(), vec![2, 3]);
    }
}
