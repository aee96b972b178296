//! Integration tests for reading chart files from disk.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use orgchart::application::services::ChartLoader;
use orgchart::application::ApplicationError;
use orgchart::config::Settings;
use orgchart::domain::{DomainError, Employee};
use orgchart::infrastructure::di::ServiceContainer;
use orgchart::infrastructure::traits::RealFileSystem;

const JSON_CHART: &str = r#"{
  "id": 1,
  "name": "CEO",
  "subordinates": [
    {"id": 2, "name": "A"},
    {"id": 3, "name": "B", "subordinates": []}
  ]
}"#;

const TOML_CHART: &str = r#"
[ceo]
id = 1
name = "CEO"

[[ceo.subordinates]]
id = 2
name = "A"

[[ceo.subordinates]]
id = 3
name = "B"
"#;

fn loader() -> ChartLoader {
    ChartLoader::new(Arc::new(RealFileSystem))
}

fn two_reports() -> Employee {
    Employee::new(1, "CEO").with_subordinates(vec![Employee::new(2, "A"), Employee::new(3, "B")])
}

#[rstest]
#[case::json("org.json", JSON_CHART)]
#[case::toml("org.toml", TOML_CHART)]
fn given_chart_file_when_loading_then_returns_tree(#[case] name: &str, #[case] content: &str) {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();

    // Act
    let ceo = loader().load(&path).unwrap();

    // Assert
    assert_eq!(ceo, two_reports());
}

#[test]
fn given_missing_file_when_loading_then_chart_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    let err = loader().load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::ChartNotFound(p) if p == path));
}

#[test]
fn given_directory_when_loading_then_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("charts.json");
    fs::create_dir(&path).unwrap();

    let err = loader().load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Parse { .. }), "{err}");
}

#[test]
fn given_unknown_extension_when_loading_then_unsupported_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("org.yaml");
    fs::write(&path, "id: 1").unwrap();

    let err = loader().load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::UnsupportedFormat(_)));
}

#[test]
fn given_malformed_json_when_loading_then_parse_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("org.json");
    fs::write(&path, r#"{"id": 1, "name": }"#).unwrap();

    let err = loader().load(&path).unwrap_err();

    assert!(matches!(&err, ApplicationError::Parse { path: p, .. } if *p == path));
    assert!(err.to_string().contains("org.json"));
}

#[test]
fn given_deep_reporting_chain_when_loading_json_then_keeps_every_level() {
    // Arrange: 1 <- 2 <- ... <- 300, each employee the only report of the previous
    let depth = 300;
    let chain = (1..depth).rev().fold(Employee::new(depth, format!("E{depth}")), |below, id| {
        Employee::new(id, format!("E{id}")).with_subordinates(vec![below])
    });
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chain.json");
    fs::write(&path, serde_json::to_string(&chain).unwrap()).unwrap();

    // Act
    let ceo = loader().load(&path).unwrap();

    // Assert
    assert_eq!(ceo.headcount(), depth as usize);
    assert_eq!(ceo, chain);
}

#[test]
fn given_duplicate_ids_when_opening_service_then_domain_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("org.json");
    fs::write(
        &path,
        r#"{"id": 1, "name": "CEO", "subordinates": [{"id": 1, "name": "Clone"}]}"#,
    )
    .unwrap();
    let container = ServiceContainer::new(Settings::default());

    let err = container.chart_service(Some(&path)).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::DuplicateId(1))
    ));
}

#[test]
fn given_configured_chart_file_when_opening_service_then_loads_it() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("org.toml");
    fs::write(&path, TOML_CHART).unwrap();
    let settings = Settings {
        chart_file: Some(PathBuf::from(&path)),
        ..Settings::default()
    };

    let service = ServiceContainer::new(settings).chart_service(None).unwrap();

    assert_eq!(service.chart().snapshot(), two_reports());
}
