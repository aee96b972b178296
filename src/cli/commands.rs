//! Command dispatch

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{ChartRequest, ChartResponse, ChartService, MOVE_SUCCESS};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{EmployeeId, ToTermTree};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `orgchart --help`".to_string(),
        ));
    };

    let config_dir = resolve_config_dir(cli)?;
    let settings = Settings::load(Some(&config_dir))?;
    let container = ServiceContainer::new(settings);
    let chart = cli.chart.as_deref();

    match command {
        Commands::Show => cmd_show(&container, chart),
        Commands::Find { id } => cmd_find(&container, chart, *id),
        Commands::Supervisor { id } => cmd_supervisor(&container, chart, *id),
        Commands::Move {
            employee,
            supervisor,
        } => cmd_move(&container, chart, *employee, *supervisor),
        Commands::Session { script } => cmd_session(&container, chart, script.as_deref()),
        Commands::Config { command } => cmd_config(&container, &config_dir, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

fn resolve_config_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e).into()),
    }
}

#[instrument(level = "debug", skip(container))]
fn cmd_show(container: &ServiceContainer, chart: Option<&Path>) -> CliResult<()> {
    let service = container.chart_service(chart)?;
    let org = service.chart();
    output::header(&format!(
        "{} employees, {} levels",
        org.headcount(),
        org.depth()
    ));
    output::info(&service.ceo().to_term_tree());
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_find(container: &ServiceContainer, chart: Option<&Path>, id: EmployeeId) -> CliResult<()> {
    let service = container.chart_service(chart)?;
    let employee = service.find(id)?;
    output::info(&employee.to_term_tree());
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_supervisor(
    container: &ServiceContainer,
    chart: Option<&Path>,
    id: EmployeeId,
) -> CliResult<()> {
    let service = container.chart_service(chart)?;
    let employee = service.find(id)?;
    match service.chart().find_supervisor(id) {
        Some(supervisor) => output::action("supervisor", supervisor.data()),
        None => output::warning(&format!(
            "{} ({}) has no supervisor",
            employee.name, employee.id
        )),
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_move(
    container: &ServiceContainer,
    chart: Option<&Path>,
    employee: EmployeeId,
    supervisor: EmployeeId,
) -> CliResult<()> {
    let mut service = container.chart_service(chart)?;
    service.move_employee(employee, supervisor)?;
    output::success(MOVE_SUCCESS);
    output::info(&service.ceo().to_term_tree());
    Ok(())
}

/// Runs one request per line against a single chart; prints one JSON body
/// per request. Blank lines and `#` comments are skipped.
///
/// Every line is attempted; the session fails afterwards if any request
/// got an error body.
#[instrument(level = "debug", skip(container))]
fn cmd_session(
    container: &ServiceContainer,
    chart: Option<&Path>,
    script: Option<&Path>,
) -> CliResult<()> {
    let mut service = container.chart_service(chart)?;
    let reader: Box<dyn BufRead> = match script {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| InfraError::io(format!("open script {}", path.display()), e))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut failed = 0usize;
    let mut total = 0usize;
    for line in reader.lines() {
        let line = line.map_err(|e| InfraError::io("read session input", e))?;
        if let Some(response) = run_session_line(&mut service, &line) {
            total += 1;
            if !response.is_success() {
                failed += 1;
            }
            output::info(&response.to_json());
        }
    }
    debug!(failed, total, undo_depth = service.chart().undo_depth(), "session finished");
    if failed > 0 {
        return Err(CliError::SessionFailed { failed, total });
    }
    Ok(())
}

/// `None` for lines that carry no request.
pub fn run_session_line(service: &mut ChartService, line: &str) -> Option<ChartResponse> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let response = match trimmed.parse::<ChartRequest>() {
        Ok(request) => service.handle(request),
        Err(e) => ChartResponse::error(e),
    };
    Some(response)
}

fn cmd_config(
    container: &ServiceContainer,
    config_dir: &Path,
    command: &ConfigCommands,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            output::action("local", &local_config_path(config_dir).display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChartOptions, Employee};

    fn service() -> ChartService {
        let ceo = Employee::new(1, "CEO")
            .with_subordinates(vec![Employee::new(2, "A"), Employee::new(3, "B")]);
        ChartService::from_employee(&ceo, ChartOptions::default()).unwrap()
    }

    #[test]
    fn session_line_skips_blank_and_comment_lines() {
        let mut service = service();
        assert!(run_session_line(&mut service, "   ").is_none());
        assert!(run_session_line(&mut service, "# setup").is_none());
    }

    #[test]
    fn session_line_reports_parse_errors_as_error_body() {
        let mut service = service();
        let response = run_session_line(&mut service, "promote 2").unwrap();
        assert_eq!(response.status(), 400);
    }

    fn session_container(script: &str) -> (tempfile::TempDir, ServiceContainer, PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let chart = dir.path().join("org.json");
        std::fs::write(
            &chart,
            r#"{"id":1,"name":"CEO","subordinates":[{"id":2,"name":"A"},{"id":3,"name":"B"}]}"#,
        )
        .unwrap();
        let script_path = dir.path().join("session.txt");
        std::fs::write(&script_path, script).unwrap();
        let settings = Settings {
            chart_file: Some(chart),
            ..Settings::default()
        };
        (dir, ServiceContainer::new(settings), script_path)
    }

    #[test]
    fn session_with_failed_request_reports_failure_count() {
        let (_dir, container, script) = session_container("move 2 3\nmove 9 1\nundo\n");

        let err = cmd_session(&container, None, Some(&script)).unwrap_err();

        assert!(matches!(err, CliError::SessionFailed { failed: 1, total: 3 }));
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn session_without_failures_succeeds() {
        let (_dir, container, script) = session_container("# setup\nmove 2 3\nundo\nredo\n");
        assert!(cmd_session(&container, None, Some(&script)).is_ok());
    }

    #[test]
    fn session_line_applies_move() {
        let mut service = service();
        let response = run_session_line(&mut service, "move 2 3").unwrap();
        assert_eq!(response, ChartResponse::message(MOVE_SUCCESS));
        assert_eq!(service.ceo().subordinate_ids(), vec![3]);
    }
}
