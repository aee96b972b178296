//! Chart request relay
//!
//! Turns `move`/`undo`/`redo` requests into chart operations and answers with
//! the `{message}` / `{error}` bodies of the chart HTTP routes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{ChartOptions, DomainError, Employee, EmployeeId, EmployeeRef, OrgChart};

pub const MOVE_SUCCESS: &str = "Employee moved successfully";
pub const UNDO_SUCCESS: &str = "Undo successful";
pub const REDO_SUCCESS: &str = "Redo successful";

/// A single request against the chart.
///
/// JSON form: `{"op": "move", "employeeID": 2, "supervisorID": 3}`,
/// `{"op": "undo"}`, ... A body without `op` is the plain move route body
/// `{"employeeID": 2, "supervisorID": 3}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ChartRequest {
    Move {
        #[serde(rename = "employeeID")]
        employee_id: EmployeeId,
        #[serde(rename = "supervisorID")]
        supervisor_id: EmployeeId,
    },
    Undo,
    Redo,
    Show,
    Find {
        id: EmployeeId,
    },
    Supervisor {
        id: EmployeeId,
    },
}

/// Body of the move route, which carries no `op` field.
#[derive(Debug, Deserialize)]
struct MoveBody {
    #[serde(rename = "employeeID")]
    employee_id: EmployeeId,
    #[serde(rename = "supervisorID")]
    supervisor_id: EmployeeId,
}

impl From<MoveBody> for ChartRequest {
    fn from(body: MoveBody) -> Self {
        ChartRequest::Move {
            employee_id: body.employee_id,
            supervisor_id: body.supervisor_id,
        }
    }
}

fn parse_json(line: &str) -> ApplicationResult<ChartRequest> {
    let invalid = |e: serde_json::Error| ApplicationError::InvalidRequest(e.to_string());
    let value: serde_json::Value = serde_json::from_str(line).map_err(invalid)?;
    if value.get("op").is_some() {
        serde_json::from_value(value).map_err(invalid)
    } else {
        serde_json::from_value::<MoveBody>(value)
            .map(ChartRequest::from)
            .map_err(invalid)
    }
}

fn parse_id(word: Option<&str>, what: &str, line: &str) -> ApplicationResult<EmployeeId> {
    let word =
        word.ok_or_else(|| ApplicationError::InvalidRequest(format!("missing {what}: {line}")))?;
    word.parse().map_err(|_| {
        ApplicationError::InvalidRequest(format!("{what} is not an integer: {word}"))
    })
}

impl FromStr for ChartRequest {
    type Err = ApplicationError;

    /// Parses either a JSON object or a whitespace separated command such as
    /// `move 2 3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        if line.starts_with('{') {
            return parse_json(line);
        }

        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default().to_ascii_lowercase();
        let request = match command.as_str() {
            "move" => ChartRequest::Move {
                employee_id: parse_id(words.next(), "employee id", line)?,
                supervisor_id: parse_id(words.next(), "supervisor id", line)?,
            },
            "undo" => ChartRequest::Undo,
            "redo" => ChartRequest::Redo,
            "show" => ChartRequest::Show,
            "find" => ChartRequest::Find {
                id: parse_id(words.next(), "employee id", line)?,
            },
            "supervisor" => ChartRequest::Supervisor {
                id: parse_id(words.next(), "employee id", line)?,
            },
            "" => return Err(ApplicationError::InvalidRequest("empty request".into())),
            other => {
                return Err(ApplicationError::InvalidRequest(format!(
                    "unknown command: {other}"
                )))
            }
        };

        if let Some(extra) = words.next() {
            return Err(ApplicationError::InvalidRequest(format!(
                "unexpected argument: {extra}"
            )));
        }
        Ok(request)
    }
}

/// Response body. Serializes to exactly one of `{"message": ..}`,
/// `{"employee": ..}` or `{"error": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartResponse {
    Message { message: String },
    Employee { employee: Employee },
    Error { error: String },
}

impl ChartResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    pub fn error(error: impl ToString) -> Self {
        Self::Error {
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Error { .. })
    }

    /// HTTP-style status code of the response.
    pub fn status(&self) -> u16 {
        if self.is_success() {
            200
        } else {
            400
        }
    }

    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            // untagged enum of strings and plain structs cannot fail
            Err(e) => format!(r#"{{"error":"{}"}}"#, e),
        }
    }
}

/// Owns one chart and serializes every request against it.
#[derive(Debug)]
pub struct ChartService {
    chart: OrgChart,
}

impl ChartService {
    pub fn new(chart: OrgChart) -> Self {
        Self { chart }
    }

    pub fn from_employee(ceo: &Employee, options: ChartOptions) -> ApplicationResult<Self> {
        Ok(Self::new(OrgChart::with_options(ceo, options)?))
    }

    pub fn chart(&self) -> &OrgChart {
        &self.chart
    }

    /// Current root, for introspection.
    pub fn ceo(&self) -> EmployeeRef<'_> {
        self.chart.ceo()
    }

    pub fn move_employee(
        &mut self,
        employee_id: EmployeeId,
        supervisor_id: EmployeeId,
    ) -> ApplicationResult<()> {
        self.chart.move_employee(employee_id, supervisor_id)?;
        self.release_stale_versions();
        Ok(())
    }

    pub fn undo(&mut self) {
        self.chart.undo();
        self.release_stale_versions();
    }

    pub fn redo(&mut self) {
        self.chart.redo();
        self.release_stale_versions();
    }

    /// Compacts the arena once history has dropped records, so a long
    /// session holds only the versions it can still reach.
    fn release_stale_versions(&mut self) {
        let stale = self.chart.stale_records();
        if stale > 0 {
            let freed = self.chart.compact();
            debug!(stale, freed, nodes = self.chart.arena().len(), "released stale versions");
        }
    }

    pub fn find(&self, id: EmployeeId) -> ApplicationResult<Employee> {
        self.chart
            .find_employee(id)
            .map(|e| e.to_employee())
            .ok_or_else(|| DomainError::employee_not_found(id).into())
    }

    /// Supervisor of `id` as an owned subtree.
    pub fn supervisor(&self, id: EmployeeId) -> ApplicationResult<Employee> {
        self.find(id)?;
        self.chart
            .find_supervisor(id)
            .map(|e| e.to_employee())
            .ok_or_else(|| ApplicationError::InvalidRequest(format!("employee {id} has no supervisor")))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn handle(&mut self, request: ChartRequest) -> ChartResponse {
        let response = match request {
            ChartRequest::Move {
                employee_id,
                supervisor_id,
            } => match self.move_employee(employee_id, supervisor_id) {
                Ok(()) => ChartResponse::message(MOVE_SUCCESS),
                Err(e) => ChartResponse::error(e),
            },
            ChartRequest::Undo => {
                self.undo();
                ChartResponse::message(UNDO_SUCCESS)
            }
            ChartRequest::Redo => {
                self.redo();
                ChartResponse::message(REDO_SUCCESS)
            }
            ChartRequest::Show => ChartResponse::Employee {
                employee: self.chart.snapshot(),
            },
            ChartRequest::Find { id } => match self.find(id) {
                Ok(employee) => ChartResponse::Employee { employee },
                Err(e) => ChartResponse::error(e),
            },
            ChartRequest::Supervisor { id } => match self.supervisor(id) {
                Ok(employee) => ChartResponse::Employee { employee },
                Err(e) => ChartResponse::error(e),
            },
        };
        debug!(status = response.status(), "request handled");
        response
    }
}
