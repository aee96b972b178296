//! The organization chart: live version, baseline, and move history.

use std::iter;

use generational_arena::Index;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::domain::arena::{EmployeeRef, OrgArena};
use crate::domain::entities::{Employee, EmployeeId};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::history::{History, HistoryRecord, RedoPolicy, Snapshot};

/// Handling of moves that would put an employee under its own subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePolicy {
    /// Apply the move unchecked. The employee subtree drops out of the
    /// chart (or, for the CEO, gets duplicated).
    #[default]
    Allow,
    /// Refuse with [`DomainError::CycleDetected`].
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub redo: RedoPolicy,
    pub cycle_guard: CyclePolicy,
}

#[derive(Debug)]
pub struct OrgChart {
    arena: OrgArena,
    /// Version the chart was constructed with, never replaced
    original: Index,
    /// Live version
    current: Index,
    history: History,
    options: ChartOptions,
}

impl OrgChart {
    pub fn new(ceo: &Employee) -> DomainResult<Self> {
        Self::with_options(ceo, ChartOptions::default())
    }

    #[instrument(level = "debug", skip(ceo), fields(ceo = ceo.id))]
    pub fn with_options(ceo: &Employee, options: ChartOptions) -> DomainResult<Self> {
        if let Some(duplicate) = ceo.ids().into_iter().duplicates().next() {
            return Err(DomainError::DuplicateId(duplicate));
        }

        let mut arena = OrgArena::new();
        let root = arena.insert_tree(ceo);
        debug!(nodes = arena.len(), "chart initialized");

        Ok(Self {
            arena,
            original: root,
            current: root,
            history: History::new(options.redo),
            options,
        })
    }

    pub fn options(&self) -> ChartOptions {
        self.options
    }

    pub fn arena(&self) -> &OrgArena {
        &self.arena
    }

    /// Root of the live chart.
    pub fn ceo(&self) -> EmployeeRef<'_> {
        self.view(self.current)
    }

    /// Root of the chart as it was constructed.
    pub fn original(&self) -> EmployeeRef<'_> {
        self.view(self.original)
    }

    /// Deep copy of the live chart.
    pub fn snapshot(&self) -> Employee {
        self.ceo().to_employee()
    }

    pub fn current_version(&self) -> Index {
        self.current
    }

    fn view(&self, idx: Index) -> EmployeeRef<'_> {
        match self.arena.employee(idx) {
            Some(employee) => employee,
            // versions held by the chart survive compaction
            None => unreachable!("chart version {idx:?} missing from arena"),
        }
    }

    pub fn find_employee(&self, id: EmployeeId) -> Option<EmployeeRef<'_>> {
        self.arena
            .find_employee(self.current, id)
            .and_then(|idx| self.arena.employee(idx))
    }

    pub fn find_supervisor(&self, id: EmployeeId) -> Option<EmployeeRef<'_>> {
        self.arena
            .find_supervisor(self.current, id)
            .and_then(|idx| self.arena.employee(idx))
    }

    pub fn headcount(&self) -> usize {
        self.arena.iter_preorder(self.current).count()
    }

    pub fn depth(&self) -> usize {
        self.arena.depth(self.current)
    }

    /// Records the live chart and the subtrees involved in moving `employee`
    /// under `target_supervisor`.
    ///
    /// `None` if `employee` is not a node of the arena.
    #[instrument(level = "trace", skip(self))]
    pub fn capture_snapshot(&self, employee: Index, target_supervisor: Index) -> Option<Snapshot> {
        let employee_id = self.arena.get_node(employee)?.data.id;
        Some(Snapshot {
            before: self.current,
            previous_supervisor: self.arena.find_supervisor(self.current, employee_id),
            employee,
            target_supervisor,
        })
    }

    /// Reparents `employee_id` under `supervisor_id`, appending it as the
    /// supervisor's last subordinate.
    ///
    /// # Errors
    /// [`DomainError::EntityNotFound`] if either id is not in the live chart,
    /// [`DomainError::CycleDetected`] under [`CyclePolicy::Reject`] when the
    /// supervisor lies in the employee's subtree. The chart is unchanged on
    /// error.
    #[instrument(level = "debug", skip(self))]
    pub fn move_employee(
        &mut self,
        employee_id: EmployeeId,
        supervisor_id: EmployeeId,
    ) -> DomainResult<()> {
        let employee = self
            .arena
            .find_employee(self.current, employee_id)
            .ok_or_else(|| DomainError::employee_not_found(employee_id))?;
        let supervisor = self
            .arena
            .find_employee(self.current, supervisor_id)
            .ok_or_else(|| DomainError::supervisor_not_found(supervisor_id))?;

        if self.options.cycle_guard == CyclePolicy::Reject
            && self.arena.contains(employee, supervisor_id)
        {
            return Err(DomainError::CycleDetected {
                employee: employee_id,
                supervisor: supervisor_id,
            });
        }

        let snapshot = self
            .capture_snapshot(employee, supervisor)
            .ok_or_else(|| DomainError::employee_not_found(employee_id))?;

        let mut version = self.current;
        let previous_id = snapshot
            .previous_supervisor
            .and_then(|previous| self.arena.get_node(previous))
            .map(|node| node.data.id);
        if let Some(previous_id) = previous_id {
            if let Some(detached) = self.arena.edit_subordinates(version, previous_id, |arena, subs| {
                subs.iter()
                    .copied()
                    .filter(|&child| {
                        arena
                            .get_node(child)
                            .map_or(true, |node| node.data.id != employee_id)
                    })
                    .collect()
            }) {
                version = detached;
            }
        }

        match self.arena.edit_subordinates(version, supervisor_id, |_, subs| {
            subs.iter().copied().chain(iter::once(employee)).collect()
        }) {
            Some(attached) => version = attached,
            None => warn!(
                employee_id,
                supervisor_id, "supervisor was inside the moved subtree; subtree dropped from chart"
            ),
        }

        self.current = version;
        self.history.record(HistoryRecord::moved(snapshot, version));
        info!(employee_id, supervisor_id, "employee moved");
        Ok(())
    }

    /// Restores the chart as it was before the latest move.
    ///
    /// Returns false, leaving the chart untouched, if there is nothing to undo.
    #[instrument(level = "debug", skip(self))]
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(version) => {
                self.current = version;
                info!(pending = self.history.undo_depth(), "undo applied");
                true
            }
            None => {
                debug!("nothing to undo");
                false
            }
        }
    }

    /// Re-applies the latest undone move.
    ///
    /// Under [`RedoPolicy::Inert`] the redo stack is never fed, so this
    /// always returns false.
    #[instrument(level = "debug", skip(self))]
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(version) => {
                self.current = version;
                info!(pending = self.history.redo_depth(), "redo applied");
                true
            }
            None => {
                debug!("nothing to redo");
                false
            }
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    pub fn last_undo(&self) -> Option<&HistoryRecord> {
        self.history.last_undo()
    }

    /// Deep copy of any version or subtree referenced by a history record.
    pub fn materialize(&self, version: Index) -> Option<Employee> {
        self.arena.materialize(version)
    }

    /// Number of history records dropped since the last [`OrgChart::compact`].
    /// Non-zero means the arena may hold unreachable versions.
    pub fn stale_records(&self) -> usize {
        self.history.discarded()
    }

    /// Frees arena nodes no longer reachable from the live chart, the
    /// original chart, or the history. Returns the number of nodes freed.
    #[instrument(level = "debug", skip(self))]
    pub fn compact(&mut self) -> usize {
        let roots: Vec<Index> = [self.current, self.original]
            .into_iter()
            .chain(self.history.versions())
            .collect();
        self.history.clear_discarded();
        self.arena.retain_reachable(&roots)
    }
}
