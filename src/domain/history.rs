//! Undo/redo stacks of chart versions.

use std::fmt;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// What `undo` does with the record it reverts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedoPolicy {
    /// Reverted records are discarded; the redo stack is never fed and
    /// `redo` never changes the chart.
    #[default]
    Inert,
    /// Reverted records move to the redo stack and `redo` re-applies them.
    /// A new move clears the redo stack.
    Symmetric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    Move,
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryKind::Move => write!(f, "move"),
        }
    }
}

/// Versions captured right before a move is applied.
///
/// Only `before` is needed to revert; the subtree versions are kept so a
/// record can be inspected after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Whole chart before the move
    pub before: Index,
    /// Subtree of the employee's supervisor at that time, None for the CEO
    pub previous_supervisor: Option<Index>,
    /// Subtree of the moved employee
    pub employee: Index,
    /// Subtree of the supervisor the employee was moved under
    pub target_supervisor: Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRecord {
    pub kind: HistoryKind,
    pub snapshot: Snapshot,
    /// Whole chart after the move
    pub after: Index,
}

impl HistoryRecord {
    pub fn moved(snapshot: Snapshot, after: Index) -> Self {
        Self {
            kind: HistoryKind::Move,
            snapshot,
            after,
        }
    }

    /// Every version this record keeps alive.
    pub fn versions(&self) -> impl Iterator<Item = Index> {
        let s = self.snapshot;
        [Some(s.before), s.previous_supervisor, Some(s.employee), Some(s.target_supervisor), Some(self.after)]
            .into_iter()
            .flatten()
    }
}

#[derive(Debug, Default)]
pub struct History {
    undo: Vec<HistoryRecord>,
    redo: Vec<HistoryRecord>,
    policy: RedoPolicy,
    /// Records dropped from both stacks since the last `clear_discarded`
    discarded: usize,
}

impl History {
    pub fn new(policy: RedoPolicy) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            policy,
            discarded: 0,
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn record(&mut self, record: HistoryRecord) {
        if self.policy == RedoPolicy::Symmetric && !self.redo.is_empty() {
            debug!(discarded = self.redo.len(), "new move clears redo stack");
            self.discarded += self.redo.len();
            self.redo.clear();
        }
        self.undo.push(record);
    }

    /// Pops the latest record and returns the version to restore.
    #[instrument(level = "debug", skip(self))]
    pub fn undo(&mut self) -> Option<Index> {
        let record = self.undo.pop()?;
        let restore = match record.kind {
            HistoryKind::Move => record.snapshot.before,
        };
        match self.policy {
            RedoPolicy::Symmetric => self.redo.push(record),
            RedoPolicy::Inert => self.discarded += 1,
        }
        Some(restore)
    }

    /// Pops the latest redo record, re-files it as undoable and returns the
    /// version to restore.
    #[instrument(level = "debug", skip(self))]
    pub fn redo(&mut self) -> Option<Index> {
        let record = self.redo.pop()?;
        let restore = match record.kind {
            HistoryKind::Move => record.after,
        };
        self.undo.push(record);
        Some(restore)
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn last_undo(&self) -> Option<&HistoryRecord> {
        self.undo.last()
    }

    /// Number of records dropped since the last [`History::clear_discarded`].
    /// Their versions may now be unreachable.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn clear_discarded(&mut self) {
        self.discarded = 0;
    }

    /// All versions referenced from either stack.
    pub fn versions(&self) -> impl Iterator<Item = Index> + '_ {
        self.undo
            .iter()
            .chain(self.redo.iter())
            .flat_map(HistoryRecord::versions)
    }
}
