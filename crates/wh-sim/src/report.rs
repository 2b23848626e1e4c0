//! Per-tick reports and cumulative counters.

use serde::Serialize;

use wh_core::{ItemId, Position, RobotId, Step};
use wh_oracle::Action;

/// Why a proposed move was turned into a wait.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ConflictKind {
    /// Off the grid, onto a blocking cell, a diagonal under four-neighbour
    /// movement, or a diagonal cutting past a blocking corner.
    Invalid,
    /// Another robot with a lower id wanted the same cell.
    Contested { winner: RobotId },
    /// Two diagonals crossing through the same 2×2 block.
    Crossing { winner: RobotId },
    /// Two robots trying to trade cells.
    Swap { with: RobotId },
    /// The target cell is held by a robot that is not leaving it.
    Blocked { by: RobotId },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub robot:  RobotId,
    pub from:   Position,
    pub wanted: Position,
    #[serde(flatten)]
    pub kind:   ConflictKind,
}

/// Outcome of one committed tick.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// The step the tick was computed at; the simulation is at `step + 1`
    /// afterwards.
    pub step:            Step,
    pub moved:           usize,
    /// Robots that ended the tick where they started, for any reason.
    pub waited:          usize,
    pub blocked:         Vec<Conflict>,
    pub oracle_failures: Vec<RobotId>,
    pub completed:       Vec<(RobotId, ItemId)>,
    pub assigned:        Vec<(RobotId, ItemId)>,
    /// The action each robot ended up with, after fallbacks, ascending id.
    pub actions:         Vec<(RobotId, Action)>,
}

/// Totals since the simulation was built.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    pub ticks:           u64,
    pub moves:           u64,
    pub waits:           u64,
    pub conflicts:       u64,
    pub oracle_failures: u64,
    pub tasks_assigned:  u64,
    pub tasks_completed: u64,
}

impl SimStats {
    pub(crate) fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.moves += report.moved as u64;
        self.waits += report.waited as u64;
        self.conflicts += report.blocked.len() as u64;
        self.oracle_failures += report.oracle_failures.len() as u64;
        self.tasks_assigned += report.assigned.len() as u64;
        self.tasks_completed += report.completed.len() as u64;
    }
}
