//! Plain data row types written by output backends.

use wh_sim::{SimulationState, TickReport};

/// One robot's cell at a given step.
///
/// `row` and `col` follow the map's `map_data[row][col]` indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotSnapshotRow {
    pub robot_id: u32,
    pub step:     u64,
    pub row:      i32,
    pub col:      i32,
}

impl RobotSnapshotRow {
    /// One row per robot in `state`, ascending id.
    pub fn from_state(state: &SimulationState) -> Vec<RobotSnapshotRow> {
        state
            .robot_positions
            .iter()
            .map(|r| RobotSnapshotRow {
                robot_id: r.id.0,
                step:     state.step.0,
                row:      r.pos.y,
                col:      r.pos.x,
            })
            .collect()
    }
}

/// Summary counters for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    /// The step the tick started at.
    pub step:            u64,
    pub moved:           u64,
    pub waited:          u64,
    pub conflicts:       u64,
    pub oracle_failures: u64,
    pub completed:       u64,
    pub assigned:        u64,
}

impl From<&TickReport> for TickSummaryRow {
    fn from(report: &TickReport) -> Self {
        Self {
            step:            report.step.0,
            moved:           report.moved as u64,
            waited:          report.waited as u64,
            conflicts:       report.blocked.len() as u64,
            oracle_failures: report.oracle_failures.len() as u64,
            completed:       report.completed.len() as u64,
            assigned:        report.assigned.len() as u64,
        }
    }
}
