//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `robot_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;
use wh_sim::SimulationState;

use crate::writer::OutputWriter;
use crate::{OutputResult, RobotSnapshotRow, TickSummaryRow};

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut snapshots = Writer::from_path(dir.join("robot_snapshots.csv"))?;
        snapshots.write_record(["robot_id", "step", "row", "col"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record([
            "step",
            "moved",
            "waited",
            "conflicts",
            "oracle_failures",
            "completed",
            "assigned",
        ])?;

        Ok(Self { snapshots, summaries, finished: false })
    }

    /// Write pre-built snapshot rows.
    pub fn write_rows(&mut self, rows: &[RobotSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.robot_id.to_string(),
                row.step.to_string(),
                row.row.to_string(),
                row.col.to_string(),
            ])?;
        }
        Ok(())
    }
}

impl OutputWriter for CsvWriter {
    fn write_state(&mut self, state: &SimulationState) -> OutputResult<()> {
        self.write_rows(&RobotSnapshotRow::from_state(state))
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.step.to_string(),
            row.moved.to_string(),
            row.waited.to_string(),
            row.conflicts.to_string(),
            row.oracle_failures.to_string(),
            row.completed.to_string(),
            row.assigned.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
