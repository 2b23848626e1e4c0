//! Integration tests for wh-output.

use tempfile::TempDir;

use wh_core::{Position, RobotId, Step};
use wh_sim::{RobotPosition, SimulationState};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn state(step: u64) -> SimulationState {
    SimulationState {
        running:         true,
        step:            Step(step),
        robot_positions: vec![
            RobotPosition { id: RobotId(1), pos: Position::new(2, 5) },
            RobotPosition { id: RobotId(4), pos: Position::new(7, 1) },
        ],
        targets:         vec![Position::new(3, 3)],
    }
}

fn records(path: &std::path::Path) -> Vec<csv::StringRecord> {
    csv::Reader::from_path(path).unwrap().records().map(|r| r.unwrap()).collect()
}

#[cfg(test)]
mod csv_tests {
    use super::*;

    use crate::csv::CsvWriter;
    use crate::row::TickSummaryRow;
    use crate::writer::OutputWriter;

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("robot_snapshots.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("a");
        CsvWriter::new(&nested).unwrap();
        assert!(nested.join("robot_snapshots.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("robot_snapshots.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["robot_id", "step", "row", "col"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, [
            "step",
            "moved",
            "waited",
            "conflicts",
            "oracle_failures",
            "completed",
            "assigned"
        ]);
    }

    #[test]
    fn csv_state_rows_use_row_col() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_state(&state(5)).unwrap();
        w.finish().unwrap();

        let rows = records(&dir.path().join("robot_snapshots.csv"));
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1"); // robot_id
        assert_eq!(&rows[0][1], "5"); // step
        assert_eq!(&rows[0][2], "5"); // row = y
        assert_eq!(&rows[0][3], "2"); // col = x
        assert_eq!(&rows[1][0], "4");
    }

    #[test]
    fn csv_tick_summary_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let row = TickSummaryRow {
            step:            3,
            moved:           2,
            waited:          1,
            conflicts:       1,
            oracle_failures: 0,
            completed:       1,
            assigned:        0,
        };
        w.write_tick_summary(&row).unwrap();
        w.finish().unwrap();

        let rows = records(&dir.path().join("tick_summaries.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].iter().collect::<Vec<_>>(), ["3", "2", "1", "1", "0", "1", "0"]);
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_state_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_state(&SimulationState::default()).unwrap();
        w.finish().unwrap();
        assert!(records(&dir.path().join("robot_snapshots.csv")).is_empty());
    }
}

#[cfg(test)]
mod jsonl_tests {
    use super::*;

    use crate::jsonl::JsonLinesWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn one_state_per_line() {
        let dir = tmp();
        let mut w = JsonLinesWriter::new(dir.path()).unwrap();
        w.write_state(&state(1)).unwrap();
        w.write_state(&state(2)).unwrap();
        w.finish().unwrap();
        assert_eq!(w.lines(), 2);

        let text = std::fs::read_to_string(dir.path().join("states.jsonl")).unwrap();
        let states: Vec<SimulationState> = text
            .lines()
            .map(|line| SimulationState::from_json(line).unwrap())
            .collect();
        assert_eq!(states, vec![state(1), state(2)]);
        assert!(text.lines().next().unwrap().contains("\"robot_positions\""));
    }
}

#[cfg(test)]
mod observer_tests {
    use super::*;

    use wh_core::{Connectivity, SimConfig};
    use wh_layout::Layout;
    use wh_oracle::PathfindingOracle;
    use wh_sim::{SimBuilder, SimObserver, SimStats, TickReport};

    use crate::{
        CsvWriter, JsonLinesWriter, OutputError, OutputResult, OutputWriter, SimOutputObserver,
        TickSummaryRow,
    };

    fn sim_config() -> SimConfig {
        SimConfig {
            max_in_flight:           Some(2),
            snapshot_interval_steps: 2,
            max_steps:               Some(6),
            ..SimConfig::default()
        }
    }

    fn layout() -> Layout {
        Layout::default_layout()
            .with_robot(1, Position::new(1, 1))
            .with_robot(2, Position::new(5, 5))
            .with_task("A", Position::new(4, 1))
    }

    #[test]
    fn integration_csv() {
        let dir = tmp();
        let mut sim = SimBuilder::new(sim_config(), PathfindingOracle::new(Connectivity::Four))
            .layout(layout())
            .build()
            .unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        // 6 ticks, snapshots at steps 2, 4, 6 with 2 robots each.
        let snaps = records(&dir.path().join("robot_snapshots.csv"));
        assert_eq!(snaps.len(), 6);
        assert_eq!(&snaps[0][1], "2");
        let summaries = records(&dir.path().join("tick_summaries.csv"));
        assert_eq!(summaries.len(), 6);
        assert_eq!(&summaries[0][0], "0");
        // Robot 1 reaches (4, 1) on the third tick.
        assert_eq!(&summaries[2][5], "1");
    }

    #[test]
    fn integration_jsonl() {
        let dir = tmp();
        let mut sim = SimBuilder::new(sim_config(), PathfindingOracle::default())
            .layout(layout())
            .build()
            .unwrap();
        let mut obs = SimOutputObserver::new(JsonLinesWriter::new(dir.path()).unwrap());
        sim.run(&mut obs).unwrap();
        assert_eq!(obs.into_writer().lines(), 3);

        let text = std::fs::read_to_string(dir.path().join("states.jsonl")).unwrap();
        let last = SimulationState::from_json(text.lines().last().unwrap()).unwrap();
        assert_eq!(last.step, Step(6));
        assert_eq!(last.position_of(RobotId(1)), Some(Position::new(4, 1)));
        assert!(last.targets.is_empty());
    }

    /// Fails every write after the first `ok` calls.
    struct Flaky {
        ok:    u32,
        calls: u32,
    }

    impl Flaky {
        fn call(&mut self, what: &str) -> OutputResult<()> {
            self.calls += 1;
            if self.calls > self.ok {
                Err(OutputError::Io(std::io::Error::other(format!("{what} #{}", self.calls))))
            } else {
                Ok(())
            }
        }
    }

    impl OutputWriter for Flaky {
        fn write_state(&mut self, _state: &SimulationState) -> OutputResult<()> {
            self.call("state")
        }

        fn write_tick_summary(&mut self, _row: &TickSummaryRow) -> OutputResult<()> {
            self.call("summary")
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.call("finish")
        }
    }

    #[test]
    fn first_error_is_kept() {
        let mut obs = SimOutputObserver::new(Flaky { ok: 1, calls: 0 });
        obs.on_tick_end(&TickReport::default());
        obs.on_snapshot(&state(1));
        obs.on_sim_end(Step(1), &SimStats::default());

        let err = obs.take_error().unwrap();
        assert!(err.to_string().contains("state #2"), "{err}");
        assert!(obs.take_error().is_none());
    }
}
