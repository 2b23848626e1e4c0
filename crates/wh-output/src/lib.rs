//! `wh-output`: simulation output writers for the warehouse simulation.
//!
//! Two backends are provided:
//!
//! | Writer              | Files created                                  |
//! |---------------------|------------------------------------------------|
//! | [`CsvWriter`]       | `robot_snapshots.csv`, `tick_summaries.csv`    |
//! | [`JsonLinesWriter`] | `states.jsonl` (one `SimulationState` per line) |
//!
//! Both implement [`OutputWriter`] and are driven by [`SimOutputObserver`],
//! which implements `wh_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wh_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod jsonl;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use jsonl::JsonLinesWriter;
pub use observer::SimOutputObserver;
pub use row::{RobotSnapshotRow, TickSummaryRow};
pub use writer::OutputWriter;
