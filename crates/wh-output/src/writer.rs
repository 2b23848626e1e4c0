//! The `OutputWriter` trait implemented by all backend writers.

use wh_sim::SimulationState;

use crate::{OutputResult, TickSummaryRow};

/// Trait implemented by the CSV and JSON-lines writers.
///
/// Errors surface to the observer, which keeps the first one for
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one snapshot of the whole simulation.
    fn write_state(&mut self, state: &SimulationState) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
