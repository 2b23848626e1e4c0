//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use log::warn;
use wh_core::Step;
use wh_sim::{SimObserver, SimStats, SimulationState, TickReport};

use crate::row::TickSummaryRow;
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes snapshots and tick summaries to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  Needed after `run_ticks`, which has no end hook.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!("output write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, report: &TickReport) {
        let result = self.writer.write_tick_summary(&TickSummaryRow::from(report));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, state: &SimulationState) {
        let result = self.writer.write_state(state);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_step: Step, _stats: &SimStats) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
