//! Simulation observer trait for progress reporting and data collection.

use wh_core::{RobotId, Step};
use wh_oracle::OracleError;

use crate::{SimStats, SimulationState, TickReport};

/// Callbacks invoked by [`Simulation`][crate::Simulation] at key points in
/// the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, report: &TickReport) {
///         if report.step.0 % self.interval == 0 {
///             println!("{}: {} moved, {} waited", report.step, report.moved, report.waited);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any oracle request.
    fn on_tick_start(&mut self, _step: Step) {}

    /// Called once per robot whose oracle request failed this tick.  The
    /// robot waits instead.
    fn on_oracle_failure(&mut self, _step: Step, _robot: RobotId, _error: &OracleError) {}

    /// Called after the tick's moves and task updates are committed.
    fn on_tick_end(&mut self, _report: &TickReport) {}

    /// Called every `config.snapshot_interval_steps` steps with the state as
    /// of the end of the tick.
    fn on_snapshot(&mut self, _state: &SimulationState) {}

    /// Called once when [`Simulation::run`][crate::Simulation::run] returns
    /// normally.
    fn on_sim_end(&mut self, _final_step: Step, _stats: &SimStats) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
