//! Cross-thread control of a running simulation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::SimulationState;

struct Shared {
    running: AtomicBool,
    latest:  Mutex<SimulationState>,
}

/// A cloneable handle that can stop the simulation and read its most
/// recently published state from any thread.
///
/// `stop` only clears the running flag.  A tick already in progress still
/// commits; the driver checks the flag before starting the next one.
#[derive(Clone)]
pub struct SimHandle {
    shared: Arc<Shared>,
}

impl SimHandle {
    pub(crate) fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                running: AtomicBool::new(false),
                latest:  Mutex::new(SimulationState::default()),
            }),
        }
    }

    pub fn stop(&self) {
        self.shared.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// The state published at the end of the last tick (or load/start/stop),
    /// with `running` reflecting the flag as of now.
    pub fn latest_state(&self) -> SimulationState {
        let mut state = self.shared.latest.lock().unwrap_or_else(PoisonError::into_inner).clone();
        state.running = self.is_running();
        state
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.shared.running.store(running, Ordering::SeqCst);
    }

    pub(crate) fn publish(&self, state: SimulationState) {
        *self.shared.latest.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}
