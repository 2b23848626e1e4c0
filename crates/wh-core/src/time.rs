//! Simulation time model.
//!
//! Time is a monotonically increasing `Step` counter.  Step 0 is the state
//! right after a layout is loaded; each committed tick advances it by one.
//! The counter survives stop/start, so pausing never rewinds it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// The step after `self`.
    #[inline]
    pub fn next(self) -> Step {
        Step(self.0 + 1)
    }

    /// `true` if this step falls on an `interval` boundary (interval 0 never
    /// matches).
    #[inline]
    pub fn is_on_interval(self, interval: u64) -> bool {
        interval > 0 && self.0.is_multiple_of(interval)
    }
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        Step(self.0 + rhs)
    }
}

impl std::ops::Sub for Step {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Step) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}
