//! Bounded retries with exponential backoff.
//!
//! # Jitter
//!
//! Each delay gets up to 50 % extra jitter drawn from a `SmallRng` seeded by
//! the robot id and the attempt number, so two runs with the same failures
//! sleep for the same durations while robots that fail together still spread
//! their retries apart.

use std::path::Path;
use std::thread;
use std::time::Duration;

use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use wh_core::{OracleConfig, RobotId};

use crate::{Action, ActionOracle, ActionRequest, InitAck, Liveness, OracleError, OracleResult};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── RetryPolicy ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries:     u32,
    pub initial_backoff: Duration,
    /// Growth factor between consecutive delays.
    pub multiplier:      u32,
    pub max_backoff:     Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&OracleConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &OracleConfig) -> Self {
        Self {
            max_retries:     config.max_retries,
            initial_backoff: config.backoff(),
            multiplier:      2,
            max_backoff:     config.max_backoff(),
        }
    }

    /// Fail on the first error.
    pub fn none() -> Self {
        Self {
            max_retries:     0,
            initial_backoff: Duration::ZERO,
            multiplier:      1,
            max_backoff:     Duration::ZERO,
        }
    }

    /// Delay before retry `attempt` (1-based) on behalf of `robot`.
    pub fn backoff(&self, robot: RobotId, attempt: u32) -> Duration {
        let initial_ms = millis(self.initial_backoff);
        let max_ms = millis(self.max_backoff);
        let growth = u64::from(self.multiplier).saturating_pow(attempt.saturating_sub(1));
        let base_ms = initial_ms.saturating_mul(growth).min(max_ms);

        let seed = u64::from(robot.0).wrapping_mul(MIXING_CONSTANT) ^ u64::from(attempt);
        let jitter_ms = SmallRng::seed_from_u64(seed).gen_range(0..=base_ms / 2);
        Duration::from_millis(base_ms.saturating_add(jitter_ms).min(max_ms))
    }
}

#[inline]
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

// ── RetryingOracle ────────────────────────────────────────────────────────────

/// Wraps another oracle and retries its transient failures.
///
/// After `max_retries` failed retries the error becomes
/// [`OracleError::Unavailable`].  Timeouts and protocol errors pass through
/// on the first occurrence.
pub struct RetryingOracle<O> {
    inner:  O,
    policy: RetryPolicy,
}

impl<O: ActionOracle> RetryingOracle<O> {
    pub fn new(inner: O, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: ActionOracle> ActionOracle for RetryingOracle<O> {
    fn request_action(&self, request: &ActionRequest<'_>) -> OracleResult<Action> {
        let mut retries = 0;
        loop {
            let err = match self.inner.request_action(request) {
                Ok(action) => return Ok(action),
                Err(e) => e,
            };
            if !err.is_transient() {
                return Err(err);
            }
            if retries >= self.policy.max_retries {
                warn!("{}: giving up after {} attempts: {err}", request.robot, retries + 1);
                return Err(OracleError::Unavailable {
                    robot:    request.robot,
                    attempts: retries + 1,
                    last:     err.to_string(),
                });
            }
            retries += 1;
            let delay = self.policy.backoff(request.robot, retries);
            debug!("{}: retry {retries} in {delay:?} after {err}", request.robot);
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }
    }

    fn probe(&self) -> Liveness {
        self.inner.probe()
    }

    fn init_env(&self, layout_path: &Path) -> OracleResult<InitAck> {
        self.inner.init_env(layout_path)
    }
}
