//! Simulation and decision-service configuration.
//!
//! Both structs deserialize from JSON with every field optional; missing
//! fields take the values in the `Default` impls.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Connectivity, CoreError, CoreResult};

// ── OracleConfig ──────────────────────────────────────────────────────────────

/// How to reach the external decision service and how hard to try.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Base URL of the decision service.
    pub endpoint: String,

    /// Per-request timeout.  A tick is bounded by roughly one timeout, not
    /// by the number of robots.
    pub timeout_ms: u64,

    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,

    /// Delay before the first retry; doubled on each further retry.
    pub backoff_ms: u64,

    /// Upper bound for a single backoff delay.
    pub max_backoff_ms: u64,

    /// Id the service expects for the engine's robot 1.  Engine ids start
    /// at 1; set 0 for a service that numbers its robots from 0.
    pub first_robot_id: u32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint:       "http://127.0.0.1:8000".to_owned(),
            timeout_ms:     3_000,
            max_retries:    2,
            backoff_ms:     50,
            max_backoff_ms: 500,
            first_robot_id: 1,
        }
    }
}

impl OracleConfig {
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[inline]
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    #[inline]
    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the simulation builder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Four- or eight-neighbour movement.
    pub connectivity: Connectivity,

    /// Cap on simultaneous outbound oracle requests per tick.  `None` uses
    /// one worker per logical core.
    pub max_in_flight: Option<usize>,

    /// Emit `on_snapshot` every N steps.  1 = every step.
    pub snapshot_interval_steps: u64,

    /// `run` stops by itself once this many steps have been committed.
    /// `None` runs until stopped.
    pub max_steps: Option<u64>,

    pub oracle: OracleConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            connectivity:            Connectivity::Four,
            max_in_flight:           None,
            snapshot_interval_steps: 1,
            max_steps:               None,
            oracle:                  OracleConfig::default(),
        }
    }
}

impl SimConfig {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.oracle.timeout_ms == 0 {
            return Err(CoreError::Config("oracle.timeout_ms must be > 0".into()));
        }
        if self.oracle.max_backoff_ms < self.oracle.backoff_ms {
            return Err(CoreError::Config(
                "oracle.max_backoff_ms must be >= oracle.backoff_ms".into(),
            ));
        }
        if self.max_in_flight == Some(0) {
            return Err(CoreError::Config("max_in_flight must be > 0".into()));
        }
        if self.snapshot_interval_steps == 0 {
            return Err(CoreError::Config("snapshot_interval_steps must be > 0".into()));
        }
        if self.oracle.endpoint.trim().is_empty() {
            return Err(CoreError::Config("oracle.endpoint must not be empty".into()));
        }
        Ok(())
    }
}
