//! The `ActionOracle` trait and the request passed to it.
//!
//! # Thread safety
//!
//! The step coordinator fans requests for one tick out over a worker pool,
//! so implementations must be `Send + Sync`.  Any per-robot state an oracle
//! keeps needs interior synchronisation.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use wh_core::{Position, RobotId, Step};
use wh_grid::Grid;

use crate::{Action, OracleResult};

// ── ActionRequest ─────────────────────────────────────────────────────────────

/// Everything an oracle is told about one robot for one tick.
#[derive(Copy, Clone, Debug)]
pub struct ActionRequest<'a> {
    pub robot:    RobotId,
    pub position: Position,
    /// Target of the robot's current assignment, if it has one.
    pub target:   Option<Position>,
    pub step:     Step,
    pub grid:     &'a Grid,
}

// ── Handshake and liveness replies ────────────────────────────────────────────

/// Result of [`ActionOracle::probe`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liveness {
    pub connected: bool,
    pub status:    Option<String>,
    pub error:     Option<String>,
}

impl Liveness {
    pub fn up(status: impl Into<String>) -> Self {
        Self { connected: true, status: Some(status.into()), error: None }
    }

    pub fn down(error: impl Into<String>) -> Self {
        Self { connected: false, status: None, error: Some(error.into()) }
    }
}

/// Reply to the one-time environment handshake.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InitAck {
    #[serde(default)]
    pub status: String,
    /// Robot count the service read from the layout, when it reports one.
    #[serde(default)]
    pub robots: Option<u32>,
}

// ── ActionOracle ──────────────────────────────────────────────────────────────

/// Source of per-robot actions.
pub trait ActionOracle: Send + Sync {
    /// Decide one action for `request.robot`.
    ///
    /// # Errors
    ///
    /// `Timeout`, `Transport` or `Unavailable` when the decision source
    /// cannot be reached, `Protocol` for an unusable reply.  The caller
    /// treats every error as `Wait` for this tick.
    fn request_action(&self, request: &ActionRequest<'_>) -> OracleResult<Action>;

    /// Report whether the decision source is reachable.  Never fails.
    fn probe(&self) -> Liveness {
        Liveness::up("in-process")
    }

    /// Hand the layout file to the decision source before the first tick.
    fn init_env(&self, _layout_path: &Path) -> OracleResult<InitAck> {
        Ok(InitAck { status: "success".to_owned(), robots: None })
    }
}

impl<T: ActionOracle + ?Sized> ActionOracle for Box<T> {
    fn request_action(&self, request: &ActionRequest<'_>) -> OracleResult<Action> {
        (**self).request_action(request)
    }

    fn probe(&self) -> Liveness {
        (**self).probe()
    }

    fn init_env(&self, layout_path: &Path) -> OracleResult<InitAck> {
        (**self).init_env(layout_path)
    }
}

impl<T: ActionOracle + ?Sized> ActionOracle for Arc<T> {
    fn request_action(&self, request: &ActionRequest<'_>) -> OracleResult<Action> {
        (**self).request_action(request)
    }

    fn probe(&self) -> Liveness {
        (**self).probe()
    }

    fn init_env(&self, layout_path: &Path) -> OracleResult<InitAck> {
        (**self).init_env(layout_path)
    }
}
