//! Robot and task records held by the registry.

use std::fmt;

use serde::{Deserialize, Serialize};

use wh_core::{ItemId, Position, RobotId};

/// What a robot is currently doing with respect to the task pool.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "item")]
pub enum RobotState {
    /// No task assigned.
    #[default]
    Idle,
    /// Working on the given task.
    Assigned(ItemId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RobotRecord {
    pub id:       RobotId,
    pub position: Position,
    pub state:    RobotState,
}

impl RobotRecord {
    pub fn assignment(&self) -> Option<&ItemId> {
        match &self.state {
            RobotState::Idle => None,
            RobotState::Assigned(item) => Some(item),
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.state == RobotState::Idle
    }
}

// ── Tasks ─────────────────────────────────────────────────────────────────────

/// Lifecycle of a task: `Pending → Assigned → Completed`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "robot")]
pub enum TaskStatus {
    Pending,
    Assigned(RobotId),
    Completed(RobotId),
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => f.write_str("pending"),
            TaskStatus::Assigned(r) => write!(f, "assigned to {r}"),
            TaskStatus::Completed(r) => write!(f, "completed by {r}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRecord {
    pub item:   ItemId,
    pub target: Position,
    pub status: TaskStatus,
    /// Position of the task in the original pool; pending tasks are listed
    /// in this order.
    pub pool_index: usize,
}
