use thiserror::Error;

use wh_core::{ItemId, Position, RobotId};
use wh_grid::GridError;

use crate::TaskStatus;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown robot {0}")]
    InvalidRobot(RobotId),

    #[error("robot id 0 is reserved")]
    ZeroRobotId,

    #[error("robot {0} already exists")]
    DuplicateRobot(RobotId),

    #[error(transparent)]
    OutOfBounds(#[from] GridError),

    #[error("position {0} is not traversable")]
    InvalidPosition(Position),

    #[error("cell {pos} is occupied by {occupant}")]
    OccupiedCell { pos: Position, occupant: RobotId },

    #[error("{0} appears twice in one move batch")]
    DuplicateMove(RobotId),

    #[error("unknown task {0}")]
    UnknownTask(ItemId),

    #[error("task {0} already exists")]
    DuplicateTask(ItemId),

    #[error("task {item} is not available: {status}")]
    TaskUnavailable { item: ItemId, status: TaskStatus },

    #[error("task {item} cannot be completed: {status}")]
    InvalidTaskState { item: ItemId, status: TaskStatus },

    #[error("{robot} is already working on task {item}")]
    RobotBusy { robot: RobotId, item: ItemId },

    #[error("registry inconsistent: {0}")]
    Inconsistent(String),
}

impl RegistryError {
    /// `true` for the two flavours of bad position (outside the grid, or on
    /// a blocking cell).
    pub fn is_invalid_position(&self) -> bool {
        matches!(self, RegistryError::OutOfBounds(_) | RegistryError::InvalidPosition(_))
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
