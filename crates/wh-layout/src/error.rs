use thiserror::Error;

use wh_core::{ItemId, Position, RobotId};
use wh_grid::GridError;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout {0:?} not found")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("layout parse error: {0}")]
    Parse(String),

    #[error("invalid map: {0}")]
    Grid(#[from] GridError),

    #[error("robot id {0} is reserved; ids must be positive")]
    InvalidRobotId(RobotId),

    #[error("duplicate robot {0}")]
    DuplicateRobot(RobotId),

    #[error("{robot} spawns on {pos}, which another robot already uses")]
    SharedSpawn { robot: RobotId, pos: Position },

    #[error("duplicate task item {0}")]
    DuplicateTask(ItemId),

    #[error("{what} at {pos} is outside the grid")]
    OutOfBounds { what: String, pos: Position },

    #[error("{what} at {pos} is on a blocked cell")]
    Blocked { what: String, pos: Position },
}

pub type LayoutResult<T> = Result<T, LayoutError>;
