//! The externally visible simulation snapshot.

use serde::{Deserialize, Serialize};

use wh_core::{Position, RobotId, Step};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotPosition {
    pub id:  RobotId,
    pub pos: Position,
}

/// What a polling client sees: whether the run is active, the step counter,
/// every robot's cell (ascending id), and the targets of all open tasks in
/// pool order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    pub running:         bool,
    pub step:            Step,
    pub robot_positions: Vec<RobotPosition>,
    pub targets:         Vec<Position>,
}

impl SimulationState {
    pub fn position_of(&self, robot: RobotId) -> Option<Position> {
        self.robot_positions.iter().find(|r| r.id == robot).map(|r| r.pos)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
