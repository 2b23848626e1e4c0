//! The `Layout` document: the durable load/save unit.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "layout_name": "new_warehouse",
//!   "grid_size": { "width": 20, "height": 20 },
//!   "map_data": [[1, 1, 1], [1, 0, 1], [1, 1, 1]],
//!   "robots": [{ "id": 1, "spawn_pos": [1, 1] }],
//!   "task_pool": [{ "item_id": "A-1", "pos": [3, 4] }]
//! }
//! ```
//!
//! Positions are `[row, col]`.  `map_data` has `height` rows of `width`
//! cell codes (see [`wh_grid::Cell`]).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use wh_core::{ItemId, Position, RobotId};
use wh_grid::{Cell, Grid, GridSize};

use crate::{LayoutError, LayoutResult};

/// Side length of the generated default layout.
pub const DEFAULT_SIDE: u32 = 20;

/// Name given to the generated default layout.
pub const DEFAULT_NAME: &str = "new_warehouse";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotSpec {
    pub id:        RobotId,
    pub spawn_pos: Position,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub item_id: ItemId,
    pub pos:     Position,
}

/// A warehouse definition: map, initial robots, and task pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub layout_name: String,
    pub grid_size:   GridSize,
    pub map_data:    Vec<Vec<i32>>,
    #[serde(default)]
    pub robots:      Vec<RobotSpec>,
    #[serde(default)]
    pub task_pool:   Vec<TaskSpec>,
}

impl Layout {
    /// A `side`×`side` map whose border cells are obstacles and whose interior
    /// is free, with no robots and no tasks.
    pub fn bordered(name: impl Into<String>, side: u32) -> Layout {
        let last = side.saturating_sub(1);
        let map_data = (0..side)
            .map(|y| {
                (0..side)
                    .map(|x| {
                        if y == 0 || y == last || x == 0 || x == last {
                            Cell::Obstacle.code()
                        } else {
                            Cell::Free.code()
                        }
                    })
                    .collect()
            })
            .collect();

        Layout {
            layout_name: name.into(),
            grid_size:   GridSize::new(side, side),
            map_data,
            robots:      Vec::new(),
            task_pool:   Vec::new(),
        }
    }

    /// The layout used when no layout file exists: 20×20, bordered.
    pub fn default_layout() -> Layout {
        Layout::bordered(DEFAULT_NAME, DEFAULT_SIDE)
    }

    /// Append a robot (builder style, unchecked until [`validate`][Self::validate]).
    pub fn with_robot(mut self, id: u32, spawn_pos: Position) -> Self {
        self.robots.push(RobotSpec { id: RobotId(id), spawn_pos });
        self
    }

    /// Append a task (builder style, unchecked until [`validate`][Self::validate]).
    pub fn with_task(mut self, item_id: impl Into<ItemId>, pos: Position) -> Self {
        self.task_pool.push(TaskSpec { item_id: item_id.into(), pos });
        self
    }

    /// Check the layout invariant and return the grid it describes.
    ///
    /// - the map matches `grid_size` and uses known cell codes;
    /// - robot ids are positive and unique, spawn cells distinct;
    /// - task item ids are unique;
    /// - every robot and task position is in bounds and traversable.
    pub fn validate(&self) -> LayoutResult<Grid> {
        let grid = Grid::from_rows(self.grid_size, &self.map_data)?;

        let mut ids = HashSet::with_capacity(self.robots.len());
        let mut spawns: HashSet<Position> = HashSet::with_capacity(self.robots.len());
        for robot in &self.robots {
            if !robot.id.is_valid() {
                return Err(LayoutError::InvalidRobotId(robot.id));
            }
            if !ids.insert(robot.id) {
                return Err(LayoutError::DuplicateRobot(robot.id));
            }
            check_position(&grid, robot.spawn_pos, || format!("spawn of {}", robot.id))?;
            if !spawns.insert(robot.spawn_pos) {
                return Err(LayoutError::SharedSpawn { robot: robot.id, pos: robot.spawn_pos });
            }
        }

        let mut items: HashSet<&ItemId> = HashSet::with_capacity(self.task_pool.len());
        for task in &self.task_pool {
            if !items.insert(&task.item_id) {
                return Err(LayoutError::DuplicateTask(task.item_id.clone()));
            }
            check_position(&grid, task.pos, || format!("target of task {}", task.item_id))?;
        }

        Ok(grid)
    }
}

fn check_position(
    grid: &Grid,
    pos:  Position,
    what: impl FnOnce() -> String,
) -> LayoutResult<()> {
    if !grid.in_bounds(pos) {
        return Err(LayoutError::OutOfBounds { what: what(), pos });
    }
    if !grid.is_traversable(pos) {
        return Err(LayoutError::Blocked { what: what(), pos });
    }
    Ok(())
}
