//! Cell → robot index of which cells are currently held.

use wh_core::{Position, RobotId};

#[cfg(not(feature = "fx-hash"))]
type CellMap = std::collections::HashMap<Position, RobotId>;
#[cfg(feature = "fx-hash")]
type CellMap = rustc_hash::FxHashMap<Position, RobotId>;

/// Which robot, if any, stands on each cell.
///
/// Owned by the registry and kept in lock-step with robot positions; the
/// grid only reads it through [`Grid::is_free`][crate::Grid::is_free].
#[derive(Clone, Debug, Default)]
pub struct Occupancy {
    cells: CellMap,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn occupant(&self, pos: Position) -> Option<RobotId> {
        self.cells.get(&pos).copied()
    }

    /// Mark `pos` as held by `robot`, returning the previous occupant.
    #[inline]
    pub fn insert(&mut self, pos: Position, robot: RobotId) -> Option<RobotId> {
        self.cells.insert(pos, robot)
    }

    /// Release `pos`, returning the robot that held it.
    #[inline]
    pub fn remove(&mut self, pos: Position) -> Option<RobotId> {
        self.cells.remove(&pos)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, RobotId)> + '_ {
        self.cells.iter().map(|(&p, &r)| (p, r))
    }
}
