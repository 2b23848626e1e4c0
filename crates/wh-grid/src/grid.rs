//! The `Grid`: warehouse map dimensions and per-cell kinds.

use serde::{Deserialize, Serialize};

use wh_core::{Direction, Position};

use crate::{GridError, GridResult, Occupancy};

/// Grid dimensions in cells.  Both are positive once validated.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct GridSize {
    pub width:  u32,
    pub height: u32,
}

impl GridSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn cell_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

/// What occupies one cell of the map.
///
/// | Code | Kind      | Traversable |
/// |------|-----------|-------------|
/// | 0    | `Free`    | yes         |
/// | 1    | `Obstacle`| no          |
/// | 2    | `Shelf`   | no          |
/// | 3    | `Charger` | yes         |
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Cell {
    Free,
    Obstacle,
    Shelf,
    Charger,
}

impl Cell {
    pub fn from_code(code: i32) -> Option<Cell> {
        match code {
            0 => Some(Cell::Free),
            1 => Some(Cell::Obstacle),
            2 => Some(Cell::Shelf),
            3 => Some(Cell::Charger),
            _ => None,
        }
    }

    pub const fn code(self) -> i32 {
        match self {
            Cell::Free     => 0,
            Cell::Obstacle => 1,
            Cell::Shelf    => 2,
            Cell::Charger  => 3,
        }
    }

    /// `true` if a robot may stand on this cell.
    #[inline]
    pub const fn is_traversable(self) -> bool {
        matches!(self, Cell::Free | Cell::Charger)
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Row-major warehouse map.  Never mutated after construction; during a run
/// it is shared behind an `Arc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size:  GridSize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from `height` rows of `width` cell codes.
    pub fn from_rows(size: GridSize, rows: &[Vec<i32>]) -> GridResult<Grid> {
        if size.width == 0 || size.height == 0 {
            return Err(GridError::InvalidDimensions { width: size.width, height: size.height });
        }
        if rows.len() != size.height as usize {
            return Err(GridError::MapShape {
                expected_rows: size.height,
                expected_cols: size.width,
                row:           None,
                got:           rows.len(),
            });
        }

        let mut cells = Vec::with_capacity(size.cell_count());
        for (y, row) in rows.iter().enumerate() {
            if row.len() != size.width as usize {
                return Err(GridError::MapShape {
                    expected_rows: size.height,
                    expected_cols: size.width,
                    row:           Some(y),
                    got:           row.len(),
                });
            }
            for (x, &code) in row.iter().enumerate() {
                let cell = Cell::from_code(code).ok_or(GridError::UnknownCell {
                    code,
                    pos: Position::new(x as i32, y as i32),
                })?;
                cells.push(cell);
            }
        }
        Ok(Grid { size, cells })
    }

    /// A grid with every cell `Free`.
    pub fn open(size: GridSize) -> GridResult<Grid> {
        if size.width == 0 || size.height == 0 {
            return Err(GridError::InvalidDimensions { width: size.width, height: size.height });
        }
        Ok(Grid { size, cells: vec![Cell::Free; size.cell_count()] })
    }

    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as u32) < self.size.width
            && (pos.y as u32) < self.size.height
    }

    /// Precondition check: `Ok` iff `pos` lies inside the grid.
    #[inline]
    pub fn check(&self, pos: Position) -> GridResult<()> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(GridError::InvalidPosition { pos, size: self.size })
        }
    }

    /// The cell at `pos`.
    pub fn cell(&self, pos: Position) -> GridResult<Cell> {
        self.check(pos)?;
        Ok(self.cells[self.offset(pos)])
    }

    /// `true` if the cell blocks robots.  Out-of-bounds positions are a
    /// caller error.
    pub fn is_obstacle(&self, pos: Position) -> GridResult<bool> {
        self.cell(pos).map(|c| !c.is_traversable())
    }

    /// In bounds and not blocking.
    #[inline]
    pub fn is_traversable(&self, pos: Position) -> bool {
        self.in_bounds(pos) && self.cells[self.offset(pos)].is_traversable()
    }

    /// In bounds, not blocking, and not occupied by any robot.
    #[inline]
    pub fn is_free(&self, pos: Position, occupancy: &Occupancy) -> bool {
        self.is_traversable(pos) && occupancy.occupant(pos).is_none()
    }

    /// `true` if a robot on `from` may step once in `dir`: the target must
    /// be traversable and a diagonal step may not cut past a blocking
    /// corner (both orthogonal neighbours must be traversable too).
    pub fn can_step(&self, from: Position, dir: Direction) -> bool {
        if !self.is_traversable(from.step(dir)) {
            return false;
        }
        match dir.components() {
            Some((h, v)) => self.is_traversable(from.step(h)) && self.is_traversable(from.step(v)),
            None => true,
        }
    }

    /// The map as rows of cell codes (`map[y][x]`).
    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        self.cells
            .chunks(self.size.width as usize)
            .map(|row| row.iter().map(|c| c.code()).collect())
            .collect()
    }

    /// Count of traversable cells.
    pub fn traversable_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_traversable()).count()
    }

    #[inline]
    fn offset(&self, pos: Position) -> usize {
        pos.y as usize * self.size.width as usize + pos.x as usize
    }
}
