//! Grid geometry: cell positions, movement directions, and neighbourhoods.
//!
//! # Coordinates
//!
//! `x` is the column and `y` the row, so a map is indexed `map[y][x]`.
//! `Up` decreases `y`; `Right` increases `x`.
//!
//! Positions are signed so that stepping off the edge of a grid produces a
//! representable (and then rejected) coordinate instead of wrapping.
//!
//! On the wire a position is the two-element array `[row, col]`, i.e.
//! `[y, x]`.  This is the order the decision service indexes its grid in.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Position ──────────────────────────────────────────────────────────────────

/// One grid cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[derive(Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `dir`.
    #[inline]
    pub fn step(self, dir: Direction) -> Position {
        let (dx, dy) = dir.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    /// Manhattan (L1) distance.
    #[inline]
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Chebyshev (L∞) distance: the step count under 8-connectivity.
    #[inline]
    pub fn chebyshev(self, other: Position) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// `true` if `other` is exactly one step away under `connectivity`.
    pub fn is_adjacent(self, other: Position, connectivity: Connectivity) -> bool {
        match connectivity {
            Connectivity::Four => self.manhattan(other) == 1,
            Connectivity::Eight => self.chebyshev(other) == 1,
        }
    }

    /// The direction leading from `self` to an adjacent `other`, if any.
    pub fn direction_to(self, other: Position) -> Option<Direction> {
        let delta = (other.x - self.x, other.y - self.y);
        Direction::ALL.into_iter().find(|d| d.delta() == delta)
    }
}

impl From<[i32; 2]> for Position {
    /// `[row, col]` → `Position { x: col, y: row }`.
    fn from([row, col]: [i32; 2]) -> Self {
        Position::new(col, row)
    }
}

impl From<Position> for [i32; 2] {
    fn from(p: Position) -> Self {
        [p.y, p.x]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// A single-cell movement.  The four cardinal directions are always legal;
/// the diagonals only under [`Connectivity::Eight`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const CARDINAL: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// `(dx, dy)` offset of one step.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up        => (0, -1),
            Direction::Down      => (0, 1),
            Direction::Left      => (-1, 0),
            Direction::Right     => (1, 0),
            Direction::UpLeft    => (-1, -1),
            Direction::UpRight   => (1, -1),
            Direction::DownLeft  => (-1, 1),
            Direction::DownRight => (1, 1),
        }
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dy != 0
    }

    /// For a diagonal, the two cardinal directions it combines
    /// (horizontal first).  `None` for cardinal directions.
    pub fn components(self) -> Option<(Direction, Direction)> {
        match self {
            Direction::UpLeft    => Some((Direction::Left, Direction::Up)),
            Direction::UpRight   => Some((Direction::Right, Direction::Up)),
            Direction::DownLeft  => Some((Direction::Left, Direction::Down)),
            Direction::DownRight => Some((Direction::Right, Direction::Down)),
            _ => None,
        }
    }
}

// ── Connectivity ──────────────────────────────────────────────────────────────

/// Which neighbouring cells a robot may move to in one step.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Up, down, left, right.
    #[default]
    Four,
    /// The four cardinal moves plus the diagonals.
    Eight,
}

impl Connectivity {
    #[inline]
    pub fn allows(self, dir: Direction) -> bool {
        match self {
            Connectivity::Four => !dir.is_diagonal(),
            Connectivity::Eight => true,
        }
    }

    /// The directions available under this connectivity, in a fixed order.
    pub fn directions(self) -> &'static [Direction] {
        match self {
            Connectivity::Four => &Direction::CARDINAL,
            Connectivity::Eight => &Direction::ALL,
        }
    }
}
