//! The per-robot decision returned by an oracle.
//!
//! # Wire codes
//!
//! | Code | Action       | Code | Action            |
//! |------|--------------|------|-------------------|
//! | 0    | `Wait`       | 6    | `Deliver`         |
//! | 1    | up           | 7    | up-left           |
//! | 2    | down         | 8    | up-right          |
//! | 3    | left         | 9    | down-left         |
//! | 4    | right        | 10   | down-right        |
//! | 5    | `Pickup`     |      |                   |

use std::fmt;

use serde::{Deserialize, Serialize};

use wh_core::{Direction, Position};

use crate::OracleError;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Action {
    Wait,
    Move(Direction),
    /// Load the item at the current cell.  The robot stays put.
    Pickup,
    /// Drop the carried item at the current cell.  The robot stays put.
    Deliver,
}

impl Action {
    pub const fn code(self) -> u8 {
        match self {
            Action::Wait    => 0,
            Action::Pickup  => 5,
            Action::Deliver => 6,
            Action::Move(dir) => match dir {
                Direction::Up        => 1,
                Direction::Down      => 2,
                Direction::Left      => 3,
                Direction::Right     => 4,
                Direction::UpLeft    => 7,
                Direction::UpRight   => 8,
                Direction::DownLeft  => 9,
                Direction::DownRight => 10,
            },
        }
    }

    /// `None` for codes outside 0..=10.  Signed so that any JSON integer can
    /// be checked without a lossy cast.
    pub fn from_code(code: i64) -> Option<Action> {
        let action = match code {
            0  => Action::Wait,
            1  => Action::Move(Direction::Up),
            2  => Action::Move(Direction::Down),
            3  => Action::Move(Direction::Left),
            4  => Action::Move(Direction::Right),
            5  => Action::Pickup,
            6  => Action::Deliver,
            7  => Action::Move(Direction::UpLeft),
            8  => Action::Move(Direction::UpRight),
            9  => Action::Move(Direction::DownLeft),
            10 => Action::Move(Direction::DownRight),
            _  => return None,
        };
        Some(action)
    }

    #[inline]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::Move(dir) => Some(dir),
            _ => None,
        }
    }

    /// The cell this action leads to from `from`.
    #[inline]
    pub fn target_from(self, from: Position) -> Position {
        match self {
            Action::Move(dir) => from.step(dir),
            _ => from,
        }
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> u8 {
        action.code()
    }
}

impl TryFrom<u8> for Action {
    type Error = OracleError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Action::from_code(i64::from(code))
            .ok_or_else(|| OracleError::Protocol(format!("unknown action code {code}")))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Wait    => f.write_str("wait"),
            Action::Pickup  => f.write_str("pickup"),
            Action::Deliver => f.write_str("deliver"),
            Action::Move(dir) => write!(f, "move {dir:?}"),
        }
    }
}
