//! Strongly typed identifiers for robots and task items.
//!
//! `RobotId` is `Copy + Ord + Hash` and sorts by its integer value, which is
//! the order every per-tick decision is made in.  `ItemId` wraps the string
//! item identifier carried in a layout's task pool and orders
//! lexicographically.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one robot.  Valid ids are strictly positive.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct RobotId(pub u32);

impl RobotId {
    /// Zero is reserved; layouts and spawns reject it.
    pub const INVALID: RobotId = RobotId(0);

    #[inline(always)]
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "robot#{}", self.0)
    }
}

impl From<u32> for RobotId {
    #[inline(always)]
    fn from(n: u32) -> Self {
        RobotId(n)
    }
}

/// Identifier of one task item, unique within a task pool.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        ItemId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId(s)
    }
}
