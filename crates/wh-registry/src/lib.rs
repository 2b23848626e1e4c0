//! `wh-registry`: robot and task bookkeeping.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`registry`] | `Registry`: positions, occupancy, task pool, archive      |
//! | [`record`]   | `RobotRecord`, `RobotState`, `TaskRecord`, `TaskStatus`    |
//! | [`error`]    | `RegistryError`, `RegistryResult<T>`                       |
//!
//! # Task lifecycle
//!
//! ```text
//! Pending ──assign_task──▶ Assigned(robot) ──complete_task──▶ Completed(robot)
//! ```
//!
//! Completed tasks leave the open pool and are kept in an archive for
//! reporting.

pub mod error;
pub mod record;
pub mod registry;

#[cfg(test)]
mod tests;

pub use error::{RegistryError, RegistryResult};
pub use record::{RobotRecord, RobotState, TaskRecord, TaskStatus};
pub use registry::Registry;
