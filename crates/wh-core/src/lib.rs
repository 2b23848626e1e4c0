//! `wh-core`: foundational types for the warehouse simulation.
//!
//! This crate is a dependency of every other `wh-*` crate.  It has no `wh-*`
//! dependencies and only `serde` and `thiserror` as external ones.
//!
//! # What lives here
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | [`ids`]    | `RobotId`, `ItemId`                                   |
//! | [`geo`]    | `Position`, `Direction`, `Connectivity`               |
//! | [`time`]   | `Step`                                                |
//! | [`config`] | `SimConfig`, `OracleConfig`                           |
//! | [`error`]  | `CoreError`, `CoreResult`                             |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{OracleConfig, SimConfig};
pub use error::{CoreError, CoreResult};
pub use geo::{Connectivity, Direction, Position};
pub use ids::{ItemId, RobotId};
pub use time::Step;
