//! `wh-grid`: the warehouse grid model.
//!
//! # Crate layout
//!
//! | Module        | Contents                                             |
//! |---------------|------------------------------------------------------|
//! | [`grid`]      | `Grid`, `GridSize`, `Cell`                           |
//! | [`occupancy`] | `Occupancy`: which robot holds which cell           |
//! | [`error`]     | `GridError`, `GridResult<T>`                         |
//!
//! The grid is built once from a layout and is read-only afterwards.  Robot
//! occupancy changes every tick, so it lives in a separate `Occupancy` owned
//! by the registry and is passed in where free-ness is asked.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                 |
//! |-----------|--------------------------------------------------------|
//! | `fx-hash` | Uses FxHash for the occupancy index.                   |

pub mod error;
pub mod grid;
pub mod occupancy;

#[cfg(test)]
mod tests;

pub use error::{GridError, GridResult};
pub use grid::{Cell, Grid, GridSize};
pub use occupancy::Occupancy;
