//! `wh-layout`: the warehouse layout document and its stores.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`layout`] | `Layout`, `RobotSpec`, `TaskSpec`, validation, default layout |
//! | [`store`]  | `LayoutStore` trait, `FileLayoutStore`, `MemoryLayoutStore`   |
//! | [`error`]  | `LayoutError`, `LayoutResult<T>`                              |
//!
//! Stores only move documents; [`Layout::validate`] is what enforces the
//! layout invariant and produces the [`wh_grid::Grid`] a simulation runs on.

pub mod error;
pub mod layout;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{LayoutError, LayoutResult};
pub use layout::{DEFAULT_NAME, DEFAULT_SIDE, Layout, RobotSpec, TaskSpec};
pub use store::{FileLayoutStore, LayoutStore, MemoryLayoutStore, load_reader, load_str};
