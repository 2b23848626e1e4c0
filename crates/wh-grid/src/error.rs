//! Grid-model error type.

use thiserror::Error;

use wh_core::Position;

use crate::GridSize;

/// Errors produced by `wh-grid`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("position {pos} is outside the {}x{} grid", .size.width, .size.height)]
    InvalidPosition { pos: Position, size: GridSize },

    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("map data must be {expected_rows} rows of {expected_cols} cells: {} has length {got}",
        describe_row(.row))]
    MapShape {
        expected_rows: u32,
        expected_cols: u32,
        /// `None` when the number of rows is wrong.
        row:           Option<usize>,
        got:           usize,
    },

    #[error("unknown cell code {code} at {pos}")]
    UnknownCell { code: i32, pos: Position },
}

fn describe_row(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!("row {r}"),
        None => "row list".to_owned(),
    }
}

pub type GridResult<T> = Result<T, GridError>;
