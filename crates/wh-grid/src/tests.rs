//! Unit tests for wh-grid.

use wh_core::{Direction, Position, RobotId};

use crate::{Cell, Grid, GridError, GridSize, Occupancy};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 4x3 map:
///
/// ```text
/// . # . .
/// . S . C
/// . . . .
/// ```
fn small_grid() -> Grid {
    let rows = vec![
        vec![0, 1, 0, 0],
        vec![0, 2, 0, 3],
        vec![0, 0, 0, 0],
    ];
    Grid::from_rows(GridSize::new(4, 3), &rows).unwrap()
}

#[cfg(test)]
mod construction_tests {
    use super::*;

    #[test]
    fn builds_from_rows() {
        let grid = small_grid();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.cell(Position::new(1, 0)).unwrap(), Cell::Obstacle);
        assert_eq!(grid.cell(Position::new(1, 1)).unwrap(), Cell::Shelf);
        assert_eq!(grid.cell(Position::new(3, 1)).unwrap(), Cell::Charger);
        assert_eq!(grid.traversable_count(), 10);
    }

    #[test]
    fn zero_dimension_rejected() {
        let err = Grid::from_rows(GridSize::new(0, 2), &[vec![], vec![]]).unwrap_err();
        assert!(matches!(err, GridError::InvalidDimensions { width: 0, height: 2 }));
    }

    #[test]
    fn wrong_row_count_rejected() {
        let err = Grid::from_rows(GridSize::new(2, 3), &[vec![0, 0], vec![0, 0]]).unwrap_err();
        assert!(matches!(err, GridError::MapShape { row: None, got: 2, .. }));
    }

    #[test]
    fn ragged_row_rejected() {
        let err = Grid::from_rows(GridSize::new(2, 2), &[vec![0, 0], vec![0]]).unwrap_err();
        assert!(matches!(err, GridError::MapShape { row: Some(1), got: 1, .. }));
    }

    #[test]
    fn unknown_code_rejected() {
        let err = Grid::from_rows(GridSize::new(2, 1), &[vec![0, 9]]).unwrap_err();
        assert_eq!(err, GridError::UnknownCell { code: 9, pos: Position::new(1, 0) });
    }

    #[test]
    fn rows_round_trip() {
        let rows = vec![vec![0, 1, 0, 0], vec![0, 2, 0, 3], vec![0, 0, 0, 0]];
        let grid = Grid::from_rows(GridSize::new(4, 3), &rows).unwrap();
        assert_eq!(grid.to_rows(), rows);
    }

    #[test]
    fn error_messages_render() {
        let err = Grid::from_rows(GridSize::new(2, 2), &[vec![0, 0], vec![0]]).unwrap_err();
        assert_eq!(err.to_string(), "map data must be 2 rows of 2 cells: row 1 has length 1");
    }
}

#[cfg(test)]
mod query_tests {
    use super::*;

    #[test]
    fn bounds() {
        let grid = small_grid();
        assert!(grid.in_bounds(Position::new(0, 0)));
        assert!(grid.in_bounds(Position::new(3, 2)));
        assert!(!grid.in_bounds(Position::new(4, 0)));
        assert!(!grid.in_bounds(Position::new(0, 3)));
        assert!(!grid.in_bounds(Position::new(-1, 0)));
    }

    #[test]
    fn obstacle_query_out_of_bounds_is_invalid_position() {
        let grid = small_grid();
        assert!(matches!(
            grid.is_obstacle(Position::new(9, 9)),
            Err(GridError::InvalidPosition { .. })
        ));
        assert_eq!(grid.is_obstacle(Position::new(1, 0)), Ok(true));
        assert_eq!(grid.is_obstacle(Position::new(1, 1)), Ok(true));
        assert_eq!(grid.is_obstacle(Position::new(3, 1)), Ok(false));
    }

    #[test]
    fn traversable_excludes_blocking_and_outside() {
        let grid = small_grid();
        assert!(grid.is_traversable(Position::new(0, 0)));
        assert!(grid.is_traversable(Position::new(3, 1)));
        assert!(!grid.is_traversable(Position::new(1, 0)));
        assert!(!grid.is_traversable(Position::new(-1, 1)));
    }

    #[test]
    fn free_accounts_for_occupancy() {
        let grid = small_grid();
        let mut occ = Occupancy::new();
        let cell = Position::new(2, 2);
        assert!(grid.is_free(cell, &occ));
        occ.insert(cell, RobotId(1));
        assert!(!grid.is_free(cell, &occ));
        assert_eq!(occ.remove(cell), Some(RobotId(1)));
        assert!(grid.is_free(cell, &occ));
    }

    #[test]
    fn diagonal_steps_cannot_cut_corners() {
        let grid = small_grid();
        assert!(grid.can_step(Position::new(2, 2), Direction::UpRight));
        // (2, 1) is free but the shelf at (1, 1) is on the corner.
        assert!(!grid.can_step(Position::new(1, 2), Direction::UpRight));
        assert!(!grid.can_step(Position::new(0, 1), Direction::Right));
        assert!(!grid.can_step(Position::new(0, 0), Direction::Up));
        assert!(grid.can_step(Position::new(0, 0), Direction::Down));
    }

    #[test]
    fn open_grid_is_all_free() {
        let grid = Grid::open(GridSize::new(3, 3)).unwrap();
        assert_eq!(grid.traversable_count(), 9);
    }
}
