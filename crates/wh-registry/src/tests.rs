//! Unit tests for wh-registry.

use wh_core::{ItemId, Position, RobotId};
use wh_grid::{Grid, GridSize};

use crate::{Registry, RegistryError, RobotState, TaskStatus};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 5x5 with an obstacle at (2, 2).
fn grid() -> Grid {
    let mut rows = vec![vec![0; 5]; 5];
    rows[2][2] = 1;
    Grid::from_rows(GridSize::new(5, 5), &rows).unwrap()
}

fn p(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

fn item(s: &str) -> ItemId {
    ItemId::from(s)
}

/// Robots 1 at (0,0), 2 at (1,0), 3 at (4,4); tasks "a" at (3,3), "b" at (0,4).
fn populated() -> (Grid, Registry) {
    let g = grid();
    let mut reg = Registry::new();
    reg.spawn_robot(&g, RobotId(1), p(0, 0)).unwrap();
    reg.spawn_robot(&g, RobotId(2), p(1, 0)).unwrap();
    reg.spawn_robot(&g, RobotId(3), p(4, 4)).unwrap();
    reg.add_task(&g, item("a"), p(3, 3)).unwrap();
    reg.add_task(&g, item("b"), p(0, 4)).unwrap();
    (g, reg)
}

#[cfg(test)]
mod population_tests {
    use super::*;

    #[test]
    fn spawned_robots_are_listed_ascending() {
        let g = grid();
        let mut reg = Registry::new();
        reg.spawn_robot(&g, RobotId(9), p(0, 0)).unwrap();
        reg.spawn_robot(&g, RobotId(2), p(1, 1)).unwrap();
        reg.spawn_robot(&g, RobotId(5), p(3, 1)).unwrap();
        assert_eq!(reg.active_robots(), vec![RobotId(2), RobotId(5), RobotId(9)]);
    }

    #[test]
    fn spawn_rejects_bad_input() {
        let (g, mut reg) = populated();
        assert_eq!(reg.spawn_robot(&g, RobotId(0), p(3, 0)), Err(RegistryError::ZeroRobotId));
        assert_eq!(
            reg.spawn_robot(&g, RobotId(1), p(3, 0)),
            Err(RegistryError::DuplicateRobot(RobotId(1)))
        );
        assert_eq!(
            reg.spawn_robot(&g, RobotId(7), p(2, 2)),
            Err(RegistryError::InvalidPosition(p(2, 2)))
        );
        assert!(matches!(
            reg.spawn_robot(&g, RobotId(7), p(5, 0)),
            Err(RegistryError::OutOfBounds(_))
        ));
        assert_eq!(
            reg.spawn_robot(&g, RobotId(7), p(1, 0)),
            Err(RegistryError::OccupiedCell { pos: p(1, 0), occupant: RobotId(2) })
        );
    }

    #[test]
    fn duplicate_task_rejected() {
        let (g, mut reg) = populated();
        assert_eq!(
            reg.add_task(&g, item("a"), p(1, 1)),
            Err(RegistryError::DuplicateTask(item("a")))
        );
    }

    #[test]
    fn unknown_robot_position_errors() {
        let (_g, reg) = populated();
        assert_eq!(reg.position_of(RobotId(42)), Err(RegistryError::InvalidRobot(RobotId(42))));
        assert_eq!(reg.position_of(RobotId(2)), Ok(p(1, 0)));
    }
}

#[cfg(test)]
mod move_tests {
    use super::*;

    #[test]
    fn apply_move_returns_prior_position() {
        let (g, mut reg) = populated();
        assert_eq!(reg.apply_move(&g, RobotId(1), p(0, 1)), Ok(p(0, 0)));
        assert_eq!(reg.position_of(RobotId(1)), Ok(p(0, 1)));
        assert_eq!(reg.occupancy().occupant(p(0, 1)), Some(RobotId(1)));
        assert_eq!(reg.occupancy().occupant(p(0, 0)), None);
    }

    #[test]
    fn apply_move_into_occupied_cell_fails() {
        let (g, mut reg) = populated();
        assert_eq!(
            reg.apply_move(&g, RobotId(1), p(1, 0)),
            Err(RegistryError::OccupiedCell { pos: p(1, 0), occupant: RobotId(2) })
        );
        assert_eq!(reg.position_of(RobotId(1)), Ok(p(0, 0)));
    }

    #[test]
    fn apply_move_rejects_obstacles_and_edges() {
        let (g, mut reg) = populated();
        assert!(reg.apply_move(&g, RobotId(3), p(2, 2)).unwrap_err().is_invalid_position());
        assert!(reg.apply_move(&g, RobotId(3), p(5, 4)).unwrap_err().is_invalid_position());
    }

    #[test]
    fn claimed_cell_blocks_second_robot_within_a_tick() {
        let (g, mut reg) = populated();
        reg.begin_tick();
        reg.apply_move(&g, RobotId(2), p(2, 0)).unwrap();
        reg.apply_move(&g, RobotId(2), p(3, 0)).unwrap();
        // (2, 0) is empty again but was entered this tick.
        reg.apply_move(&g, RobotId(1), p(1, 0)).unwrap();
        assert_eq!(
            reg.apply_move(&g, RobotId(1), p(2, 0)),
            Err(RegistryError::OccupiedCell { pos: p(2, 0), occupant: RobotId(2) })
        );
        reg.begin_tick();
        assert!(reg.apply_move(&g, RobotId(1), p(2, 0)).is_ok());
    }

    #[test]
    fn batch_allows_following_into_vacated_cell() {
        let (g, mut reg) = populated();
        // 1 follows 2 to the right.
        let priors = reg
            .commit_moves(&g, &[(RobotId(1), p(1, 0)), (RobotId(2), p(2, 0))])
            .unwrap();
        assert_eq!(priors, vec![p(0, 0), p(1, 0)]);
        assert_eq!(reg.position_of(RobotId(1)), Ok(p(1, 0)));
        assert_eq!(reg.position_of(RobotId(2)), Ok(p(2, 0)));
        assert!(reg.check_consistency(&g).is_ok());
    }

    #[test]
    fn batch_collision_changes_nothing() {
        let (g, mut reg) = populated();
        let err = reg
            .commit_moves(&g, &[(RobotId(1), p(0, 1)), (RobotId(2), p(0, 1))])
            .unwrap_err();
        assert!(matches!(err, RegistryError::OccupiedCell { pos, .. } if pos == p(0, 1)));
        assert_eq!(reg.position_of(RobotId(1)), Ok(p(0, 0)));
        assert_eq!(reg.position_of(RobotId(2)), Ok(p(1, 0)));
    }

    #[test]
    fn batch_into_stationary_robot_fails() {
        let (g, mut reg) = populated();
        let err = reg.commit_moves(&g, &[(RobotId(1), p(1, 0))]).unwrap_err();
        assert!(matches!(err, RegistryError::OccupiedCell { .. }));
    }

    #[test]
    fn batch_rejects_unknown_and_duplicate_movers() {
        let (g, mut reg) = populated();
        assert_eq!(
            reg.commit_moves(&g, &[(RobotId(8), p(3, 0))]),
            Err(RegistryError::InvalidRobot(RobotId(8)))
        );
        assert_eq!(
            reg.commit_moves(&g, &[(RobotId(1), p(0, 1)), (RobotId(1), p(0, 2))]),
            Err(RegistryError::DuplicateMove(RobotId(1)))
        );
    }
}

#[cfg(test)]
mod task_tests {
    use super::*;

    #[test]
    fn pending_tasks_in_pool_order() {
        let (g, mut reg) = populated();
        reg.add_task(&g, item("0-first-alphabetically"), p(1, 3)).unwrap();
        let pending: Vec<ItemId> = reg.pending_tasks().into_iter().map(|(i, _)| i).collect();
        assert_eq!(pending, vec![item("a"), item("b"), item("0-first-alphabetically")]);
    }

    #[test]
    fn full_lifecycle() {
        let (_g, mut reg) = populated();
        reg.assign_task(RobotId(1), &item("a")).unwrap();
        assert_eq!(reg.task(&item("a")).unwrap().status, TaskStatus::Assigned(RobotId(1)));
        assert_eq!(reg.robot(RobotId(1)).unwrap().state, RobotState::Assigned(item("a")));
        assert_eq!(reg.pending_tasks().len(), 1);
        assert_eq!(reg.open_targets(), vec![p(3, 3), p(0, 4)]);

        assert_eq!(reg.complete_task(&item("a")), Ok(RobotId(1)));
        assert!(reg.robot(RobotId(1)).unwrap().is_idle());
        assert_eq!(reg.open_targets(), vec![p(0, 4)]);
        assert_eq!(reg.completed_tasks().len(), 1);
        assert_eq!(reg.completed_tasks()[0].status, TaskStatus::Completed(RobotId(1)));
    }

    #[test]
    fn assigning_non_pending_task_fails() {
        let (_g, mut reg) = populated();
        reg.assign_task(RobotId(1), &item("a")).unwrap();
        assert!(matches!(
            reg.assign_task(RobotId(2), &item("a")),
            Err(RegistryError::TaskUnavailable { status: TaskStatus::Assigned(RobotId(1)), .. })
        ));
        reg.complete_task(&item("a")).unwrap();
        assert!(matches!(
            reg.assign_task(RobotId(2), &item("a")),
            Err(RegistryError::TaskUnavailable { status: TaskStatus::Completed(_), .. })
        ));
    }

    #[test]
    fn assigning_unknown_task_fails() {
        let (_g, mut reg) = populated();
        assert_eq!(
            reg.assign_task(RobotId(1), &item("zzz")),
            Err(RegistryError::UnknownTask(item("zzz")))
        );
    }

    #[test]
    fn busy_robot_cannot_take_second_task() {
        let (_g, mut reg) = populated();
        reg.assign_task(RobotId(1), &item("a")).unwrap();
        assert_eq!(
            reg.assign_task(RobotId(1), &item("b")),
            Err(RegistryError::RobotBusy { robot: RobotId(1), item: item("a") })
        );
    }

    #[test]
    fn completing_pending_or_completed_task_fails() {
        let (_g, mut reg) = populated();
        assert!(matches!(
            reg.complete_task(&item("a")),
            Err(RegistryError::InvalidTaskState { status: TaskStatus::Pending, .. })
        ));
        reg.assign_task(RobotId(3), &item("a")).unwrap();
        reg.complete_task(&item("a")).unwrap();
        assert!(matches!(
            reg.complete_task(&item("a")),
            Err(RegistryError::InvalidTaskState { status: TaskStatus::Completed(_), .. })
        ));
        assert_eq!(reg.complete_task(&item("q")), Err(RegistryError::UnknownTask(item("q"))));
    }

    #[test]
    fn assignment_of_reports_task() {
        let (_g, mut reg) = populated();
        assert!(reg.assignment_of(RobotId(2)).unwrap().is_none());
        reg.assign_task(RobotId(2), &item("b")).unwrap();
        assert_eq!(reg.assignment_of(RobotId(2)).unwrap().map(|t| t.target), Some(p(0, 4)));
        assert_eq!(reg.idle_robots(), vec![(RobotId(1), p(0, 0)), (RobotId(3), p(4, 4))]);
    }
}

#[cfg(test)]
mod consistency_tests {
    use super::*;

    #[test]
    fn fresh_registry_is_consistent() {
        let (g, reg) = populated();
        assert!(reg.check_consistency(&g).is_ok());
    }

    #[test]
    fn swapped_grid_is_detected() {
        let (_g, reg) = populated();
        // Same dimensions, but robot 3's cell is now an obstacle.
        let mut rows = vec![vec![0; 5]; 5];
        rows[4][4] = 1;
        let other = Grid::from_rows(GridSize::new(5, 5), &rows).unwrap();
        assert!(matches!(reg.check_consistency(&other), Err(RegistryError::Inconsistent(_))));
    }

    #[test]
    fn shrunken_grid_is_detected() {
        let (_g, reg) = populated();
        let other = Grid::open(GridSize::new(3, 3)).unwrap();
        assert!(matches!(reg.check_consistency(&other), Err(RegistryError::Inconsistent(_))));
    }
}
