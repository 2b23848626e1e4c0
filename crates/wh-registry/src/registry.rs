//! The `Registry`: authoritative robot positions and the task pool.
//!
//! Every mutation goes through a method here so that robot positions and
//! the occupancy index can never drift apart.  The step coordinator is the
//! only writer during a run.

use std::collections::{BTreeMap, HashMap};

use log::debug;

use wh_core::{ItemId, Position, RobotId};
use wh_grid::{Grid, Occupancy};

use crate::{RegistryError, RegistryResult, RobotRecord, RobotState, TaskRecord, TaskStatus};

/// Robots keyed (and therefore iterated) by ascending id, plus the open task
/// pool and an archive of completed tasks.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    robots:    BTreeMap<RobotId, RobotRecord>,
    occupancy: Occupancy,
    /// Pending and assigned tasks.
    tasks:     BTreeMap<ItemId, TaskRecord>,
    /// Completed tasks, in completion order.
    archive:   Vec<TaskRecord>,
    next_pool_index: usize,
    /// Cells entered through `apply_move` since the last `begin_tick`.
    claims:    HashMap<Position, RobotId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Population ────────────────────────────────────────────────────────

    /// Place a new robot on `pos`.
    pub fn spawn_robot(&mut self, grid: &Grid, id: RobotId, pos: Position) -> RegistryResult<()> {
        if !id.is_valid() {
            return Err(RegistryError::ZeroRobotId);
        }
        if self.robots.contains_key(&id) {
            return Err(RegistryError::DuplicateRobot(id));
        }
        check_traversable(grid, pos)?;
        if let Some(occupant) = self.occupancy.occupant(pos) {
            return Err(RegistryError::OccupiedCell { pos, occupant });
        }

        self.occupancy.insert(pos, id);
        self.robots.insert(id, RobotRecord { id, position: pos, state: RobotState::Idle });
        Ok(())
    }

    /// Add a pending task.  Tasks keep the order they were added in.
    pub fn add_task(&mut self, grid: &Grid, item: ItemId, target: Position) -> RegistryResult<()> {
        if self.tasks.contains_key(&item) || self.archive.iter().any(|t| t.item == item) {
            return Err(RegistryError::DuplicateTask(item));
        }
        check_traversable(grid, target)?;

        let pool_index = self.next_pool_index;
        self.next_pool_index += 1;
        self.tasks.insert(item.clone(), TaskRecord {
            item,
            target,
            status: TaskStatus::Pending,
            pool_index,
        });
        Ok(())
    }

    // ── Robot queries ─────────────────────────────────────────────────────

    pub fn position_of(&self, robot: RobotId) -> RegistryResult<Position> {
        self.robot(robot).map(|r| r.position)
    }

    pub fn robot(&self, robot: RobotId) -> RegistryResult<&RobotRecord> {
        self.robots.get(&robot).ok_or(RegistryError::InvalidRobot(robot))
    }

    /// Every tracked robot, ascending id.
    pub fn active_robots(&self) -> Vec<RobotId> {
        self.robots.keys().copied().collect()
    }

    pub fn robots(&self) -> impl Iterator<Item = &RobotRecord> {
        self.robots.values()
    }

    pub fn robot_count(&self) -> usize {
        self.robots.len()
    }

    /// Robots with no assignment, ascending id.
    pub fn idle_robots(&self) -> Vec<(RobotId, Position)> {
        self.robots
            .values()
            .filter(|r| r.is_idle())
            .map(|r| (r.id, r.position))
            .collect()
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    // ── Task queries ──────────────────────────────────────────────────────

    pub fn task(&self, item: &ItemId) -> RegistryResult<&TaskRecord> {
        self.tasks.get(item).ok_or_else(|| RegistryError::UnknownTask(item.clone()))
    }

    /// The task assigned to `robot`, if any.
    pub fn assignment_of(&self, robot: RobotId) -> RegistryResult<Option<&TaskRecord>> {
        let record = self.robot(robot)?;
        Ok(record.assignment().and_then(|item| self.tasks.get(item)))
    }

    /// Pending tasks in pool order.
    pub fn pending_tasks(&self) -> Vec<(ItemId, Position)> {
        let mut pending: Vec<&TaskRecord> = self
            .tasks
            .values()
            .filter(|t| t.status == TaskStatus::Pending)
            .collect();
        pending.sort_by_key(|t| t.pool_index);
        pending.into_iter().map(|t| (t.item.clone(), t.target)).collect()
    }

    /// Targets of all open (pending or assigned) tasks, in pool order.
    pub fn open_targets(&self) -> Vec<Position> {
        let mut open: Vec<&TaskRecord> = self.tasks.values().collect();
        open.sort_by_key(|t| t.pool_index);
        open.into_iter().map(|t| t.target).collect()
    }

    /// Open tasks in pool order.
    pub fn open_tasks(&self) -> Vec<&TaskRecord> {
        let mut open: Vec<&TaskRecord> = self.tasks.values().collect();
        open.sort_by_key(|t| t.pool_index);
        open
    }

    pub fn open_task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Archived tasks in completion order.
    pub fn completed_tasks(&self) -> &[TaskRecord] {
        &self.archive
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Forget the cells claimed by `apply_move` during the previous tick.
    pub fn begin_tick(&mut self) {
        self.claims.clear();
    }

    /// Move one robot to `new_pos`, returning its prior position.
    ///
    /// The target must be traversable, unoccupied, and not already entered by
    /// another robot since the last [`begin_tick`][Self::begin_tick].
    pub fn apply_move(
        &mut self,
        grid:    &Grid,
        robot:   RobotId,
        new_pos: Position,
    ) -> RegistryResult<Position> {
        let prior = self.position_of(robot)?;
        if new_pos == prior {
            return Ok(prior);
        }
        check_traversable(grid, new_pos)?;
        if let Some(occupant) = self.occupancy.occupant(new_pos) {
            return Err(RegistryError::OccupiedCell { pos: new_pos, occupant });
        }
        if let Some(&claimant) = self.claims.get(&new_pos) {
            return Err(RegistryError::OccupiedCell { pos: new_pos, occupant: claimant });
        }

        self.relocate(robot, prior, new_pos);
        self.claims.insert(new_pos, robot);
        Ok(prior)
    }

    /// Apply a batch of simultaneous moves atomically.
    ///
    /// Every move is validated against the state *after* the whole batch, so
    /// a robot may enter a cell that another mover in the same batch leaves.
    /// If any check fails nothing is changed.  Returns the prior positions
    /// in batch order.
    pub fn commit_moves(
        &mut self,
        grid:  &Grid,
        moves: &[(RobotId, Position)],
    ) -> RegistryResult<Vec<Position>> {
        let mut priors = Vec::with_capacity(moves.len());
        let mut movers: HashMap<RobotId, Position> = HashMap::with_capacity(moves.len());

        // ── Validate ──────────────────────────────────────────────────────
        for &(robot, to) in moves {
            let from = self.position_of(robot)?;
            if movers.insert(robot, to).is_some() {
                return Err(RegistryError::DuplicateMove(robot));
            }
            check_traversable(grid, to)?;
            priors.push(from);
        }

        let mut finals: HashMap<Position, RobotId> = HashMap::with_capacity(self.robots.len());
        for record in self.robots.values() {
            let pos = movers.get(&record.id).copied().unwrap_or(record.position);
            if let Some(occupant) = finals.insert(pos, record.id) {
                return Err(RegistryError::OccupiedCell { pos, occupant });
            }
        }

        // ── Commit ────────────────────────────────────────────────────────
        for &from in &priors {
            self.occupancy.remove(from);
        }
        for &(robot, to) in moves {
            self.occupancy.insert(to, robot);
            if let Some(record) = self.robots.get_mut(&robot) {
                record.position = to;
            }
        }
        Ok(priors)
    }

    fn relocate(&mut self, robot: RobotId, from: Position, to: Position) {
        self.occupancy.remove(from);
        self.occupancy.insert(to, robot);
        if let Some(record) = self.robots.get_mut(&robot) {
            record.position = to;
        }
    }

    // ── Task transitions ──────────────────────────────────────────────────

    /// `Pending → Assigned(robot)`.
    pub fn assign_task(&mut self, robot: RobotId, item: &ItemId) -> RegistryResult<()> {
        let record = self.robot(robot)?;
        if let RobotState::Assigned(current) = &record.state {
            return Err(RegistryError::RobotBusy { robot, item: current.clone() });
        }
        match self.tasks.get(item).map(|t| t.status.clone()) {
            Some(TaskStatus::Pending) => {}
            Some(status) => {
                return Err(RegistryError::TaskUnavailable { item: item.clone(), status });
            }
            None => {
                return Err(match self.archived_status(item) {
                    Some(status) => RegistryError::TaskUnavailable { item: item.clone(), status },
                    None => RegistryError::UnknownTask(item.clone()),
                });
            }
        }

        if let Some(task) = self.tasks.get_mut(item) {
            task.status = TaskStatus::Assigned(robot);
        }
        if let Some(record) = self.robots.get_mut(&robot) {
            record.state = RobotState::Assigned(item.clone());
        }
        debug!("assigned task {item} to {robot}");
        Ok(())
    }

    /// `Assigned(robot) → Completed(robot)`; the task moves to the archive
    /// and its robot becomes idle.  Returns the robot that completed it.
    pub fn complete_task(&mut self, item: &ItemId) -> RegistryResult<RobotId> {
        let robot = match self.tasks.get(item).map(|t| t.status.clone()) {
            Some(TaskStatus::Assigned(robot)) => robot,
            Some(status) => {
                return Err(RegistryError::InvalidTaskState { item: item.clone(), status });
            }
            None => {
                return Err(match self.archived_status(item) {
                    Some(status) => RegistryError::InvalidTaskState { item: item.clone(), status },
                    None => RegistryError::UnknownTask(item.clone()),
                });
            }
        };

        if let Some(mut task) = self.tasks.remove(item) {
            task.status = TaskStatus::Completed(robot);
            self.archive.push(task);
        }
        if let Some(record) = self.robots.get_mut(&robot) {
            record.state = RobotState::Idle;
        }
        debug!("task {item} completed by {robot}");
        Ok(robot)
    }

    fn archived_status(&self, item: &ItemId) -> Option<TaskStatus> {
        self.archive.iter().find(|t| &t.item == item).map(|t| t.status.clone())
    }

    // ── Consistency ───────────────────────────────────────────────────────

    /// Verify that every robot stands on a distinct traversable cell of
    /// `grid`, that the occupancy index mirrors robot positions, and that
    /// robot and task assignment states agree.
    pub fn check_consistency(&self, grid: &Grid) -> RegistryResult<()> {
        if self.occupancy.len() != self.robots.len() {
            return Err(RegistryError::Inconsistent(format!(
                "occupancy tracks {} cells for {} robots",
                self.occupancy.len(),
                self.robots.len()
            )));
        }
        for record in self.robots.values() {
            if !grid.is_traversable(record.position) {
                return Err(RegistryError::Inconsistent(format!(
                    "{} stands on non-traversable cell {}",
                    record.id, record.position
                )));
            }
            if self.occupancy.occupant(record.position) != Some(record.id) {
                return Err(RegistryError::Inconsistent(format!(
                    "occupancy index disagrees with {} at {}",
                    record.id, record.position
                )));
            }
            if let RobotState::Assigned(item) = &record.state {
                let agrees = self
                    .tasks
                    .get(item)
                    .is_some_and(|t| t.status == TaskStatus::Assigned(record.id));
                if !agrees {
                    return Err(RegistryError::Inconsistent(format!(
                        "{} holds task {item} which is not assigned to it",
                        record.id
                    )));
                }
            }
        }
        for task in self.tasks.values() {
            if !grid.is_traversable(task.target) {
                return Err(RegistryError::Inconsistent(format!(
                    "task {} targets non-traversable cell {}",
                    task.item, task.target
                )));
            }
        }
        Ok(())
    }
}

fn check_traversable(grid: &Grid, pos: Position) -> RegistryResult<()> {
    grid.check(pos)?;
    if !grid.is_traversable(pos) {
        return Err(RegistryError::InvalidPosition(pos));
    }
    Ok(())
}
