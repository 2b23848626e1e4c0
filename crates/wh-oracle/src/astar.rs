//! In-process shortest-path planner.
//!
//! Lets the engine run without a remote decision service: every robot with
//! an assignment steps along a shortest path to its target, every other
//! robot waits.  Other robots are not treated as obstacles; collisions are
//! the step coordinator's job.
//!
//! # Cost model
//!
//! Every step costs 1, diagonal or not.  The heuristic is Manhattan distance
//! under four-connectivity and Chebyshev distance under eight, both of which
//! never overestimate, so the first time the target is popped its path is
//! shortest.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use wh_core::{Connectivity, Position};
use wh_grid::Grid;

use crate::{Action, ActionOracle, ActionRequest, OracleResult};

/// A* toward the robot's assigned target.
#[derive(Copy, Clone, Debug, Default)]
pub struct PathfindingOracle {
    connectivity: Connectivity,
}

impl PathfindingOracle {
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }
}

impl ActionOracle for PathfindingOracle {
    fn request_action(&self, request: &ActionRequest<'_>) -> OracleResult<Action> {
        let Some(target) = request.target else {
            return Ok(Action::Wait);
        };
        let action = shortest_path(request.grid, request.position, target, self.connectivity)
            .and_then(|path| path.get(1).copied())
            .and_then(|next| request.position.direction_to(next))
            .map_or(Action::Wait, Action::Move);
        Ok(action)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

#[inline]
fn heuristic(a: Position, b: Position, connectivity: Connectivity) -> u32 {
    match connectivity {
        Connectivity::Four => a.manhattan(b),
        Connectivity::Eight => a.chebyshev(b),
    }
}

#[inline]
fn offset(grid: &Grid, pos: Position) -> usize {
    pos.y as usize * grid.width() as usize + pos.x as usize
}

/// Cells from `from` to `to` inclusive, or `None` if `to` is unreachable or
/// either end is not traversable.  A path from a cell to itself is that
/// single cell.
pub fn shortest_path(
    grid:         &Grid,
    from:         Position,
    to:           Position,
    connectivity: Connectivity,
) -> Option<Vec<Position>> {
    if !grid.is_traversable(from) || !grid.is_traversable(to) {
        return None;
    }
    if from == to {
        return Some(vec![from]);
    }

    let n = grid.size().cell_count();
    let mut dist = vec![u32::MAX; n];
    let mut prev: Vec<Option<Position>> = vec![None; n];
    dist[offset(grid, from)] = 0;

    // Min-heap on (f, g, cell).  The cell is the final tie-break so equal
    // paths are always explored in the same order.
    let mut heap: BinaryHeap<Reverse<(u32, u32, Position)>> = BinaryHeap::new();
    heap.push(Reverse((heuristic(from, to, connectivity), 0, from)));

    while let Some(Reverse((_, cost, cell))) = heap.pop() {
        if cell == to {
            return Some(reconstruct(grid, &prev, to));
        }
        // Skip stale heap entries.
        if cost > dist[offset(grid, cell)] {
            continue;
        }

        for &dir in connectivity.directions() {
            if !grid.can_step(cell, dir) {
                continue;
            }
            let next = cell.step(dir);
            let next_cost = cost + 1;
            let slot = offset(grid, next);
            if next_cost < dist[slot] {
                dist[slot] = next_cost;
                prev[slot] = Some(cell);
                heap.push(Reverse((next_cost + heuristic(next, to, connectivity), next_cost, next)));
            }
        }
    }
    None
}

fn reconstruct(grid: &Grid, prev: &[Option<Position>], to: Position) -> Vec<Position> {
    let mut path = vec![to];
    let mut cur = to;
    while let Some(p) = prev[offset(grid, cur)] {
        path.push(p);
        cur = p;
    }
    path.reverse();
    path
}
