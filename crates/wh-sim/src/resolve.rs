//! Conflict resolution: turn one tick's proposals into a set of moves that
//! can be committed simultaneously.
//!
//! # Rules, applied in order
//!
//! 1. **Invalid** proposals (off-grid, blocking cell, a diagonal the
//!    connectivity does not allow, or a diagonal cutting past a blocking
//!    corner) become waits.
//! 2. **Contested** cells go to the lowest robot id; every other contender
//!    waits.  Dropped moves are not queued for later ticks.
//! 3. **Swaps** (two robots moving into each other's cells) are refused for
//!    both robots.
//! 4. **Blocked** moves, whose target is held by a robot that does not move
//!    out, become waits.  Dropping a move can block another one behind it, so
//!    this rule is repeated until nothing changes.
//! 5. **Crossing** diagonals through the same 2×2 block go to the lowest id
//!    among the moves still standing, so a diagonal only yields to a winner
//!    that actually moves.  Rule 4 then runs once more for robots queued
//!    behind the losers.
//!
//! Rotations of three or more robots survive: every robot in the cycle
//! leaves the cell the next one enters.
//!
//! The resolver is a pure function of its inputs, so identical proposals
//! always resolve identically regardless of the order oracle replies arrived
//! in.

use std::collections::BTreeMap;

use wh_core::{Connectivity, Position, RobotId};
use wh_grid::Grid;
use wh_oracle::Action;

use crate::{Conflict, ConflictKind};

#[cfg(not(feature = "fx-hash"))]
type CellMap<V> = std::collections::HashMap<Position, V>;
#[cfg(feature = "fx-hash")]
type CellMap<V> = rustc_hash::FxHashMap<Position, V>;

/// One robot's decision for the tick, before resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Proposal {
    pub robot:  RobotId,
    pub from:   Position,
    pub action: Action,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Surviving moves, ascending robot id.
    pub moves:     Vec<(RobotId, Position)>,
    /// Refused moves, ascending robot id.
    pub conflicts: Vec<Conflict>,
}

/// Resolve `proposals`, which must cover every robot on the grid (robots
/// that are not moving still hold their cells).
pub fn resolve(grid: &Grid, connectivity: Connectivity, proposals: &[Proposal]) -> Resolution {
    let holders: CellMap<RobotId> = proposals.iter().map(|p| (p.from, p.robot)).collect();
    let origin: BTreeMap<RobotId, Position> = proposals.iter().map(|p| (p.robot, p.from)).collect();

    let mut movers: BTreeMap<RobotId, Position> = BTreeMap::new();
    let mut conflicts: Vec<Conflict> = Vec::new();

    // ── 1. Validity ───────────────────────────────────────────────────────
    for p in proposals {
        let Some(dir) = p.action.direction() else { continue };
        let wanted = p.from.step(dir);
        if connectivity.allows(dir) && grid.can_step(p.from, dir) {
            movers.insert(p.robot, wanted);
        } else {
            conflicts.push(Conflict { robot: p.robot, from: p.from, wanted, kind: ConflictKind::Invalid });
        }
    }

    // ── 2. Contested cells ────────────────────────────────────────────────
    let mut winners: CellMap<RobotId> = CellMap::default();
    let mut losers = Vec::new();
    for (&robot, &wanted) in &movers {
        match winners.get(&wanted) {
            Some(&winner) => losers.push((robot, wanted, ConflictKind::Contested { winner })),
            None => {
                winners.insert(wanted, robot);
            }
        }
    }
    drop_all(&mut movers, losers, &origin, &mut conflicts);

    // ── 3. Swaps ──────────────────────────────────────────────────────────
    let mut losers = Vec::new();
    for (&robot, &wanted) in &movers {
        let Some(&other) = holders.get(&wanted) else { continue };
        if movers.get(&other) == Some(&origin[&robot]) {
            losers.push((robot, wanted, ConflictKind::Swap { with: other }));
        }
    }
    drop_all(&mut movers, losers, &origin, &mut conflicts);

    // ── 4. Blocked, to a fixpoint ─────────────────────────────────────────
    drop_blocked(&mut movers, &holders, &origin, &mut conflicts);

    // ── 5. Crossing diagonals ─────────────────────────────────────────────
    //
    // Two diagonals cross exactly when their segments share a midpoint;
    // comparing doubled midpoints keeps the arithmetic in integers.
    let mut centres: CellMap<RobotId> = CellMap::default();
    let mut losers = Vec::new();
    for (&robot, &wanted) in &movers {
        let from = origin[&robot];
        let is_diagonal = from.direction_to(wanted).is_some_and(|d| d.is_diagonal());
        if !is_diagonal {
            continue;
        }
        let centre = Position::new(from.x + wanted.x, from.y + wanted.y);
        match centres.get(&centre) {
            Some(&winner) => losers.push((robot, wanted, ConflictKind::Crossing { winner })),
            None => {
                centres.insert(centre, robot);
            }
        }
    }
    if !losers.is_empty() {
        drop_all(&mut movers, losers, &origin, &mut conflicts);
        drop_blocked(&mut movers, &holders, &origin, &mut conflicts);
    }

    conflicts.sort_by_key(|c| c.robot);
    Resolution { moves: movers.into_iter().collect(), conflicts }
}

/// Drop moves into cells whose holder stays put, until none are left.
fn drop_blocked(
    movers:    &mut BTreeMap<RobotId, Position>,
    holders:   &CellMap<RobotId>,
    origin:    &BTreeMap<RobotId, Position>,
    conflicts: &mut Vec<Conflict>,
) {
    loop {
        let losers: Vec<_> = movers
            .iter()
            .filter_map(|(&robot, &wanted)| {
                let &by = holders.get(&wanted)?;
                (!movers.contains_key(&by)).then_some((robot, wanted, ConflictKind::Blocked { by }))
            })
            .collect();
        if losers.is_empty() {
            break;
        }
        drop_all(movers, losers, origin, conflicts);
    }
}

fn drop_all(
    movers:    &mut BTreeMap<RobotId, Position>,
    losers:    Vec<(RobotId, Position, ConflictKind)>,
    origin:    &BTreeMap<RobotId, Position>,
    conflicts: &mut Vec<Conflict>,
) {
    for (robot, wanted, kind) in losers {
        if let Some(from) = movers.remove(&robot).and(origin.get(&robot).copied()) {
            conflicts.push(Conflict { robot, from, wanted, kind });
        }
    }
}
