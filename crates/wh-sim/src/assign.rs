//! Task assignment policies.
//!
//! After moves are committed and arrivals completed, the simulation asks its
//! [`AssignmentPolicy`] to pair idle robots with pending tasks.  The output
//! is checked before any of it is applied: every robot must be idle, every
//! item pending, and neither may appear twice.

use std::collections::BTreeSet;

use wh_core::{ItemId, Position, RobotId};

/// Pluggable strategy for handing pending tasks to idle robots.
///
/// Implement this trait to replace the default nearest-task rule with
/// zoning, batching, or anything else.  Implementations must be
/// deterministic for a run to be reproducible.
pub trait AssignmentPolicy: Send + Sync {
    /// Short name for logs and error messages.
    fn name(&self) -> &str;

    /// `idle` is ascending robot id; `pending` is in pool order.  Robots left
    /// out of the result stay idle until the next tick.
    fn assign(
        &self,
        idle:    &[(RobotId, Position)],
        pending: &[(ItemId, Position)],
    ) -> Vec<(RobotId, ItemId)>;
}

// ── NearestPending ────────────────────────────────────────────────────────────

/// Each idle robot, in ascending id order, takes the closest pending task by
/// Manhattan distance; ties go to the smaller item id.
#[derive(Copy, Clone, Debug, Default)]
pub struct NearestPending;

impl AssignmentPolicy for NearestPending {
    fn name(&self) -> &str {
        "nearest-pending"
    }

    fn assign(
        &self,
        idle:    &[(RobotId, Position)],
        pending: &[(ItemId, Position)],
    ) -> Vec<(RobotId, ItemId)> {
        let mut taken: BTreeSet<&ItemId> = BTreeSet::new();
        let mut out = Vec::new();
        for &(robot, pos) in idle {
            let best = pending
                .iter()
                .filter(|(item, _)| !taken.contains(item))
                .min_by(|(a, pa), (b, pb)| {
                    pos.manhattan(*pa).cmp(&pos.manhattan(*pb)).then_with(|| a.cmp(b))
                });
            let Some((item, _)) = best else { break };
            taken.insert(item);
            out.push((robot, item.clone()));
        }
        out
    }
}

// ── RoundRobin ────────────────────────────────────────────────────────────────

/// Deals pending tasks in pool order to idle robots in ascending id order,
/// ignoring distance.
#[derive(Copy, Clone, Debug, Default)]
pub struct RoundRobin;

impl AssignmentPolicy for RoundRobin {
    fn name(&self) -> &str {
        "round-robin"
    }

    fn assign(
        &self,
        idle:    &[(RobotId, Position)],
        pending: &[(ItemId, Position)],
    ) -> Vec<(RobotId, ItemId)> {
        idle.iter()
            .zip(pending)
            .map(|(&(robot, _), (item, _))| (robot, item.clone()))
            .collect()
    }
}
