//! `wh-sim`: the step coordinator for the warehouse simulation.
//!
//! # Tick loop
//!
//! ```text
//! while running:
//!   ① Check    : registry vs grid; any disagreement stops the run.
//!   ② Request  : one ActionOracle call per robot, all in flight at once
//!                 unless `max_in_flight` caps them; failures fall back
//!                 to Wait.
//!   ③ Resolve  : invalid → contested → swaps → blocked → crossings.
//!   ④ Commit   : Registry::commit_moves, all or nothing.
//!   ⑤ Tasks    : arrivals complete; AssignmentPolicy feeds idle robots.
//!   ⑥ Publish  : step += 1; SimHandle + observer see the new state.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | A capped fan-out runs on a Rayon pool (default).       |
//! | `fx-hash`  | FxHash for the conflict and occupancy maps.            |
//! | `http`     | Enables `wh_oracle::HttpOracle`.                       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use wh_core::{Position, SimConfig};
//! use wh_layout::Layout;
//! use wh_oracle::PathfindingOracle;
//! use wh_sim::{NoopObserver, SimBuilder};
//!
//! let layout = Layout::default_layout()
//!     .with_robot(1, Position::new(1, 1))
//!     .with_task("A", Position::new(5, 5));
//! let mut sim = SimBuilder::new(SimConfig::default(), PathfindingOracle::default())
//!     .layout(layout)
//!     .build()?;
//! sim.start()?;
//! sim.run_ticks(20, &mut NoopObserver)?;
//! ```

pub mod assign;
pub mod builder;
pub mod error;
pub mod handle;
pub mod observer;
pub mod report;
pub mod resolve;
pub mod sim;
pub mod snapshot;


pub use assign::{AssignmentPolicy, NearestPending, RoundRobin};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use handle::SimHandle;
pub use observer::{NoopObserver, SimObserver};
pub use report::{Conflict, ConflictKind, SimStats, TickReport};
pub use resolve::{Proposal, Resolution, resolve};
pub use sim::Simulation;
pub use snapshot::{RobotPosition, SimulationState};
