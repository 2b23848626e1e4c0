//! `wh-oracle`: where robot actions come from.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`action`] | `Action` and its wire codes                                   |
//! | [`oracle`] | `ActionOracle` trait, `ActionRequest`, `Liveness`, `InitAck`  |
//! | [`retry`]  | `RetryPolicy`, `RetryingOracle`                               |
//! | [`noop`]   | `WaitOracle`                                                  |
//! | [`astar`]  | `PathfindingOracle`, `shortest_path`                          |
//! | `http`     | `HttpOracle` (feature `http`)                                 |
//! | [`error`]  | `OracleError`, `OracleResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag   | Effect                                                    |
//! |--------|-----------------------------------------------------------|
//! | `http` | Enables `HttpOracle`, backed by `ureq`.                   |

pub mod action;
pub mod astar;
pub mod error;
pub mod noop;
pub mod oracle;
pub mod retry;

#[cfg(feature = "http")]
pub mod http;


pub use action::Action;
pub use astar::{PathfindingOracle, shortest_path};
pub use error::{OracleError, OracleResult};
pub use noop::WaitOracle;
pub use oracle::{ActionOracle, ActionRequest, InitAck, Liveness};
pub use retry::{RetryPolicy, RetryingOracle};

#[cfg(feature = "http")]
pub use http::{ActionReply, HttpOracle};
