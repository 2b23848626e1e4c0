use thiserror::Error;

use wh_core::CoreError;
use wh_layout::LayoutError;
use wh_oracle::OracleError;
use wh_registry::RegistryError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("no layout loaded")]
    NoLayoutLoaded,

    #[error("decision service rejected the environment: {0}")]
    OracleInitFailed(#[source] OracleError),

    #[error("simulation is not running")]
    NotRunning,

    #[error("operation not allowed while the simulation is running")]
    AlreadyRunning,

    /// Registry and grid disagree; the run has been stopped.
    #[error("simulation state inconsistent: {0}")]
    Inconsistent(String),

    /// The assignment policy produced pairs the registry cannot honour.
    #[error("assignment policy {policy} produced invalid output: {reason}")]
    Policy { policy: String, reason: String },

    #[error("could not build oracle worker pool: {0}")]
    WorkerPool(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
