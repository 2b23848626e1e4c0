use std::time::Duration;

use thiserror::Error;

use wh_core::RobotId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("decision service did not answer within {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decision service unavailable for {robot} after {attempts} attempts: {last}")]
    Unavailable {
        robot:    RobotId,
        attempts: u32,
        last:     String,
    },

    #[error("malformed reply from decision service: {0}")]
    Protocol(String),

    #[error("environment initialisation failed: {0}")]
    InitFailed(String),
}

impl OracleError {
    /// Errors worth another attempt.  Timeouts are excluded so one request
    /// never costs more than a single timeout.
    pub fn is_transient(&self) -> bool {
        matches!(self, OracleError::Transport(_))
    }
}

pub type OracleResult<T> = Result<T, OracleError>;
