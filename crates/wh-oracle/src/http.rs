//! Blocking HTTP client for the remote decision service.
//!
//! # Endpoints
//!
//! | Method | Path          | Body                                              |
//! |--------|---------------|---------------------------------------------------|
//! | GET    | `/`           | -                                                 |
//! | POST   | `/init_env`   | `{"json_path": <absolute layout path>}`           |
//! | POST   | `/get_action` | `{"robot_id", "current_pos", "grid", "target"?}`  |
//!
//! Positions travel as `[row, col]` and the grid as rows of cell codes.
//!
//! # Robot ids
//!
//! Engine ids start at 1.  `robot_id` on the wire is shifted so that robot 1
//! is sent as `OracleConfig::first_robot_id`; a service that keys its
//! per-robot queues by `0..n` needs `first_robot_id = 0`, otherwise its
//! queue 0 is never served and robot `n` finds no queue.
//!
//! # Error mapping
//!
//! | Failure                          | `OracleError` |
//! |----------------------------------|---------------|
//! | request timed out                | `Timeout`     |
//! | connection failure, 5xx          | `Transport`   |
//! | other non-2xx, undecodable body  | `Protocol`    |

use std::error::Error as _;
use std::io;
use std::path::Path;
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use wh_core::{OracleConfig, Position, RobotId};

use crate::{Action, ActionOracle, ActionRequest, InitAck, Liveness, OracleError, OracleResult};

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GetActionBody {
    robot_id:    i64,
    current_pos: Position,
    grid:        Vec<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target:      Option<Position>,
    step:        u64,
}

#[derive(Serialize)]
struct InitEnvBody {
    json_path: String,
}

/// Body of a `/get_action` reply.  Only `action` is required.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ActionReply {
    pub action:          i64,
    #[serde(default)]
    pub target:          Option<Position>,
    #[serde(default)]
    pub remaining_tasks: Option<u32>,
    #[serde(default)]
    pub completed:       Option<bool>,
    #[serde(default)]
    pub message:         Option<String>,
}

// ── HttpOracle ────────────────────────────────────────────────────────────────

pub struct HttpOracle {
    agent:    ureq::Agent,
    endpoint: String,
    timeout:  Duration,
    first_id: u32,
}

impl HttpOracle {
    pub fn new(config: &OracleConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();
        Self {
            agent,
            endpoint: config.endpoint.trim_end_matches('/').to_owned(),
            timeout:  config.timeout(),
            first_id: config.first_robot_id,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The id the service knows `robot` by.
    pub fn wire_id(&self, robot: RobotId) -> i64 {
        i64::from(robot.0) - 1 + i64::from(self.first_id)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    fn map_error(&self, err: ureq::Error) -> OracleError {
        match err {
            ureq::Error::Status(code, _) if code >= 500 => {
                OracleError::Transport(format!("HTTP {code}"))
            }
            ureq::Error::Status(code, resp) => {
                let body = resp.into_string().unwrap_or_default();
                OracleError::Protocol(format!("HTTP {code}: {body}"))
            }
            ureq::Error::Transport(t) if is_timeout(&t) => OracleError::Timeout(self.timeout),
            ureq::Error::Transport(t) => OracleError::Transport(t.to_string()),
        }
    }
}

fn is_timeout(t: &ureq::Transport) -> bool {
    let mut source = t.source();
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<io::Error>() {
            if matches!(io.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) {
                return true;
            }
        }
        source = err.source();
    }
    t.to_string().contains("timed out")
}

impl ActionOracle for HttpOracle {
    fn request_action(&self, request: &ActionRequest<'_>) -> OracleResult<Action> {
        let body = GetActionBody {
            robot_id:    self.wire_id(request.robot),
            current_pos: request.position,
            grid:        request.grid.to_rows(),
            target:      request.target,
            step:        request.step.0,
        };
        let reply: ActionReply = self
            .agent
            .post(&self.url("/get_action"))
            .send_json(&body)
            .map_err(|e| self.map_error(e))?
            .into_json()
            .map_err(|e| OracleError::Protocol(e.to_string()))?;

        if let Some(message) = &reply.message {
            debug!("{}: service says {message:?}", request.robot);
        }
        Action::from_code(reply.action)
            .ok_or_else(|| OracleError::Protocol(format!("unknown action code {}", reply.action)))
    }

    fn probe(&self) -> Liveness {
        let resp = match self.agent.get(&self.url("/")).call() {
            Ok(resp) => resp,
            Err(e) => return Liveness::down(self.map_error(e).to_string()),
        };
        match resp.into_json::<serde_json::Value>() {
            Ok(value) => {
                let status = value.get("status").and_then(|s| s.as_str()).unwrap_or("ok");
                Liveness::up(status)
            }
            Err(e) => Liveness {
                connected: true,
                status:    None,
                error:     Some(e.to_string()),
            },
        }
    }

    fn init_env(&self, layout_path: &Path) -> OracleResult<InitAck> {
        let body = InitEnvBody { json_path: layout_path.display().to_string() };
        let ack: InitAck = self
            .agent
            .post(&self.url("/init_env"))
            .send_json(&body)
            .map_err(|e| OracleError::InitFailed(self.map_error(e).to_string()))?
            .into_json()
            .map_err(|e| OracleError::InitFailed(e.to_string()))?;

        if ack.status != "success" {
            return Err(OracleError::InitFailed(format!("service answered {:?}", ack.status)));
        }
        info!(
            "decision service initialised from {} ({} robots)",
            layout_path.display(),
            ack.robots.map_or_else(|| "?".to_owned(), |n| n.to_string())
        );
        Ok(ack)
    }
}
