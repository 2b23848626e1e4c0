use crate::{Action, ActionOracle, ActionRequest, OracleResult};

/// An oracle that keeps every robot in place.
#[derive(Copy, Clone, Debug, Default)]
pub struct WaitOracle;

impl ActionOracle for WaitOracle {
    fn request_action(&self, _request: &ActionRequest<'_>) -> OracleResult<Action> {
        Ok(Action::Wait)
    }
}
