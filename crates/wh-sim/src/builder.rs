//! Fluent builder for constructing a [`Simulation`].

use std::path::PathBuf;

use wh_core::SimConfig;
use wh_layout::Layout;
use wh_oracle::ActionOracle;

use crate::{AssignmentPolicy, NearestPending, SimResult, Simulation};

/// Fluent builder for [`Simulation<O>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: connectivity, fan-out cap, snapshot interval, …
/// - `O: ActionOracle`: where actions come from
///
/// # Optional inputs (have defaults)
///
/// | Method                      | Default                          |
/// |-----------------------------|----------------------------------|
/// | `.policy(p)`                | [`NearestPending`]               |
/// | `.layout(l)`                | none; load one later             |
/// | `.layout_with_path(l, p)`   | none; `p` is sent in the handshake |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, PathfindingOracle::default())
///     .layout(Layout::default_layout().with_robot(1, Position::new(1, 1)))
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<O: ActionOracle> {
    config: SimConfig,
    oracle: O,
    policy: Option<Box<dyn AssignmentPolicy>>,
    layout: Option<(Layout, Option<PathBuf>)>,
}

impl<O: ActionOracle> SimBuilder<O> {
    pub fn new(config: SimConfig, oracle: O) -> Self {
        Self { config, oracle, policy: None, layout: None }
    }

    pub fn policy(mut self, policy: impl AssignmentPolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    /// Load `layout` at build time, with no file path (the decision-service
    /// handshake is skipped).
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some((layout, None));
        self
    }

    /// Load `layout` at build time; `path` is handed to the decision service
    /// on the first `start`.
    pub fn layout_with_path(mut self, layout: Layout, path: impl Into<PathBuf>) -> Self {
        self.layout = Some((layout, Some(path.into())));
        self
    }

    /// Validate the configuration, build the worker pool, and load the
    /// layout if one was given.
    pub fn build(self) -> SimResult<Simulation<O>> {
        self.config.validate()?;
        let policy = self.policy.unwrap_or_else(|| Box::new(NearestPending));

        // A Rayon pool only enforces an explicit cap.  Uncapped fan-out gets
        // one scoped thread per robot in `Simulation::request_actions`.
        #[cfg(feature = "parallel")]
        let mut sim = {
            let pool = match self.config.max_in_flight {
                Some(cap) => Some(
                    rayon::ThreadPoolBuilder::new()
                        .num_threads(cap)
                        .thread_name(|i| format!("wh-oracle-{i}"))
                        .build()
                        .map_err(|e| crate::SimError::WorkerPool(e.to_string()))?,
                ),
                None => None,
            };
            Simulation::new(self.config, self.oracle, policy, pool)
        };

        #[cfg(not(feature = "parallel"))]
        let mut sim = Simulation::new(self.config, self.oracle, policy);

        if let Some((layout, path)) = self.layout {
            sim.set_layout(layout, path)?;
        }
        Ok(sim)
    }
}
