//! The `Simulation` struct and its tick loop.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use log::{debug, error, info, warn};

use wh_core::{ItemId, Position, RobotId, SimConfig, Step};
use wh_grid::Grid;
use wh_layout::{Layout, LayoutStore, RobotSpec, TaskSpec};
use wh_oracle::{Action, ActionOracle, ActionRequest, Liveness, OracleResult};
use wh_registry::Registry;

use crate::resolve::{Proposal, resolve};
use crate::{
    AssignmentPolicy, RobotPosition, SimError, SimHandle, SimObserver, SimResult, SimStats,
    SimulationState, TickReport,
};

// ── Per-robot inputs assembled before the request phase ───────────────────────

/// What one robot looks like at tick start.  Collected sequentially so the
/// (potentially parallel) request phase only reads immutable data.
#[derive(Copy, Clone, Debug)]
struct RobotView {
    id:       RobotId,
    position: Position,
    target:   Option<Position>,
}

/// The loaded layout's identity.
struct Loaded {
    grid: Arc<Grid>,
    name: String,
    /// Absolute path handed to the decision service, if the layout has one.
    path: Option<PathBuf>,
    /// Set once the decision service has accepted this layout.
    env_ready: bool,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// The step coordinator.
///
/// `Simulation<O>` owns the registry and drives the tick loop:
///
/// 1. **Check**: registry and grid must agree, or the run stops.
/// 2. **Request** (parallel with the `parallel` feature): one oracle request
///    per robot, all against the same tick-start state.  A failed request
///    becomes `Wait`.
/// 3. **Resolve**: proposals are turned into a conflict-free move set (see
///    [`resolve`][crate::resolve]).
/// 4. **Commit**: moves are applied to the registry as one batch.
/// 5. **Tasks**: arrivals complete their tasks, then idle robots are given
///    new ones by the [`AssignmentPolicy`].
/// 6. **Publish**: the step advances and the new state goes to the
///    [`SimHandle`] and the observer.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation<O: ActionOracle> {
    pub(crate) config:   SimConfig,
    pub(crate) oracle:   O,
    pub(crate) policy:   Box<dyn AssignmentPolicy>,
    pub(crate) registry: Registry,
    pub(crate) step:     Step,
    pub(crate) stats:    SimStats,
    pub(crate) handle:   SimHandle,
    loaded:              Option<Loaded>,
    /// Enforces `max_in_flight` when one is configured.
    #[cfg(feature = "parallel")]
    pub(crate) pool:     Option<rayon::ThreadPool>,
    /// Extra (robot, item) completions attempted after the real arrivals.
    #[cfg(test)]
    pub(crate) extra_arrivals: Vec<(RobotId, ItemId)>,
}

impl<O: ActionOracle> Simulation<O> {
    #[cfg(feature = "parallel")]
    pub(crate) fn new(
        config: SimConfig,
        oracle: O,
        policy: Box<dyn AssignmentPolicy>,
        pool:   Option<rayon::ThreadPool>,
    ) -> Self {
        Self {
            config,
            oracle,
            policy,
            registry: Registry::new(),
            step: Step::ZERO,
            stats: SimStats::default(),
            handle: SimHandle::new(),
            loaded: None,
            pool,
            #[cfg(test)]
            extra_arrivals: Vec::new(),
        }
    }

    #[cfg(not(feature = "parallel"))]
    pub(crate) fn new(config: SimConfig, oracle: O, policy: Box<dyn AssignmentPolicy>) -> Self {
        Self {
            config,
            oracle,
            policy,
            registry: Registry::new(),
            step: Step::ZERO,
            stats: SimStats::default(),
            handle: SimHandle::new(),
            loaded: None,
            #[cfg(test)]
            extra_arrivals: Vec::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.loaded.as_ref().map(|l| l.grid.as_ref())
    }

    pub fn layout_name(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.name.as_str())
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    /// A handle for stopping the run or polling its state from elsewhere.
    pub fn handle(&self) -> SimHandle {
        self.handle.clone()
    }

    /// The current snapshot.  Reads only; two calls with no tick in between
    /// return equal values.
    pub fn current_state(&self) -> SimulationState {
        SimulationState {
            running:         self.handle.is_running(),
            step:            self.step,
            robot_positions: self
                .registry
                .robots()
                .map(|r| RobotPosition { id: r.id, pos: r.position })
                .collect(),
            targets:         self.registry.open_targets(),
        }
    }

    /// Liveness of the decision source.  Never fails.
    pub fn probe_oracle(&self) -> Liveness {
        self.oracle.probe()
    }

    // ── Layout lifecycle ──────────────────────────────────────────────────

    /// Load `name` from `store` and make it the active layout.
    ///
    /// # Errors
    ///
    /// `AlreadyRunning` while running; store errors unchanged; layout
    /// validation errors.
    pub fn load_layout<S: LayoutStore + ?Sized>(&mut self, store: &S, name: &str) -> SimResult<()> {
        if self.handle.is_running() {
            return Err(SimError::AlreadyRunning);
        }
        let layout = store.load(name)?;
        self.set_layout(layout, store.path_of(name))
    }

    /// Make `layout` the active layout, resetting the step counter.
    ///
    /// `path` is the file the decision service should read during the
    /// handshake; `None` skips the handshake.
    pub fn set_layout(&mut self, layout: Layout, path: Option<PathBuf>) -> SimResult<()> {
        if self.handle.is_running() {
            return Err(SimError::AlreadyRunning);
        }
        let grid = layout.validate()?;

        let mut registry = Registry::new();
        for robot in &layout.robots {
            registry.spawn_robot(&grid, robot.id, robot.spawn_pos)?;
        }
        for task in &layout.task_pool {
            registry.add_task(&grid, task.item_id.clone(), task.pos)?;
        }

        info!(
            "loaded layout {:?}: {}x{}, {} robots, {} tasks",
            layout.layout_name,
            grid.width(),
            grid.height(),
            layout.robots.len(),
            layout.task_pool.len()
        );

        self.registry = registry;
        self.step = Step::ZERO;
        self.loaded = Some(Loaded {
            grid: Arc::new(grid),
            name: layout.layout_name,
            path,
            env_ready: false,
        });
        let assigned = self.assign_idle()?;
        self.stats.tasks_assigned += assigned.len() as u64;
        self.publish();
        Ok(())
    }

    /// The current run as a layout document: robots at their present cells
    /// and the still-open task pool.
    pub fn export_layout(&self, name: &str) -> SimResult<Layout> {
        let loaded = self.loaded.as_ref().ok_or(SimError::NoLayoutLoaded)?;
        Ok(Layout {
            layout_name: name.to_owned(),
            grid_size:   loaded.grid.size(),
            map_data:    loaded.grid.to_rows(),
            robots:      self
                .registry
                .robots()
                .map(|r| RobotSpec { id: r.id, spawn_pos: r.position })
                .collect(),
            task_pool:   self
                .registry
                .open_tasks()
                .into_iter()
                .map(|t| TaskSpec { item_id: t.item.clone(), pos: t.target })
                .collect(),
        })
    }

    /// [`export_layout`][Self::export_layout] and store the result.
    pub fn save_layout<S: LayoutStore + ?Sized>(&self, store: &S, name: &str) -> SimResult<()> {
        let layout = self.export_layout(name)?;
        store.save(&layout, name)?;
        Ok(())
    }

    // ── Run control ───────────────────────────────────────────────────────

    /// `Stopped → Running`.
    ///
    /// The first start after a load performs the decision-service handshake
    /// when the layout has a file path.  Starting while running is a no-op.
    ///
    /// # Errors
    ///
    /// `NoLayoutLoaded`; `OracleInitFailed` if the handshake is refused, in
    /// which case the simulation stays stopped.
    pub fn start(&mut self) -> SimResult<()> {
        let loaded = self.loaded.as_mut().ok_or(SimError::NoLayoutLoaded)?;
        if self.handle.is_running() {
            return Ok(());
        }
        if !loaded.env_ready {
            if let Some(path) = &loaded.path {
                self.oracle.init_env(path).map_err(|e| {
                    error!("decision service rejected {}: {e}", path.display());
                    SimError::OracleInitFailed(e)
                })?;
            }
            loaded.env_ready = true;
        }
        self.handle.set_running(true);
        info!("simulation started at {}", self.step);
        self.publish();
        Ok(())
    }

    /// `Running → Stopped`.  Always valid.
    pub fn stop(&mut self) {
        if self.handle.is_running() {
            info!("simulation stopped at {}", self.step);
        }
        self.handle.stop();
        self.publish();
    }

    /// Run until stopped (from a [`SimHandle`] or by `config.max_steps`).
    ///
    /// Starts the simulation first if it is not running.  Calls
    /// `on_sim_end` when the loop ends without error.
    pub fn run<Obs: SimObserver>(&mut self, observer: &mut Obs) -> SimResult<()> {
        self.start()?;
        while self.handle.is_running() {
            if self.config.max_steps.is_some_and(|max| self.step.0 >= max) {
                self.stop();
                break;
            }
            self.tick(observer)?;
        }
        observer.on_sim_end(self.step, &self.stats);
        Ok(())
    }

    /// Run at most `n` ticks, stopping early if the run is stopped.  Returns
    /// the number of ticks committed.
    pub fn run_ticks<Obs: SimObserver>(&mut self, n: u64, observer: &mut Obs) -> SimResult<u64> {
        if !self.handle.is_running() {
            return Err(SimError::NotRunning);
        }
        let mut done = 0;
        while done < n && self.handle.is_running() {
            self.tick(observer)?;
            done += 1;
        }
        Ok(done)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    /// Advance one step.
    ///
    /// # Errors
    ///
    /// `NotRunning` if stopped.  `Inconsistent` or `Policy` abort the tick
    /// and stop the run; the last published state stays valid.
    pub fn tick<Obs: SimObserver>(&mut self, observer: &mut Obs) -> SimResult<TickReport> {
        if !self.handle.is_running() {
            return Err(SimError::NotRunning);
        }
        let grid = match &self.loaded {
            Some(loaded) => Arc::clone(&loaded.grid),
            None => return Err(SimError::NoLayoutLoaded),
        };
        let now = self.step;
        observer.on_tick_start(now);

        // ── Phase 1: consistency and snapshot ─────────────────────────────
        if let Err(e) = self.registry.check_consistency(&grid) {
            return Err(self.abort(SimError::Inconsistent(e.to_string())));
        }
        let views: Vec<RobotView> = self
            .registry
            .robots()
            .map(|r| RobotView {
                id:       r.id,
                position: r.position,
                target:   r.assignment().and_then(|item| self.registry.task(item).ok()).map(|t| t.target),
            })
            .collect();

        // ── Phase 2: request actions (fan out / fan in) ───────────────────
        let replies = self.request_actions(&grid, &views);

        let mut report = TickReport { step: now, ..TickReport::default() };
        let mut proposals = Vec::with_capacity(views.len());
        for (view, reply) in views.iter().zip(replies) {
            let action = match reply {
                Ok(action) => action,
                Err(e) => {
                    warn!("{now} {}: oracle failed, waiting: {e}", view.id);
                    observer.on_oracle_failure(now, view.id, &e);
                    report.oracle_failures.push(view.id);
                    Action::Wait
                }
            };
            report.actions.push((view.id, action));
            proposals.push(Proposal { robot: view.id, from: view.position, action });
        }

        // ── Phase 3: resolve conflicts ────────────────────────────────────
        let resolution = resolve(&grid, self.config.connectivity, &proposals);
        for conflict in &resolution.conflicts {
            debug!(
                "{now} {}: move {} -> {} refused ({:?})",
                conflict.robot, conflict.from, conflict.wanted, conflict.kind
            );
        }

        // ── Phase 4: commit ───────────────────────────────────────────────
        self.registry.begin_tick();
        if let Err(e) = self.registry.commit_moves(&grid, &resolution.moves) {
            return Err(self.abort(SimError::Inconsistent(format!("commit failed: {e}"))));
        }
        report.moved = resolution.moves.len();
        report.waited = views.len() - report.moved;
        report.blocked = resolution.conflicts;

        // ── Phase 5: tasks ────────────────────────────────────────────────
        //
        // Moves are committed now, so a failure here still closes the tick:
        // the step advances with them before the run stops.
        let tasks = self.complete_arrivals().and_then(|completed| {
            report.completed = completed;
            self.assign_idle()
        });
        report.assigned = match tasks {
            Ok(assigned) => assigned,
            Err(e) => {
                self.step = now.next();
                self.stats.record(&report);
                return Err(self.abort(e));
            }
        };

        // ── Phase 6: publish ──────────────────────────────────────────────
        self.step = now.next();
        self.stats.record(&report);
        let state = self.current_state();
        self.handle.publish(state.clone());

        debug!(
            "{now}: {} moved, {} waited, {} conflicts, {} oracle failures",
            report.moved,
            report.waited,
            report.blocked.len(),
            report.oracle_failures.len()
        );
        observer.on_tick_end(&report);
        if self.step.is_on_interval(self.config.snapshot_interval_steps) {
            observer.on_snapshot(&state);
        }
        Ok(report)
    }

    /// One oracle request per robot.  Replies keep `views` order.
    ///
    /// With `max_in_flight` unset every robot gets its own scoped thread, so
    /// a tick costs one round trip however many robots there are.  A cap runs
    /// the requests on the Rayon pool (feature `parallel`) or in batches of
    /// `cap` threads.
    fn request_actions(&self, grid: &Grid, views: &[RobotView]) -> Vec<OracleResult<Action>> {
        let step = self.step;
        let oracle = &self.oracle;
        let ask = |view: &RobotView| {
            oracle.request_action(&ActionRequest {
                robot:    view.id,
                position: view.position,
                target:   view.target,
                step,
                grid,
            })
        };

        #[cfg(feature = "parallel")]
        if let Some(pool) = &self.pool {
            use rayon::prelude::*;

            return pool.install(|| views.par_iter().map(ask).collect());
        }

        let batch = self.config.max_in_flight.unwrap_or(views.len()).max(1);
        let mut replies = Vec::with_capacity(views.len());
        for chunk in views.chunks(batch) {
            if let [view] = chunk {
                replies.push(ask(view));
                continue;
            }
            let ask = &ask;
            thread::scope(|scope| {
                let workers: Vec<_> = chunk.iter().map(|view| scope.spawn(move || ask(view))).collect();
                for worker in workers {
                    match worker.join() {
                        Ok(reply) => replies.push(reply),
                        Err(panic) => std::panic::resume_unwind(panic),
                    }
                }
            });
        }
        replies
    }

    /// Complete every assigned task whose robot stands on its target.
    ///
    /// A robot holding a task the registry cannot find, or a completion the
    /// registry refuses, is an inconsistency.
    pub(crate) fn complete_arrivals(&mut self) -> SimResult<Vec<(RobotId, ItemId)>> {
        let mut arrived = Vec::new();
        for robot in self.registry.robots() {
            let Some(item) = robot.assignment() else { continue };
            let task = self.registry.task(item).map_err(|e| {
                SimError::Inconsistent(format!("{} holds task {item}: {e}", robot.id))
            })?;
            if task.target == robot.position {
                arrived.push((robot.id, item.clone()));
            }
        }
        #[cfg(test)]
        arrived.extend(self.extra_arrivals.drain(..));

        let mut completed = Vec::with_capacity(arrived.len());
        for (robot, item) in arrived {
            self.registry.complete_task(&item).map_err(|e| {
                SimError::Inconsistent(format!("{robot} could not complete task {item}: {e}"))
            })?;
            debug!("{robot} completed task {item}");
            completed.push((robot, item));
        }
        Ok(completed)
    }

    /// Ask the policy for new assignments and apply them after checking
    /// every pair.
    fn assign_idle(&mut self) -> SimResult<Vec<(RobotId, ItemId)>> {
        let idle = self.registry.idle_robots();
        let pending = self.registry.pending_tasks();
        if idle.is_empty() || pending.is_empty() {
            return Ok(Vec::new());
        }
        let pairs = self.policy.assign(&idle, &pending);

        let idle_ids: BTreeSet<RobotId> = idle.iter().map(|&(r, _)| r).collect();
        let pending_ids: BTreeSet<&ItemId> = pending.iter().map(|(i, _)| i).collect();
        let mut seen_robots = BTreeSet::new();
        let mut seen_items = BTreeSet::new();
        for (robot, item) in &pairs {
            let reason = if !idle_ids.contains(robot) {
                Some(format!("{robot} is not idle"))
            } else if !pending_ids.contains(item) {
                Some(format!("task {item} is not pending"))
            } else if !seen_robots.insert(*robot) {
                Some(format!("{robot} assigned twice"))
            } else if !seen_items.insert(item) {
                Some(format!("task {item} assigned twice"))
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(SimError::Policy { policy: self.policy.name().to_owned(), reason });
            }
        }

        for (robot, item) in &pairs {
            self.registry.assign_task(*robot, item)?;
        }
        Ok(pairs)
    }

    /// Stop the run after a fatal tick error and hand the error back.
    fn abort(&mut self, err: SimError) -> SimError {
        error!("{}: tick aborted, stopping: {err}", self.step);
        self.handle.stop();
        self.publish();
        err
    }

    fn publish(&self) {
        self.handle.publish(self.current_state());
    }
}
