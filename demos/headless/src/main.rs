//! headless: run the warehouse simulation without a UI.
//!
//! With no arguments a 20×20 bordered warehouse with four robots and a
//! handful of tasks is simulated against the in-process A* planner, and
//! output lands in `output/headless/`.  `--layout` loads a saved layout
//! instead; `--remote` (feature `http`) asks the decision service at
//! `config.oracle.endpoint` for every move.
//!
//! Set `RUST_LOG=debug` for per-tick logging.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use wh_core::{Position, SimConfig};
use wh_layout::{FileLayoutStore, Layout, LayoutStore};
use wh_oracle::{ActionOracle, PathfindingOracle};
use wh_output::{CsvWriter, JsonLinesWriter, OutputWriter, SimOutputObserver};
use wh_sim::{SimBuilder, SimObserver, SimStats, SimulationState, TickReport};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_STEPS:  u64 = 60;
const DEFAULT_OUTPUT: &str = "output/headless";

const ROBOTS: [(u32, Position); 4] = [
    (1, Position::new(1, 1)),
    (2, Position::new(18, 1)),
    (3, Position::new(1, 18)),
    (4, Position::new(18, 18)),
];

const TASKS: [(&str, Position); 6] = [
    ("shelf-a", Position::new(5, 5)),
    ("shelf-b", Position::new(14, 5)),
    ("shelf-c", Position::new(5, 14)),
    ("shelf-d", Position::new(14, 14)),
    ("dock-1", Position::new(10, 2)),
    ("dock-2", Position::new(10, 17)),
];

// ── CLI ───────────────────────────────────────────────────────────────────────

/// Command-line arguments for a headless simulation run.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with a `SimConfig`; missing fields take their defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding saved layouts.
    #[arg(long, value_name = "DIR", default_value = "layouts")]
    layout_dir: PathBuf,

    /// Layout to load from `--layout-dir`.  Without it the built-in demo
    /// warehouse is used.
    #[arg(long, value_name = "NAME")]
    layout: Option<String>,

    /// Save the final robot positions and open tasks under this name.
    #[arg(long, value_name = "NAME")]
    save_as: Option<String>,

    /// Steps to run when the config sets no `max_steps`.
    #[arg(long, default_value_t = DEFAULT_STEPS)]
    steps: u64,

    /// Output directory for CSV and JSON-lines files.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Write `states.jsonl` instead of CSV.
    #[arg(long)]
    jsonl: bool,

    /// Ask the decision service for actions instead of planning in-process.
    #[cfg(feature = "http")]
    #[arg(long)]
    remote: bool,
}

// ── Observer wrapper to count rows ────────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:     SimOutputObserver<W>,
    snapshots: usize,
    summaries: usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, snapshots: 0, summaries: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_tick_end(&mut self, report: &TickReport) {
        self.summaries += 1;
        self.inner.on_tick_end(report);
    }

    fn on_snapshot(&mut self, state: &SimulationState) {
        self.snapshots += 1;
        self.inner.on_snapshot(state);
    }

    fn on_sim_end(&mut self, final_step: wh_core::Step, stats: &SimStats) {
        self.inner.on_sim_end(final_step, stats);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimConfig::default(),
    };
    if config.max_steps.is_none() {
        config.max_steps = Some(args.steps);
    }

    #[cfg(feature = "http")]
    if args.remote {
        use wh_oracle::{HttpOracle, RetryPolicy, RetryingOracle};

        let oracle = RetryingOracle::new(
            HttpOracle::new(&config.oracle),
            RetryPolicy::from_config(&config.oracle),
        );
        return simulate(&args, config, oracle);
    }

    let oracle = PathfindingOracle::new(config.connectivity);
    simulate(&args, config, oracle)
}

fn load_config(path: &Path) -> Result<SimConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: SimConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn demo_layout() -> Layout {
    let layout = ROBOTS
        .iter()
        .fold(Layout::default_layout(), |l, &(id, pos)| l.with_robot(id, pos));
    TASKS.iter().fold(layout, |l, &(item, pos)| l.with_task(item, pos))
}

fn simulate<O: ActionOracle>(args: &Args, config: SimConfig, oracle: O) -> Result<()> {
    let store = FileLayoutStore::new(&args.layout_dir);
    let mut builder = SimBuilder::new(config, oracle);
    builder = match &args.layout {
        Some(name) => {
            let layout = store.load(name).with_context(|| format!("loading layout {name:?}"))?;
            match store.path_of(name) {
                Some(path) => builder.layout_with_path(layout, path),
                None => builder.layout(layout),
            }
        }
        None => builder.layout(demo_layout()),
    };
    let mut sim = builder.build()?;

    let liveness = sim.probe_oracle();
    info!(
        "decision source: connected={} status={}",
        liveness.connected,
        liveness.status.as_deref().unwrap_or("-")
    );

    let t0 = Instant::now();
    let (snapshots, summaries, write_error) = if args.jsonl {
        let writer = JsonLinesWriter::new(&args.output)?;
        let mut obs = CountingObserver::new(SimOutputObserver::new(writer));
        sim.run(&mut obs)?;
        (obs.snapshots, obs.summaries, obs.inner.take_error())
    } else {
        let writer = CsvWriter::new(&args.output)?;
        let mut obs = CountingObserver::new(SimOutputObserver::new(writer));
        sim.run(&mut obs)?;
        (obs.snapshots, obs.summaries, obs.inner.take_error())
    };
    let elapsed = t0.elapsed();

    if let Some(e) = write_error {
        eprintln!("output error: {e}");
    }

    let stats = sim.stats();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  steps            : {}", sim.step());
    println!("  moves / waits    : {} / {}", stats.moves, stats.waits);
    println!("  conflicts        : {}", stats.conflicts);
    println!("  oracle failures  : {}", stats.oracle_failures);
    println!("  tasks assigned   : {}", stats.tasks_assigned);
    println!("  tasks completed  : {}", stats.tasks_completed);
    println!("  snapshots        : {snapshots}");
    println!("  tick summaries   : {summaries}");
    println!();

    println!("{:<8} {:<6} {:<6}", "Robot", "Row", "Col");
    println!("{}", "-".repeat(22));
    for robot in &sim.current_state().robot_positions {
        println!("{:<8} {:<6} {:<6}", robot.id.0, robot.pos.y, robot.pos.x);
    }

    if let Some(name) = &args.save_as {
        sim.save_layout(&store, name)?;
        println!();
        println!("saved layout {name:?} to {}", store.file_for(name).display());
    }
    Ok(())
}
