//! `wayfind`: run one search strategy over one state space and watch it.

#![forbid(unsafe_code)]

use std::fmt::Display;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wayfind_harness::config::{RunConfig, SpaceKind};
use wayfind_harness::render::render_grid;
use wayfind_harness::runner::{run, Control, RunOutcome, RunReport, StepObserver};
use wayfind_harness::transcript::{write_transcript, TranscriptRecorder};
use wayfind_harness::worlds::autocorrect::StringNode;
use wayfind_harness::worlds::grid::GridNode;
use wayfind_harness::worlds::puzzle::PuzzleNode;
use wayfind_search::instrument::instrumented_search;
use wayfind_search::{SearchNode, SearchPolicy, Snapshot, Strategy};

/// Step-by-step graph search over a grid, a sliding puzzle, or a misspelling.
#[derive(Parser)]
#[command(name = "wayfind", version, about)]
struct Cli {
    /// depthfirst, breadthfirst, bestfirst, iterativedeepening, or astar.
    strategy: Strategy,

    /// grid, puzzle, or autocorrect.
    space: SpaceKind,

    /// TOML run configuration. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cancel after this many steps.
    #[arg(long)]
    max_steps: Option<u64>,

    /// Highest depth bound for iterative deepening.
    #[arg(long)]
    max_depth_bound: Option<u32>,

    /// Print every snapshot (the grid as ASCII, other spaces as a line).
    #[arg(long)]
    render: bool,

    /// Write a step transcript (JSON lines) to this file.
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Puzzle shuffle seed.
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<(RunConfig, Options)> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };
        config.strategy = self.strategy;
        config.space = self.space;
        if self.max_steps.is_some() {
            config.max_steps = self.max_steps;
        }
        if self.max_depth_bound.is_some() {
            config.max_depth_bound = self.max_depth_bound;
        }
        if let Some(seed) = self.seed {
            config.puzzle.seed = seed;
        }
        let options = Options {
            render: self.render,
            transcript: self.transcript,
        };
        Ok((config, options))
    }
}

struct Options {
    render: bool,
    transcript: Option<PathBuf>,
}

/// Per-step work: transcript, op tally sample, optional frame.
struct Driver<'a, N> {
    recorder: TranscriptRecorder,
    tally: wayfind_search::instrument::Tally,
    frame: Option<&'a dyn Fn(&Snapshot<N>) -> String>,
}

impl<N: SearchNode + Display> StepObserver<N> for Driver<'_, N> {
    fn on_step(&mut self, step: u64, snapshot: &Snapshot<N>) -> Control {
        self.tally.sample();
        if let Some(frame) = self.frame {
            let counts = self.tally.counts();
            println!(
                "step {step}  ops {}  space {}\n{}",
                counts.total_ops(),
                counts.space(),
                frame(snapshot)
            );
        }
        self.recorder.on_step(step, snapshot)
    }
}

fn drive<N: SearchNode + Display + 'static>(
    start: N,
    config: &RunConfig,
    options: &Options,
    frame: &dyn Fn(&Snapshot<N>) -> String,
    describe: &dyn Fn(&[N]) -> String,
) -> anyhow::Result<()> {
    let policy: SearchPolicy = config.policy()?;
    let (mut search, tally) = instrumented_search(start, policy)?;
    let mut driver = Driver {
        recorder: TranscriptRecorder::new(config.strategy, config.space.name()),
        tally: tally.clone(),
        frame: options.render.then_some(frame),
    };

    let report = run(&mut search, config.max_steps, &mut driver)?;
    print_report(&report, describe);
    let counts = tally.counts();
    println!(
        "operations: {} (frontier {}, ledger {}), peak space: {}",
        counts.total_ops(),
        counts.frontier_ops,
        counts.ledger_ops,
        counts.peak_space
    );

    if let Some(path) = &options.transcript {
        let transcript = driver.recorder.finish(report.outcome.label());
        write_transcript(path, &transcript)
            .with_context(|| format!("writing transcript to {}", path.display()))?;
        println!("transcript: {} ({})", path.display(), transcript.digest()?);
    }
    Ok(())
}

fn print_report<N: SearchNode + Display>(report: &RunReport<N>, describe: &dyn Fn(&[N]) -> String) {
    match &report.outcome {
        RunOutcome::GoalReached(goal) => {
            println!(
                "goal {goal} reached after {} steps, path cost {}",
                report.steps,
                goal.cost()
            );
            println!("{}", describe(&report.path));
        }
        RunOutcome::Exhausted => println!("no goal reachable ({} steps)", report.steps),
        RunOutcome::Cancelled { reason } => {
            println!("cancelled ({reason:?}) after {} steps", report.steps);
        }
    }
    let s = report.stats;
    println!(
        "expansions: {}, duplicates suppressed: {}, stale pops: {}, depth cutoffs: {}, \
         bound restarts: {}, frontier high water: {}",
        s.expansions,
        s.duplicates_suppressed,
        s.stale_pops,
        s.depth_cutoffs,
        s.bound_restarts,
        s.frontier_high_water
    );
}

fn join_path<N: Display>(path: &[N]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let (config, options) = Cli::parse().into_config()?;
    tracing::info!(strategy = %config.strategy, space = %config.space, "starting");

    match config.space {
        SpaceKind::Grid => {
            let space = config.grid_space()?;
            let frame = |s: &Snapshot<GridNode>| render_grid(&space, s, s.current.is_goal());
            drive(space.start_node(), &config, &options, &frame, &join_path::<GridNode>)
        }
        SpaceKind::Puzzle => {
            let space = config.puzzle_space()?;
            println!("start: {}", space.start_node());
            let frame =
                |s: &Snapshot<PuzzleNode>| format!("{} (frontier {})", s.current, s.frontier.len());
            drive(space.start_node(), &config, &options, &frame, &join_path::<PuzzleNode>)
        }
        SpaceKind::Autocorrect => {
            let space = config.autocorrect_space()?;
            let frame =
                |s: &Snapshot<StringNode>| format!("{} (frontier {})", s.current, s.frontier.len());
            let describe = |path: &[StringNode]| {
                path.last()
                    .map(StringNode::describe_path)
                    .unwrap_or_default()
            };
            drive(space.start_node(), &config, &options, &frame, &describe)
        }
    }
}
