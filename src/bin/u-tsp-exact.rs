//! Command-line front end: reads an instance from JSON, solves it, prints the tour.
//!
//! Accepted input shapes:
//!
//! - a list of points: `[[0, 0], [1, 0], [1, 1]]`
//! - a serialized [`Instance`] with explicit costs:
//!   `{"vertices": [{"x": 0, "y": 0}, ...], "distances": {"data": [...], "size": n}}`

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use env_logger::{fmt::Formatter, Builder, Target};
use log::{info, Level, LevelFilter};
use serde::Deserialize;

use u_tsp_exact::models::Instance;
use u_tsp_exact::search::SearchControl;
use u_tsp_exact::{BranchAndBound, Result, SolveStatus, SolverConfig, TspError};

#[derive(Parser)]
#[command(name = "u-tsp-exact")]
#[command(about = "Exact TSP solver (branch-and-bound over MTZ relaxations)", long_about = None)]
struct Cli {
    /// JSON file with the instance
    input: PathBuf,

    /// Wall-clock limit in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Maximum number of search nodes
    #[arg(long)]
    node_limit: Option<u64>,

    /// Worker threads
    #[arg(short, long, default_value = "1")]
    threads: usize,

    /// Seed the search with a nearest-neighbour + 2-opt tour
    #[arg(long)]
    warm_start: bool,

    /// Integrality tolerance
    #[arg(long, default_value = "1e-6")]
    epsilon: f64,

    /// Print the per-node trace as JSON after the tour
    #[arg(long)]
    trace: bool,

    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InputFile {
    Points(Vec<(f64, f64)>),
    Instance(Instance),
}

fn init_logger(level: LogLevel) -> io::Result<()> {
    Builder::new()
        .filter_level(level.to_filter())
        .write_style(env_logger::WriteStyle::Never)
        .target(Target::Stderr)
        .format(|buf: &mut Formatter, record| {
            writeln!(buf, "{} {}", level_tag(record.level()), record.args())
        })
        .try_init()
        .map_err(io::Error::other)
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

fn read_instance(path: &PathBuf) -> Result<Instance> {
    let text = fs::read_to_string(path)?;
    let parsed: InputFile = serde_json::from_str(&text)
        .map_err(|e| TspError::MalformedInstance(format!("{}: {e}", path.display())))?;
    Ok(match parsed {
        InputFile::Points(points) => Instance::from_points(&points),
        InputFile::Instance(instance) => instance,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level)?;

    let instance = read_instance(&cli.input)?;
    info!("input: {} ({} vertices)", cli.input.display(), instance.len());

    let mut config = SolverConfig::default()
        .with_epsilon(cli.epsilon)
        .with_threads(cli.threads)
        .with_warm_start(cli.warm_start)
        .with_trace(cli.trace);
    if let Some(secs) = cli.time_limit {
        let limit = Duration::try_from_secs_f64(secs)
            .map_err(|e| TspError::InvalidConfig(format!("time limit {secs}: {e}")))?;
        config = config.with_time_limit(limit);
    }
    if let Some(nodes) = cli.node_limit {
        config = config.with_node_limit(nodes);
    }

    let outcome = BranchAndBound::new(config).solve_with_control(&instance, &SearchControl::new())?;

    match outcome.status() {
        SolveStatus::Optimal => println!("status: optimal"),
        SolveStatus::Interrupted(reason) => println!("status: interrupted ({reason})"),
        SolveStatus::Infeasible => println!("status: infeasible"),
    }
    if let Some(tour) = outcome.tour() {
        println!("cost: {:.6}", tour.cost());
        let order: Vec<String> = tour.order().iter().map(usize::to_string).collect();
        println!("tour: {}", order.join(" "));
    }
    info!("\n{}", outcome.statistics());

    if let Some(trace) = outcome.trace() {
        let json = serde_json::to_string_pretty(trace)
            .map_err(|e| TspError::Io(io::Error::other(e)))?;
        println!("{json}");
    }

    Ok(())
}
