//! CLI: Run a microscene graph from a JSON definition.
//!
//! Loads the definition, compiles it with the built-in nodes and behaviours,
//! ticks it until Finished and prints a summary. Exits 1 when the graph does
//! not reach Finished within the tick limit.
//!
//! Usage: `run_microscene [OPTIONS] <graph.json>`
//! Example: run_microscene --seed 7 --report out/report.json graphs/door.json
//!
//! Set RUST_LOG=microscenes=trace for TRACE-level span enter/exit and events.

use clap::Parser;
use microscenes::config::{ActivationPolicy, CrashPolicy, ExecutorConfig};
use microscenes::definition_io::load_definition;
use microscenes::runner::{DEFAULT_MAX_TICKS, RunError, RunOptions, RunSummary, run_definition};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Run a microscene graph from a JSON definition.
#[derive(Parser, Debug)]
#[command(name = "run_microscene")]
#[command(
  after_help = r#"Environment variables (override the matching flags when set):
  MICROSCENE_SEED               Seed for random stacks.
  MICROSCENE_CRASH_POLICY       treat_as_finished | stall
  MICROSCENE_ACTIVATION_POLICY  same_tick | next_tick
  MICROSCENE_RECORD_EVENTS      1 | true to record events without --report

Examples:
  run_microscene graphs/door.json
  run_microscene --tick-ms 100 --report out/report.json graphs/door.json"#
)]
struct Args {
  /// Give up after this many ticks.
  #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_TICKS)]
  max_ticks: u64,

  /// Delta time per tick in milliseconds. Default: 16
  #[arg(long, value_name = "MS")]
  tick_ms: Option<u64>,

  /// Seed for random stacks (entropy when absent).
  #[arg(long, value_name = "SEED")]
  seed: Option<u64>,

  /// How stacks treat crashed nodes: treat_as_finished or stall.
  #[arg(long, value_name = "POLICY")]
  crash_policy: Option<CrashPolicy>,

  /// When newly activated entries first run: same_tick or next_tick.
  #[arg(long, value_name = "POLICY")]
  activation_policy: Option<ActivationPolicy>,

  /// Write the execution report (JSON) here; turns on event recording.
  #[arg(long, value_name = "PATH")]
  report: Option<PathBuf>,

  /// Path to the graph definition
  #[arg(value_name = "graph.json")]
  graph: PathBuf,
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .with_writer(std::io::stderr)
    .init();

  info!("run_microscene starting");
  let args = Args::parse();

  // Flags first, then env vars on top.
  let mut config = ExecutorConfig::default();
  if let Some(ms) = args.tick_ms {
    config.default_delta_ms = ms;
  }
  config.seed = args.seed;
  if let Some(p) = args.crash_policy {
    config.crash_policy = p;
  }
  if let Some(p) = args.activation_policy {
    config.activation_policy = p;
  }
  config.record_events = args.report.is_some();
  let config = config.apply_env();
  info!(?config, "options (env or flags)");

  let def = match load_definition(&args.graph) {
    Ok(d) => d,
    Err(e) => {
      eprintln!("Error reading {}: {}", args.graph.display(), e);
      process::exit(1);
    }
  };

  let options = RunOptions {
    max_ticks: args.max_ticks,
    delta: Some(Duration::from_millis(config.default_delta_ms)),
    custom_data: None,
    report_path: args.report.clone(),
  };

  match run_definition(&def, config, options) {
    Ok(summary) => print_summary(&summary),
    Err(RunError::TickLimit { summary, .. }) => {
      print_summary(&summary);
      eprintln!("Microscene did not finish within {} ticks", args.max_ticks);
      process::exit(1);
    }
    Err(e) => {
      eprintln!("Microscene error: {}", e);
      process::exit(1);
    }
  }
}

fn print_summary(summary: &RunSummary) {
  println!("Microscene run:");
  println!("  Scene: {}", summary.report.scene);
  println!("  State: {}", summary.final_state);
  println!("  Ticks: {}", summary.ticks);
  if !summary.report.events.is_empty() {
    println!("  Events: {}", summary.report.events.len());
  }
}
