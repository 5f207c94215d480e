//! Devnet Probe CLI
//!
//! Entry point for the `devnet-probe` command-line tool.

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use devnet_probe::{EffectiveConfig, ExitCode, Orchestrator, ProbeReport, RunDeadline};
use devnet_probe::signal::SignalHandler;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "devnet-probe")]
#[command(about = "Liveness and readiness probe for a Substrate dev node", version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    probe: ProbeArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the node (default)
    Run(ProbeArgs),

    /// Print the effective configuration with provenance
    Config(ProbeArgs),
}

#[derive(Args, Debug, Default)]
struct ProbeArgs {
    /// Node RPC endpoint (default: http://localhost:9944)
    #[arg(long, short = 'e')]
    endpoint: Option<String>,

    /// Per-call timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Overall run deadline in seconds
    #[arg(long)]
    deadline: Option<u64>,

    /// Seconds between the two block height samples
    #[arg(long)]
    wait: Option<u64>,

    /// Minimum new blocks expected across the wait
    #[arg(long)]
    min_delta: Option<u64>,

    /// Account address for the nonce probe
    #[arg(long)]
    account: Option<String>,

    /// Require at least one peer
    #[arg(long)]
    no_dev: bool,

    /// Expected chain name (system_chain)
    #[arg(long)]
    expect_chain: Option<String>,

    /// Expected runtime spec name
    #[arg(long)]
    expect_spec: Option<String>,

    /// Run probes one after another
    #[arg(long)]
    sequential: bool,

    /// Path to a config file (TOML)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

impl ProbeArgs {
    /// CLI layer of the config merge; only flags that were given
    fn overrides(&self) -> Value {
        let mut top = Map::new();
        let mut block_production = Map::new();
        let mut expected = Map::new();

        if let Some(endpoint) = &self.endpoint {
            top.insert("endpoint".into(), json!(endpoint));
        }
        if let Some(timeout) = self.timeout {
            top.insert("call_timeout_seconds".into(), json!(timeout));
        }
        if let Some(deadline) = self.deadline {
            top.insert("overall_seconds".into(), json!(deadline));
        }
        if let Some(wait) = self.wait {
            block_production.insert("wait_seconds".into(), json!(wait));
        }
        if let Some(min_delta) = self.min_delta {
            block_production.insert("min_delta".into(), json!(min_delta));
        }
        if let Some(account) = &self.account {
            top.insert("reference_account".into(), json!(account));
        }
        if self.no_dev {
            top.insert("dev_mode".into(), json!(false));
        }
        if self.sequential {
            top.insert("concurrent".into(), json!(false));
        }
        if let Some(chain) = &self.expect_chain {
            expected.insert("chain".into(), json!(chain));
        }
        if let Some(spec) = &self.expect_spec {
            expected.insert("spec_name".into(), json!(spec));
        }

        if !block_production.is_empty() {
            top.insert("block_production".into(), Value::Object(block_production));
        }
        if !expected.is_empty() {
            top.insert("expected".into(), Value::Object(expected));
        }
        Value::Object(top)
    }
}

fn main() {
    let cli = Cli::parse();

    let (show_config, args) = match cli.command {
        Some(Commands::Run(args)) => (false, args),
        Some(Commands::Config(args)) => (true, args),
        None => (false, cli.probe),
    };

    init_tracing(args.verbose);

    let host_path = EffectiveConfig::default_host_path();
    let config = match EffectiveConfig::build(
        host_path.as_deref(),
        args.config.as_deref(),
        Some(args.overrides()),
    ) {
        Ok(c) => c,
        Err(e) => process::exit(config_failure("loading config", &e)),
    };

    if show_config {
        run_show_config(&config);
    } else {
        run_probe(&config, args.json);
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_show_config(config: &EffectiveConfig) {
    match config.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => process::exit(config_failure("serializing config", &e)),
    }
}

/// Report a configuration problem; returns the exit code to use
fn config_failure(context: &str, err: &dyn std::fmt::Display) -> i32 {
    eprintln!("Error {}: {}", context, err);
    ExitCode::ConfigError.as_i32()
}

fn run_probe(config: &EffectiveConfig, json: bool) {
    let handler = SignalHandler::new();
    if let Err(e) = handler.install() {
        tracing::warn!(error = %e, "could not install signal handler");
    }
    let signals = handler.state();

    let probe_config = config.probe_config().clone();
    let deadline = RunDeadline::start(probe_config.timeouts().overall());

    let orchestrator = match Orchestrator::connect(probe_config) {
        Ok(o) => o,
        Err(e) => process::exit(config_failure("preparing endpoint", &e)),
    };

    let started_at = Utc::now();
    let run = orchestrator.run(&deadline, &*signals);
    let report = ProbeReport::from_run(run, orchestrator.endpoint(), started_at, deadline.elapsed())
        .with_sources(config.sources.clone());

    if json {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing report: {}", e),
        }
    } else {
        print!("{}", report);
    }

    process::exit(report.exit_code().as_i32());
}
