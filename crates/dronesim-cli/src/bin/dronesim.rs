//! Drone telemetry simulator console.
//!
//! Runs the simulation on a background worker and prints telemetry at the
//! tick rate. With `--duration` the run is headless; otherwise commands are
//! read from stdin (type `help`).

use anyhow::Context;
use clap::{Parser, ValueEnum};
use dronesim_cli::commands::HELP;
use dronesim_cli::{Command, ConsoleObserver, OutputFormat, Renderer};
use dronesim_core::drone::DEFAULT_ALTITUDE_M;
use dronesim_core::{create_drone, create_drone_at, StrategyKind, TelemetryModel};
use dronesim_runtime::{logging, SimConfig, SimulationRunner};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Available movement strategies
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Near-stationary drift
    Hover,
    /// Larger random moves at 5-20 m/s
    RandomWalk,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Hover => StrategyKind::Hover,
            StrategyArg::RandomWalk => StrategyKind::RandomWalk,
        }
    }
}

/// Single-drone telemetry simulator
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Drone identifier [env: DRONESIM_DRONE_ID]
    #[arg(long)]
    drone_id: Option<String>,

    /// Movement strategy [env: DRONESIM_STRATEGY]
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Tick period in milliseconds [env: DRONESIM_TICK_MS]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: Option<u64>,

    /// RNG seed for reproducible runs [env: DRONESIM_SEED]
    #[arg(long)]
    seed: Option<u64>,

    /// Initial latitude (requires --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Initial longitude (requires --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Initial altitude in meters (used with --lat/--lon)
    #[arg(long, default_value_t = DEFAULT_ALTITUDE_M)]
    alt: f64,

    /// Run headless for this many seconds, then exit
    #[arg(long)]
    duration: Option<u64>,

    /// In headless mode, toggle failure simulation after this many seconds
    #[arg(long, requires = "duration")]
    fail_after: Option<u64>,

    /// Print telemetry and events as JSON lines
    #[arg(long)]
    json: bool,

    /// Directory for the log file [env: DRONESIM_LOG_DIR]
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut SimConfig) {
        if let Some(id) = &self.drone_id {
            config.model.drone_id = id.clone();
        }
        if let Some(strategy) = self.strategy {
            config.model.strategy = strategy.into();
        }
        if let Some(ms) = self.tick_ms {
            config.model.tick_period = Duration::from_millis(ms);
        }
        if self.seed.is_some() {
            config.model.seed = self.seed;
        }
        if self.log_dir.is_some() {
            config.log_dir = self.log_dir.clone();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (mut config, warnings) = SimConfig::parse_env();
    args.apply(&mut config);

    logging::init(config.log_dir.as_deref())?;
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    tracing::debug!("Configuration: {:?}", config);

    let drone = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => create_drone_at(&config.model.drone_id, lat, lon, args.alt),
        _ => create_drone(&config.model.drone_id),
    };
    let model = TelemetryModel::with_drone(&config.model, drone);
    let tick_period = model.tick_period();
    let runner = SimulationRunner::new(model);

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let observer = Arc::new(ConsoleObserver::new(format));
    observer.attach(&runner);
    let renderer = Renderer::spawn(Arc::clone(&observer), tick_period)
        .context("Failed to start telemetry renderer")?;

    let result = match args.duration {
        Some(secs) => run_headless(&runner, Duration::from_secs(secs), args.fail_after),
        None => run_interactive(&runner, &observer),
    };

    runner.shutdown();
    renderer.stop();

    if let Some(snapshot) = runner.snapshot() {
        tracing::info!(
            "Final telemetry: battery={}% gps={} failure={}",
            snapshot.battery,
            snapshot.gps_fix,
            snapshot.failure_mode
        );
    }
    result
}

fn run_headless(
    runner: &SimulationRunner,
    duration: Duration,
    fail_after: Option<u64>,
) -> anyhow::Result<()> {
    runner.start_simulation()?;

    let mut remaining = duration;
    if let Some(secs) = fail_after {
        let wait = Duration::from_secs(secs).min(duration);
        std::thread::sleep(wait);
        runner.toggle_failure_simulation();
        remaining = duration.saturating_sub(wait);
    }
    std::thread::sleep(remaining);

    runner.stop_simulation();
    Ok(())
}

fn run_interactive(runner: &SimulationRunner, observer: &ConsoleObserver) -> anyhow::Result<()> {
    println!("{}", HELP);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match command {
            Command::Start => {
                runner.start_simulation()?;
            }
            Command::Stop => {
                runner.stop_simulation();
            }
            Command::Toggle => {
                if runner.is_running() {
                    runner.stop_simulation();
                } else {
                    runner.start_simulation()?;
                }
            }
            Command::Fail => {
                runner.toggle_failure_simulation();
            }
            Command::Strategy(kind) => runner.set_strategy_kind(kind),
            Command::Status => {
                let (state, strategy) =
                    runner.with_model(|m| (m.state(), m.strategy_name().unwrap_or("none")));
                println!("Simulation {:?}, strategy {}", state, strategy);
                match runner.snapshot() {
                    Some(snapshot) => observer.render(&snapshot),
                    None => println!("No drone attached"),
                }
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    Ok(())
}
