//! Routewise CLI
//!
//! Route optimization and simulated facility monitoring over a facility
//! network dataset (the built-in reference network by default).
//!
//! # Usage
//!
//! ```bash
//! # Rank every route between two facilities with the balanced preset
//! routewise routes --from wh-1 --to exp-1 --preset balanced
//!
//! # Custom weights, bounded search
//! routewise routes --from wh-1 --to exp-1 --co2 2 --cost 1 --bounded
//!
//! # Best route per preset
//! routewise routes --from wh-1 --to exp-1 --compare
//!
//! # 50 simulated monitoring ticks, reproducible
//! routewise monitor --ticks 50 --seed 7 --anomaly-rate 0.2
//! ```
//!
//! # Environment Variables
//!
//! - `ROUTEWISE_CONFIG`: Path to the TOML config file
//! - `RUST_LOG`: Logging level (default: info)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use routewise::config::{self, AppConfig};
use routewise::simulation::{default_baseline, TelemetrySimulator};
use routewise::{
    Dataset, MonitoringService, ObjectiveWeights, OptimizationPreset, RouteOptimizer, RouteSavings,
    RouteScore,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "routewise")]
#[command(about = "Route optimization and monitoring for processing facility networks")]
#[command(version)]
struct CliArgs {
    /// Config file (takes precedence over ROUTEWISE_CONFIG and ./routewise.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Rank routes between two facilities and print them as JSON
    Routes {
        /// Start facility id
        #[arg(long = "from")]
        from: String,
        /// End facility id
        #[arg(long = "to")]
        to: String,
        /// Named weight preset (co2, cost, energy, balanced)
        #[arg(long, conflicts_with_all = ["co2", "cost", "energy"])]
        preset: Option<OptimizationPreset>,
        /// CO2 weight (unset weights count as 0)
        #[arg(long)]
        co2: Option<f64>,
        /// Operating cost weight
        #[arg(long)]
        cost: Option<f64>,
        /// Energy weight
        #[arg(long)]
        energy: Option<f64>,
        /// Units per day (default from config)
        #[arg(long)]
        throughput: Option<f64>,
        /// Use the bounded best-first search instead of full enumeration
        #[arg(long, conflicts_with_all = ["pareto", "compare"])]
        bounded: bool,
        /// Result cap for --bounded (default from config)
        #[arg(long, requires = "bounded")]
        max_results: Option<usize>,
        /// Only print Pareto-optimal routes
        #[arg(long, conflicts_with = "compare")]
        pareto: bool,
        /// Print the best route under every preset
        #[arg(long)]
        compare: bool,
        /// Facility network file (.toml or .json)
        #[arg(long, value_name = "PATH")]
        dataset: Option<PathBuf>,
    },

    /// Run simulated monitoring ticks and print reports as JSON lines
    Monitor {
        /// Number of ticks (one sample per facility per tick)
        #[arg(long, default_value = "10")]
        ticks: u32,
        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        /// Probability that a sample carries an injected anomaly
        #[arg(long, default_value = "0.2")]
        anomaly_rate: f64,
        /// Simulated seconds between ticks
        #[arg(long, default_value = "60")]
        interval_secs: i64,
        /// Register routes between these facilities for alert impact lists
        #[arg(long = "routes-from", requires = "routes_to")]
        routes_from: Option<String>,
        #[arg(long = "routes-to", requires = "routes_from")]
        routes_to: Option<String>,
        /// Print every report, including ticks with nothing to report
        #[arg(long)]
        all: bool,
        /// Facility network file (.toml or .json)
        #[arg(long, value_name = "PATH")]
        dataset: Option<PathBuf>,
    },

    /// Print the active configuration as TOML
    ShowConfig,
}

// ============================================================================
// Output
// ============================================================================

#[derive(Serialize)]
struct RoutesOutput<'a> {
    from: &'a str,
    to: &'a str,
    throughput: f64,
    routes: &'a [RouteScore],
    savings: Option<RouteSavings>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.json_logs);

    let app_config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::load(),
    };
    info!(
        deployment = %app_config.deployment.name,
        region = %app_config.deployment.region,
        "Configuration loaded"
    );
    config::init(app_config);

    match args.command {
        SubCommand::Routes {
            from,
            to,
            preset,
            co2,
            cost,
            energy,
            throughput,
            bounded,
            max_results,
            pareto,
            compare,
            dataset,
        } => {
            let optimizer = RouteOptimizer::new(load_dataset(dataset.as_deref())?.into_graph()?);
            let throughput = throughput.unwrap_or_else(|| optimizer.default_throughput());

            if compare {
                let outcomes = optimizer.compare_presets(&from, &to, throughput)?;
                return print_json(&outcomes);
            }

            let weights = match (preset, co2, cost, energy) {
                (Some(p), ..) => p.weights(),
                (None, None, None, None) => ObjectiveWeights::default(),
                (None, co2, cost, energy) => ObjectiveWeights::new(
                    co2.unwrap_or(0.0),
                    cost.unwrap_or(0.0),
                    energy.unwrap_or(0.0),
                ),
            };

            if bounded {
                let cap = max_results.unwrap_or_else(|| optimizer.bounded_result_cap());
                let routes = optimizer.find_bounded_routes(&from, &to, weights, throughput, cap)?;
                return print_json(&routes);
            }

            let ranked = if pareto {
                optimizer.pareto_optimal_routes(&from, &to, throughput)?
            } else {
                optimizer.find_optimal_routes(&from, &to, weights, throughput)?
            };
            if ranked.is_empty() {
                warn!(from = %from, to = %to, "No route between facilities");
            }
            let savings = ranked
                .first()
                .and_then(|best| RouteOptimizer::calculate_savings(&best.route, &ranked));
            print_json(&RoutesOutput {
                from: &from,
                to: &to,
                throughput,
                routes: &ranked,
                savings,
            })
        }

        SubCommand::Monitor {
            ticks,
            seed,
            anomaly_rate,
            interval_secs,
            routes_from,
            routes_to,
            all,
            dataset,
        } => run_monitor(MonitorArgs {
            ticks,
            seed,
            anomaly_rate,
            interval_secs,
            routes: routes_from.zip(routes_to),
            all,
            dataset,
        }),

        SubCommand::ShowConfig => {
            print!("{}", config::get().to_toml()?);
            Ok(())
        }
    }
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_dataset(path: Option<&Path>) -> Result<Dataset> {
    match path {
        Some(p) => Dataset::load(p).with_context(|| format!("Failed to load dataset {}", p.display())),
        None => Dataset::reference().context("Built-in reference network is invalid"),
    }
}

// ============================================================================
// Monitoring Loop
// ============================================================================

/// `start + interval × tick`, failing instead of overflowing.
fn tick_timestamp(start: DateTime<Utc>, interval_secs: i64, tick: u32) -> Result<DateTime<Utc>> {
    interval_secs
        .checked_mul(i64::from(tick))
        .and_then(Duration::try_seconds)
        .and_then(|offset| start.checked_add_signed(offset))
        .with_context(|| format!("Tick {tick} at --interval-secs {interval_secs} is out of the representable time range"))
}

struct MonitorArgs {
    ticks: u32,
    seed: Option<u64>,
    anomaly_rate: f64,
    interval_secs: i64,
    routes: Option<(String, String)>,
    all: bool,
    dataset: Option<PathBuf>,
}

fn run_monitor(args: MonitorArgs) -> Result<()> {
    let dataset = load_dataset(args.dataset.as_deref())?;
    let facilities = dataset.facilities.clone();
    let service = MonitoringService::new(config::get()).context("Invalid maintenance config")?;

    if let Some((from, to)) = &args.routes {
        let optimizer = RouteOptimizer::new(dataset.into_graph()?);
        let ranked = optimizer.find_optimal_routes(
            from,
            to,
            ObjectiveWeights::default(),
            optimizer.default_throughput(),
        )?;
        let routes: Vec<_> = ranked.into_iter().map(|s| s.route).collect();
        service.register_routes(&routes);
    }

    let start = Utc::now();
    let baselines: Vec<_> = facilities
        .iter()
        .map(|f| {
            let baseline = default_baseline(f, start);
            service.set_baseline(&f.id, baseline.clone());
            baseline
        })
        .collect();

    let mut simulator = TelemetrySimulator::new(args.seed, args.anomaly_rate);
    let mut anomaly_count = 0usize;
    let mut alert_count = 0usize;

    info!(
        facilities = facilities.len(),
        ticks = args.ticks,
        seed = ?args.seed,
        "Starting monitoring simulation"
    );

    for tick in 1..=args.ticks {
        let timestamp = tick_timestamp(start, args.interval_secs, tick)?;
        for (facility, baseline) in facilities.iter().zip(&baselines) {
            let (sample, injected) = simulator.next_sample(baseline, timestamp);
            if let Some(kind) = injected {
                tracing::debug!(facility = %facility.id, %kind, "Injected anomaly");
            }
            let report = service.evaluate(facility, sample);
            anomaly_count += report.anomalies.len();
            alert_count += usize::from(report.maintenance.is_some());
            if args.all || !report.is_quiet() {
                println!("{}", serde_json::to_string(&report)?);
            }
        }
    }

    info!(
        samples = simulator.samples_generated(),
        injected = simulator.anomalies_injected(),
        anomalies = anomaly_count,
        maintenance_alerts = alert_count,
        "Monitoring simulation complete"
    );
    Ok(())
}
