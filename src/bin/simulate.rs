//! Command-line entry point.
//!
//! # Usage
//!
//! ```bash
//! # Monte Carlo batch with the published defaults
//! atlas-sim montecarlo
//!
//! # Smaller exploratory batch
//! atlas-sim montecarlo --trials 1000 --seed 7 --out-dir out/quick
//!
//! # Different sampling window and joint event
//! atlas-sim montecarlo --window-start-year 1950 --window-end-year 2030 \
//!     --joint-planets Venus,Mars
//!
//! # Batch configured from a TOML file (CLI flags win over the file)
//! atlas-sim montecarlo --config run.toml
//!
//! # Jupiter intercept scan from the discovery date
//! atlas-sim intercept --scenario discovery
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use atlas_sim::ephemeris::Planet;
use atlas_sim::models::JulianDate;
use atlas_sim::report::summary;
use atlas_sim::runner;
use atlas_sim::{InterceptConfig, SimulationConfig};

#[derive(Parser)]
#[command(
    name = "atlas-sim",
    about = "3I/ATLAS close-approach Monte Carlo and intercept study",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the Monte Carlo close-approach batch (the default)
    Montecarlo {
        /// TOML configuration file; missing fields fall back to defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of randomized trials
        #[arg(long)]
        trials: Option<usize>,
        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,
        /// First year of the perihelion-epoch sampling window
        #[arg(long)]
        window_start_year: Option<i32>,
        /// Last year of the perihelion-epoch sampling window
        #[arg(long)]
        window_end_year: Option<i32>,
        /// Threshold (millions of km) for the hits-per-trial histogram
        #[arg(long)]
        reference_threshold_mkm: Option<f64>,
        /// Planets forming the joint p-value event, comma-separated
        #[arg(long, value_delimiter = ',')]
        joint_planets: Option<Vec<String>>,
        /// Recompute observed minima from the orbital elements instead of
        /// using the published reference distances
        #[arg(long)]
        recompute_observed: bool,
        /// Output directory for tables, histograms, and reports
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Scan Lambert transfers for a minimum delta-v Jupiter intercept
    Intercept {
        /// Departure scenario: "today" or "discovery"
        #[arg(long, default_value = "today")]
        scenario: String,
        /// Departure date (YYYY-MM-DD), overriding the scenario's default
        #[arg(long)]
        start_date: Option<String>,
        /// Output directory for the comparison CSV and report
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

fn year_start(year: i32) -> anyhow::Result<JulianDate> {
    JulianDate::from_calendar(year, 1, 1)
        .ok_or_else(|| anyhow::anyhow!("invalid year {}", year))
}

fn parse_date(s: &str) -> anyhow::Result<JulianDate> {
    let date = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")?;
    JulianDate::from_calendar(date.year(), date.month(), date.day())
        .ok_or_else(|| anyhow::anyhow!("invalid date {}", s))
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Montecarlo {
        config: None,
        trials: None,
        seed: None,
        window_start_year: None,
        window_end_year: None,
        reference_threshold_mkm: None,
        joint_planets: None,
        recompute_observed: false,
        out_dir: None,
    }) {
        Command::Montecarlo {
            config,
            trials,
            seed,
            window_start_year,
            window_end_year,
            reference_threshold_mkm,
            joint_planets,
            recompute_observed,
            out_dir,
        } => {
            let mut sim_config = match config {
                Some(path) => SimulationConfig::from_toml_file(&path)?,
                None => SimulationConfig::default(),
            };
            if let Some(trials) = trials {
                sim_config.trials = trials;
            }
            if let Some(seed) = seed {
                sim_config.seed = seed;
            }
            if let Some(year) = window_start_year {
                sim_config.window_start = year_start(year)?;
            }
            if let Some(year) = window_end_year {
                sim_config.window_end = year_start(year)?;
            }
            if let Some(threshold) = reference_threshold_mkm {
                sim_config.reference_threshold_mkm = threshold;
            }
            if let Some(names) = joint_planets {
                sim_config.joint_planets = names
                    .iter()
                    .map(|name| {
                        Planet::from_name(name)
                            .ok_or_else(|| anyhow::anyhow!("unknown planet '{}'", name))
                    })
                    .collect::<anyhow::Result<Vec<Planet>>>()?;
            }
            if recompute_observed {
                sim_config.recompute_observed = true;
            }
            if let Some(dir) = out_dir {
                sim_config.output_dir = dir;
            }

            info!(
                trials = sim_config.trials,
                seed = sim_config.seed,
                "starting Monte Carlo run"
            );
            let stats = runner::run_montecarlo(&sim_config)?;
            println!("{}", summary::console_summary(&stats));
        }
        Command::Intercept {
            scenario,
            start_date,
            out_dir,
        } => {
            let mut intercept_config = match scenario.as_str() {
                "today" => InterceptConfig::today(),
                "discovery" => InterceptConfig::discovery(),
                other => {
                    anyhow::bail!("unknown scenario '{}', expected 'today' or 'discovery'", other)
                }
            };
            if let Some(date) = start_date {
                intercept_config.start_epoch = parse_date(&date)?;
            }
            if let Some(dir) = out_dir {
                intercept_config.output_dir = dir;
            }

            info!(scenario = %intercept_config.scenario, "starting intercept scan");
            let solution = runner::run_intercept(&intercept_config)?;
            println!(
                "Best transfer: {} days, arriving {}, delta-v {:.2} km/s ({:.3e} g continuous)",
                solution.transfer_days,
                solution.arrival_epoch.to_datetime().format("%Y-%m-%d"),
                solution.delta_v_km_s(),
                solution.continuous_g_force(),
            );
        }
    }

    Ok(())
}
