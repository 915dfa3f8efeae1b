//! Run configuration for the Monte Carlo batch and the intercept study.
//!
//! Configuration is an explicit immutable value handed to the entry
//! points, never module-level state. Defaults reproduce the published
//! study; every field can be overridden from the CLI or a TOML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ephemeris::Planet;
use crate::error::{Result, SimulationError};
use crate::models::time::JulianDate;

fn default_trials() -> usize {
    10_000
}

fn default_window_start() -> JulianDate {
    // 1910-01-01 is always a valid calendar date
    JulianDate::from_calendar(1910, 1, 1).unwrap()
}

fn default_window_end() -> JulianDate {
    JulianDate::from_calendar(2040, 1, 1).unwrap()
}

fn default_half_width_days() -> f64 {
    2000.0
}

fn default_step_days() -> f64 {
    2.0
}

fn default_thresholds_mkm() -> Vec<f64> {
    vec![25.0, 50.0, 75.0, 100.0, 125.0, 150.0]
}

fn default_reference_threshold_mkm() -> f64 {
    100.0
}

fn default_joint_planets() -> Vec<Planet> {
    vec![Planet::Venus, Planet::Mars, Planet::Jupiter]
}

fn default_seed() -> u64 {
    42
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out/montecarlo")
}

/// Configuration for one Monte Carlo batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of randomized trials N
    #[serde(default = "default_trials")]
    pub trials: usize,
    /// Start of the perihelion-epoch sampling window (JD)
    #[serde(default = "default_window_start")]
    pub window_start: JulianDate,
    /// End of the perihelion-epoch sampling window (JD)
    #[serde(default = "default_window_end")]
    pub window_end: JulianDate,
    /// Half-width of the propagation window around perihelion (days)
    #[serde(default = "default_half_width_days")]
    pub half_width_days: f64,
    /// Sampling step inside the propagation window (days).
    /// The minimum distance is taken over this discrete grid, so the
    /// step sets the distance resolution; that is a cost/accuracy
    /// tradeoff, not a defect.
    #[serde(default = "default_step_days")]
    pub step_days: f64,
    /// Hit thresholds in millions of km, strictly increasing
    #[serde(default = "default_thresholds_mkm")]
    pub thresholds_mkm: Vec<f64>,
    /// Threshold (MKM) used for the hits-per-trial histogram and the
    /// "at least k planets" class probabilities
    #[serde(default = "default_reference_threshold_mkm")]
    pub reference_threshold_mkm: f64,
    /// Planet subset for the joint p-value. A research decision, kept
    /// configurable rather than hard-coded.
    #[serde(default = "default_joint_planets")]
    pub joint_planets: Vec<Planet>,
    /// RNG seed; a fixed seed reproduces identical aggregates
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Recompute observed minima from the real elements instead of using
    /// the published reference constants
    #[serde(default)]
    pub recompute_observed: bool,
    /// Directory for CSV tables, histograms, and the results report
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            window_start: default_window_start(),
            window_end: default_window_end(),
            half_width_days: default_half_width_days(),
            step_days: default_step_days(),
            thresholds_mkm: default_thresholds_mkm(),
            reference_threshold_mkm: default_reference_threshold_mkm(),
            joint_planets: default_joint_planets(),
            seed: default_seed(),
            recompute_observed: false,
            output_dir: default_output_dir(),
        }
    }
}

impl SimulationConfig {
    /// Load a configuration from a TOML file; missing fields fall back
    /// to the defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject invalid configurations before any trial runs.
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(SimulationError::InvalidConfig(
                "trial count must be positive".into(),
            ));
        }
        if self.window_start >= self.window_end {
            return Err(SimulationError::InvalidConfig(format!(
                "sampling window start (JD {}) must precede end (JD {})",
                self.window_start.value(),
                self.window_end.value()
            )));
        }
        if self.half_width_days <= 0.0 || self.step_days <= 0.0 {
            return Err(SimulationError::InvalidConfig(
                "propagation window and step must be positive".into(),
            ));
        }
        if self.thresholds_mkm.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "threshold set must not be empty".into(),
            ));
        }
        if !self
            .thresholds_mkm
            .windows(2)
            .all(|w| w[0] > 0.0 && w[0] < w[1])
            || *self.thresholds_mkm.first().unwrap() <= 0.0
        {
            return Err(SimulationError::InvalidConfig(
                "thresholds must be positive and strictly increasing".into(),
            ));
        }
        if !self
            .thresholds_mkm
            .iter()
            .any(|&t| (t - self.reference_threshold_mkm).abs() < 1e-9)
        {
            return Err(SimulationError::InvalidConfig(format!(
                "reference threshold {} MKM is not in the threshold set",
                self.reference_threshold_mkm
            )));
        }
        if self.joint_planets.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "joint p-value planet subset must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for one Lambert intercept scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptConfig {
    /// Scenario label used in output file names
    pub scenario: String,
    /// Departure epoch (JD)
    pub start_epoch: JulianDate,
    /// Earliest arrival considered, days after departure
    pub min_transfer_days: u32,
    /// Latest arrival considered, days after departure
    pub max_transfer_days: u32,
    /// Step between candidate arrival dates (days)
    pub scan_step_days: u32,
    /// Step of the trajectory comparison table (days)
    pub table_step_days: u32,
    /// Directory for the comparison CSV and the intercept report
    pub output_dir: PathBuf,
}

impl InterceptConfig {
    /// Scan for a diversion starting "today" (late December 2025).
    pub fn today() -> Self {
        Self::for_scenario("today", JulianDate::from_calendar(2025, 12, 22).unwrap())
    }

    /// Scan starting from the discovery date of 3I/ATLAS.
    pub fn discovery() -> Self {
        Self::for_scenario("discovery", JulianDate::from_calendar(2025, 7, 1).unwrap())
    }

    fn for_scenario(name: &str, start_epoch: JulianDate) -> Self {
        Self {
            scenario: name.to_string(),
            start_epoch,
            min_transfer_days: 50,
            max_transfer_days: 2000,
            scan_step_days: 10,
            table_step_days: 10,
            output_dir: PathBuf::from("out/intercept"),
        }
    }

    /// Reject invalid scan windows before querying the solver.
    pub fn validate(&self) -> Result<()> {
        if self.min_transfer_days == 0 || self.min_transfer_days >= self.max_transfer_days {
            return Err(SimulationError::InvalidConfig(
                "transfer window must satisfy 0 < min < max days".into(),
            ));
        }
        if self.scan_step_days == 0 || self.table_step_days == 0 {
            return Err(SimulationError::InvalidConfig(
                "scan and table steps must be positive".into(),
            ));
        }
        Ok(())
    }
}
