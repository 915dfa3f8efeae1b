//! Error types for the simulation pipeline.

use thiserror::Error;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors that can occur while configuring or running a simulation.
///
/// Per-trial propagation anomalies are deliberately absent: a trial whose
/// propagation yields no finite samples for a planet records an infinite
/// minimum distance (never a hit) and the run continues.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Invalid configuration, rejected before any trial runs
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV export failed
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    /// Histogram rendering failed
    #[error("Plot rendering error: {0}")]
    Plot(String),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// JSON summary serialization failed
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Lambert solver did not converge for a transfer geometry
    #[error("Lambert solver failed: {0}")]
    LambertFailed(String),

    /// The intercept scan exhausted its window without a converged transfer
    #[error("No intercept trajectory found in the scan window")]
    NoInterceptFound,
}
