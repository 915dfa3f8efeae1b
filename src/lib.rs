//! # 3I/ATLAS Close-Approach Simulator
//!
//! Monte Carlo engine for the question "how unusual is the planetary
//! encounter geometry of interstellar object 3I/ATLAS?", plus a Lambert
//! intercept feasibility study.
//!
//! ## Features
//!
//! - **Monte Carlo batch**: randomized perihelion-passage epochs, minimum
//!   approach distance per planet over a propagation window
//! - **Statistics**: per-planet and joint empirical p-values, pre-hoc
//!   class probabilities, explicit 1/N resolution floors
//! - **Ephemeris**: self-contained analytic mean planetary elements,
//!   valid 1800-2050
//! - **Propagation**: hyperbolic and elliptic Kepler solvers, universal
//!   variables for arbitrary conics
//! - **Intercept study**: Lambert transfer scan for a minimum delta-v
//!   Jupiter collision course
//! - **Exports**: CSV tables, histogram renderings, markdown and JSON
//!   reports
//!
//! ## Architecture
//!
//! - [`models`]: Julian dates, orbital elements, observed reference data
//! - [`ephemeris`] / [`kepler`]: planetary positions and orbit propagation
//! - [`sampler`] / [`simulation`]: the randomized trial batch
//! - [`stats`]: hit classification and aggregate statistics
//! - [`lambert`]: transfer solver and intercept scan
//! - [`report`]: CSV, plot, and report writers
//! - [`runner`]: end-to-end pipelines behind the CLI

pub mod config;
pub mod ephemeris;
pub mod error;
pub mod kepler;
pub mod lambert;
pub mod models;
pub mod report;
pub mod runner;
pub mod sampler;
pub mod simulation;
pub mod stats;

pub use config::{InterceptConfig, SimulationConfig};
pub use error::{Result, SimulationError};
