//! Cometary orbital elements for the simulated object.

use serde::{Deserialize, Serialize};

use crate::models::time::JulianDate;

/// Conic classification derived from the eccentricity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitClass {
    Elliptic,
    Parabolic,
    Hyperbolic,
}

/// Elements in "cometary" form, the natural parametrization for a
/// hyperbolic interloper. Distances in AU, angles in degrees.
///
/// Within a simulation run every element except the perihelion epoch is
/// constant; the Monte Carlo sampler varies only `perihelion_epoch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CometaryElements {
    /// Perihelion distance q (AU)
    pub perihelion_distance: f64,
    /// Eccentricity e (> 1 for hyperbolic)
    pub eccentricity: f64,
    /// Inclination i (degrees)
    pub inclination: f64,
    /// Longitude of the ascending node Ω (degrees)
    pub ascending_node: f64,
    /// Argument of perihelion ω (degrees)
    pub periapsis_argument: f64,
    /// Epoch of perihelion passage Tp (JD)
    pub perihelion_epoch: JulianDate,
}

impl CometaryElements {
    /// Orbital elements of 3I/ATLAS (C/2025 N1).
    pub fn atlas_3i() -> Self {
        Self {
            perihelion_distance: 1.3564840,
            eccentricity: 6.1396580,
            inclination: 175.1129,
            ascending_node: 322.1549,
            periapsis_argument: 128.0072,
            perihelion_epoch: JulianDate::new(2460977.9827),
        }
    }

    /// Semi-major axis a = q / (1 - e). Negative for hyperbolic orbits.
    pub fn semi_major_axis(&self) -> f64 {
        self.perihelion_distance / (1.0 - self.eccentricity)
    }

    /// Conic classification; e within 1e-12 of unity counts as parabolic.
    pub fn orbit_class(&self) -> OrbitClass {
        if (self.eccentricity - 1.0).abs() < 1e-12 {
            OrbitClass::Parabolic
        } else if self.eccentricity > 1.0 {
            OrbitClass::Hyperbolic
        } else {
            OrbitClass::Elliptic
        }
    }

    /// Copy of these elements with a different perihelion epoch, the
    /// only element a randomized trial changes.
    pub fn with_perihelion_epoch(&self, epoch: JulianDate) -> Self {
        Self {
            perihelion_epoch: epoch,
            ..self.clone()
        }
    }
}
