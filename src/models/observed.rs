//! Observed close-approach distances used as the p-value reference.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ephemeris::Planet;
use crate::kepler;
use crate::models::elements::CometaryElements;

/// The actually-observed minimum approach distances of the object to a
/// set of reference planets, in AU. Held fixed for a whole run and never
/// mutated; every trial is compared against the same values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedApproach {
    distances_au: BTreeMap<Planet, f64>,
}

impl ObservedApproach {
    /// Build from explicit (planet, distance AU) pairs.
    pub fn new(distances_au: impl IntoIterator<Item = (Planet, f64)>) -> Self {
        Self {
            distances_au: distances_au.into_iter().collect(),
        }
    }

    /// Observed minimum distances of 3I/ATLAS during its 2025 passage.
    pub fn atlas_3i() -> Self {
        Self::new([
            (Planet::Venus, 0.6512),
            (Planet::Mars, 0.1942),
            (Planet::Jupiter, 0.3586),
        ])
    }

    /// Recompute observed minima by propagating the real elements over a
    /// window around the true perihelion epoch, sampled every
    /// `step_days`. Only the planets in `planets` are evaluated.
    ///
    /// The minimum is over the discrete sample set, like the Monte Carlo
    /// trials, so both sides of the p-value comparison share the same
    /// resolution.
    pub fn from_elements(
        elements: &CometaryElements,
        planets: &[Planet],
        half_width_days: f64,
        step_days: f64,
    ) -> Self {
        let tp = elements.perihelion_epoch;
        let mut minima: BTreeMap<Planet, f64> =
            planets.iter().map(|&p| (p, f64::INFINITY)).collect();

        let mut dt = -half_width_days;
        while dt < half_width_days {
            let t = tp + dt;
            if let Some((pos, _)) = kepler::propagate_cometary(elements, t) {
                for (&planet, min) in minima.iter_mut() {
                    let d = (crate::ephemeris::planet_position(planet, t) - pos).norm();
                    if d < *min {
                        *min = d;
                    }
                }
            }
            dt += step_days;
        }

        Self {
            distances_au: minima,
        }
    }

    /// Observed distance for one planet, if it is part of the reference set.
    pub fn get(&self, planet: Planet) -> Option<f64> {
        self.distances_au.get(&planet).copied()
    }

    /// Planets in the reference set, in order from the Sun.
    pub fn planets(&self) -> Vec<Planet> {
        self.distances_au.keys().copied().collect()
    }

    /// Iterate over (planet, observed distance AU) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Planet, f64)> + '_ {
        self.distances_au.iter().map(|(&p, &d)| (p, d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atlas_reference_values() {
        let observed = ObservedApproach::atlas_3i();
        assert_eq!(observed.get(Planet::Venus), Some(0.6512));
        assert_eq!(observed.get(Planet::Mars), Some(0.1942));
        assert_eq!(observed.get(Planet::Jupiter), Some(0.3586));
        assert_eq!(observed.get(Planet::Earth), None);
    }

    #[test]
    fn test_planets_ordered_from_sun() {
        let observed = ObservedApproach::atlas_3i();
        assert_eq!(
            observed.planets(),
            vec![Planet::Venus, Planet::Mars, Planet::Jupiter]
        );
    }

    #[test]
    fn test_from_elements_matches_published_order_of_magnitude() {
        // The recomputed minima use the analytic ephemeris, so they land
        // near but not exactly on the published DE-based values.
        let observed = ObservedApproach::from_elements(
            &CometaryElements::atlas_3i(),
            &[Planet::Venus, Planet::Mars, Planet::Jupiter],
            730.0,
            2.0,
        );
        let mars = observed.get(Planet::Mars).unwrap();
        assert!(mars.is_finite());
        assert!(mars < 0.5, "Mars minimum {} AU unexpectedly far", mars);
    }
}
