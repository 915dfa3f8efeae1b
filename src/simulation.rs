//! Monte Carlo close-approach batch.
//!
//! Each trial keeps every orbital element of the object fixed except the
//! perihelion-passage epoch, propagates the object across a window
//! centered on that epoch, and records the minimum separation to each of
//! the eight planets over the discrete sample grid.
//!
//! The object's trajectory relative to its own perihelion is identical
//! across trials (only the epoch shifts in absolute time), so it is
//! propagated once and shared read-only by every trial; per trial only
//! the planetary positions change. Trials are independent and run in
//! parallel; results are collected in trial order so aggregates never
//! depend on scheduling.

use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::Vector3;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::ephemeris::{self, Planet};
use crate::error::Result;
use crate::kepler;
use crate::models::elements::CometaryElements;
use crate::models::time::JulianDate;
use crate::sampler::EpochSampler;

/// Minimum distance per planet for one randomized trial. Distances in AU;
/// a planet with no finite propagation sample holds `f64::INFINITY` and
/// can never register as a hit.
#[derive(Debug, Clone, Serialize)]
pub struct TrialResult {
    pub trial_id: usize,
    pub perihelion_epoch: JulianDate,
    pub min_distances_au: [f64; 8],
}

/// Time offsets of the propagation grid, relative to perihelion.
fn offset_grid(half_width_days: f64, step_days: f64) -> Vec<f64> {
    let mut offsets = Vec::with_capacity((2.0 * half_width_days / step_days) as usize + 1);
    let mut dt = -half_width_days;
    while dt < half_width_days {
        offsets.push(dt);
        dt += step_days;
    }
    offsets
}

/// Object positions along the offset grid, relative to perihelion.
///
/// `None` marks a sample where the propagation produced non-finite
/// coordinates; such samples are skipped rather than failing the trial.
fn object_track(elements: &CometaryElements, offsets: &[f64]) -> Vec<Option<Vector3<f64>>> {
    let tp = elements.perihelion_epoch;
    offsets
        .iter()
        .map(|&dt| kepler::propagate_cometary(elements, tp + dt).map(|(pos, _)| pos))
        .collect()
}

/// Evaluate one trial: minimum distance to each planet over the grid.
fn evaluate_trial(
    epoch: JulianDate,
    offsets: &[f64],
    track: &[Option<Vector3<f64>>],
) -> [f64; 8] {
    let mut minima = [f64::INFINITY; 8];
    for (&dt, object_pos) in offsets.iter().zip(track) {
        let Some(object_pos) = object_pos else {
            continue;
        };
        let t = epoch + dt;
        for (planet_idx, planet_pos) in ephemeris::all_planet_positions(t).iter().enumerate() {
            let d = (planet_pos - object_pos).norm();
            if d < minima[planet_idx] {
                minima[planet_idx] = d;
            }
        }
    }
    minima
}

/// Run the full batch of randomized trials.
///
/// Samples `config.trials` perihelion epochs, evaluates each trial in
/// parallel, and returns per-trial minimum distances in trial order.
/// Fails fast on invalid configuration; per-trial propagation anomalies
/// are absorbed as infinite distances.
pub fn run_batch(config: &SimulationConfig, elements: &CometaryElements) -> Result<Vec<TrialResult>> {
    config.validate()?;

    let mut sampler = EpochSampler::new(config.seed, config.window_start, config.window_end)?;
    let epochs = sampler.draw_n(config.trials)?;

    let offsets = offset_grid(config.half_width_days, config.step_days);
    let track = object_track(elements, &offsets);
    let missing = track.iter().filter(|s| s.is_none()).count();
    if missing > 0 {
        debug!(missing, steps = offsets.len(), "propagation grid has non-finite samples");
    }

    info!(
        trials = config.trials,
        steps = offsets.len(),
        seed = config.seed,
        "starting Monte Carlo batch"
    );

    let completed = AtomicUsize::new(0);
    let progress_stride = (config.trials / 10).max(1);

    let results: Vec<TrialResult> = epochs
        .par_iter()
        .enumerate()
        .map(|(trial_id, &epoch)| {
            let min_distances_au = evaluate_trial(epoch, &offsets, &track);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % progress_stride == 0 {
                info!(done, total = config.trials, "trials completed");
            }
            TrialResult {
                trial_id,
                perihelion_epoch: epoch,
                min_distances_au,
            }
        })
        .collect();

    info!("Monte Carlo batch finished");
    Ok(results)
}

impl TrialResult {
    /// Minimum distance of this trial to one planet, in AU.
    pub fn min_distance(&self, planet: Planet) -> f64 {
        self.min_distances_au[planet.index()]
    }
}
