//! Hit classification and the aggregate statistics engine.
//!
//! Counts are accumulated through an associative, commutative tally
//! merge (plain sums), so partial tallies from parallel workers combine
//! into the same aggregate regardless of trial ordering.

use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

use crate::ephemeris::Planet;
use crate::error::{Result, SimulationError};
use crate::kepler::AU_KM;
use crate::models::observed::ObservedApproach;
use crate::simulation::TrialResult;

/// Convert a threshold in millions of km to AU.
pub fn mkm_to_au(mkm: f64) -> f64 {
    mkm * 1e6 / AU_KM
}

/// Convert a distance in AU to millions of km.
pub fn au_to_mkm(au: f64) -> f64 {
    au * AU_KM / 1e6
}

/// Hit test: minimum distance within (inclusive of) the threshold.
pub fn is_hit(min_distance_au: f64, threshold_au: f64) -> bool {
    min_distance_au <= threshold_au
}

/// One (trial, planet, threshold) classification outcome.
#[derive(Debug, Clone, Serialize)]
pub struct HitRecord {
    pub trial_id: usize,
    pub planet: Planet,
    pub min_distance_au: f64,
    pub threshold_au: f64,
    pub threshold_mkm: f64,
    pub hit: bool,
}

/// Classify one trial against every (planet, threshold) pair.
/// Pure; no state carried between trials.
pub fn classify_trial(trial: &TrialResult, thresholds_mkm: &[f64]) -> Vec<HitRecord> {
    let mut records = Vec::with_capacity(8 * thresholds_mkm.len());
    for planet in Planet::ALL {
        let min_distance_au = trial.min_distance(planet);
        for &threshold_mkm in thresholds_mkm {
            let threshold_au = mkm_to_au(threshold_mkm);
            records.push(HitRecord {
                trial_id: trial.trial_id,
                planet,
                min_distance_au,
                threshold_au,
                threshold_mkm,
                hit: is_hit(min_distance_au, threshold_au),
            });
        }
    }
    records
}

/// One-sided empirical tail probability: matches / trials.
///
/// A zero-match tail is reported as 0.0, but the achievable resolution
/// is bounded below by 1/N; the report surfaces that floor explicitly
/// instead of claiming more precision than the trial count supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmpiricalPValue {
    pub matches: usize,
    pub trials: usize,
}

impl EmpiricalPValue {
    pub fn new(matches: usize, trials: usize) -> Self {
        debug_assert!(matches <= trials);
        Self { matches, trials }
    }

    /// The empirical probability, in [0, 1].
    pub fn value(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.matches as f64 / self.trials as f64
        }
    }

    /// Smallest nonzero probability resolvable with this trial count.
    pub fn resolution_floor(&self) -> f64 {
        if self.trials == 0 {
            1.0
        } else {
            1.0 / self.trials as f64
        }
    }

    /// True when no trial matched, i.e. the value is only known to be
    /// below the resolution floor.
    pub fn is_below_resolution(&self) -> bool {
        self.matches == 0
    }
}

impl fmt::Display for EmpiricalPValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_below_resolution() {
            write!(f, "0 (< 1/{} resolution floor)", self.trials)
        } else {
            write!(f, "{:.6}", self.value())
        }
    }
}

/// Partial tally over a subset of trials. Merging is a component-wise
/// sum, so the reduction is associative and commutative.
#[derive(Debug, Clone)]
struct PartialTally {
    trials: usize,
    /// hit_counts[threshold][planet]
    hit_counts: Vec<[usize; 8]>,
    /// Histogram of distinct planets hit per trial at the reference
    /// threshold (0..=8)
    hits_per_trial: [usize; 9],
    /// Trials with min distance <= observed, per planet (only planets in
    /// the observed set are ever read out)
    individual_matches: [usize; 8],
    /// Trials where every joint-subset planet is at or below its
    /// observed distance simultaneously
    joint_matches: usize,
}

impl PartialTally {
    fn empty(n_thresholds: usize) -> Self {
        Self {
            trials: 0,
            hit_counts: vec![[0; 8]; n_thresholds],
            hits_per_trial: [0; 9],
            individual_matches: [0; 8],
            joint_matches: 0,
        }
    }

    fn add_trial(
        mut self,
        trial: &TrialResult,
        thresholds_au: &[f64],
        reference_au: f64,
        observed: &ObservedApproach,
        joint: &[Planet],
    ) -> Self {
        self.trials += 1;

        for planet in Planet::ALL {
            let d = trial.min_distance(planet);
            for (t_idx, &threshold_au) in thresholds_au.iter().enumerate() {
                if is_hit(d, threshold_au) {
                    self.hit_counts[t_idx][planet.index()] += 1;
                }
            }
            if let Some(obs) = observed.get(planet) {
                if d <= obs {
                    self.individual_matches[planet.index()] += 1;
                }
            }
        }

        let hits_at_reference = Planet::ALL
            .iter()
            .filter(|p| is_hit(trial.min_distance(**p), reference_au))
            .count();
        self.hits_per_trial[hits_at_reference] += 1;

        // Joint event evaluated on the same trial, preserving the
        // intra-trial correlation across planets. Never the product of
        // the marginals.
        let joint_hit = joint.iter().all(|&p| {
            observed
                .get(p)
                .map(|obs| trial.min_distance(p) <= obs)
                .unwrap_or(false)
        });
        if joint_hit {
            self.joint_matches += 1;
        }

        self
    }

    fn merge(mut self, other: Self) -> Self {
        self.trials += other.trials;
        for (mine, theirs) in self.hit_counts.iter_mut().zip(&other.hit_counts) {
            for (a, b) in mine.iter_mut().zip(theirs) {
                *a += b;
            }
        }
        for (a, b) in self.hits_per_trial.iter_mut().zip(&other.hits_per_trial) {
            *a += b;
        }
        for (a, b) in self.individual_matches.iter_mut().zip(&other.individual_matches) {
            *a += b;
        }
        self.joint_matches += other.joint_matches;
        self
    }
}

/// Aggregate statistics of a full batch, recomputed from scratch each
/// run; there are no incremental-update semantics.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateStatistics {
    pub trials: usize,
    pub thresholds_mkm: Vec<f64>,
    pub reference_threshold_mkm: f64,
    /// hit_counts[threshold][planet]
    pub hit_counts: Vec<[usize; 8]>,
    /// Distinct planets hit per trial at the reference threshold
    pub hits_per_trial: [usize; 9],
    /// Observed configuration the p-values are measured against
    pub observed_au: BTreeMap<Planet, f64>,
    /// Per-planet one-sided tail probabilities
    pub individual_p: BTreeMap<Planet, EmpiricalPValue>,
    /// Planets forming the joint event
    pub joint_planets: Vec<Planet>,
    /// Probability that all joint planets are simultaneously at or
    /// below their observed distances
    pub joint_p: EmpiricalPValue,
}

impl AggregateStatistics {
    /// Aggregate a batch of trials against the observed configuration.
    ///
    /// Fails if a joint-subset planet has no observed reference
    /// distance; the joint event would be ill-defined.
    pub fn from_trials(
        trials: &[TrialResult],
        observed: &ObservedApproach,
        joint_planets: &[Planet],
        thresholds_mkm: &[f64],
        reference_threshold_mkm: f64,
    ) -> Result<Self> {
        for &planet in joint_planets {
            if observed.get(planet).is_none() {
                return Err(SimulationError::InvalidConfig(format!(
                    "joint subset planet {} has no observed reference distance",
                    planet
                )));
            }
        }

        let thresholds_au: Vec<f64> = thresholds_mkm.iter().map(|&t| mkm_to_au(t)).collect();
        let reference_au = mkm_to_au(reference_threshold_mkm);

        let tally = trials
            .par_iter()
            .fold(
                || PartialTally::empty(thresholds_au.len()),
                |tally, trial| {
                    tally.add_trial(trial, &thresholds_au, reference_au, observed, joint_planets)
                },
            )
            .reduce(|| PartialTally::empty(thresholds_au.len()), PartialTally::merge);

        let individual_p = observed
            .iter()
            .map(|(planet, _)| {
                (
                    planet,
                    EmpiricalPValue::new(tally.individual_matches[planet.index()], tally.trials),
                )
            })
            .collect();

        Ok(Self {
            trials: tally.trials,
            thresholds_mkm: thresholds_mkm.to_vec(),
            reference_threshold_mkm,
            hit_counts: tally.hit_counts,
            hits_per_trial: tally.hits_per_trial,
            observed_au: observed.iter().collect(),
            individual_p,
            joint_planets: joint_planets.to_vec(),
            joint_p: EmpiricalPValue::new(tally.joint_matches, tally.trials),
        })
    }

    /// Number of hitting trials for one planet at one threshold index.
    pub fn hit_count(&self, planet: Planet, threshold_idx: usize) -> usize {
        self.hit_counts[threshold_idx][planet.index()]
    }

    /// Empirical hit probability for one planet at one threshold index.
    pub fn hit_probability(&self, planet: Planet, threshold_idx: usize) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.hit_count(planet, threshold_idx) as f64 / self.trials as f64
        }
    }

    /// Pre-hoc class probability: trials with at least `k` distinct
    /// planets hit at the reference threshold. Reported separately from
    /// the post-hoc joint p-value and never conflated with it.
    pub fn at_least_k(&self, k: usize) -> EmpiricalPValue {
        let matches = self.hits_per_trial.iter().skip(k.min(9)).sum();
        EmpiricalPValue::new(matches, self.trials)
    }
}
