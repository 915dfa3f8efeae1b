//! Randomized perihelion-epoch sampling.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, SimulationError};
use crate::models::time::JulianDate;

/// Draws perihelion-passage epochs i.i.d. uniform over a bounded window.
///
/// Seeded with a counter-based RNG so that a fixed seed reproduces the
/// exact same epoch sequence, and with it identical aggregate
/// statistics, across runs.
pub struct EpochSampler {
    rng: ChaCha8Rng,
    start: f64,
    end: f64,
}

impl EpochSampler {
    /// Create a sampler over [start, end). Fails if the window is empty
    /// or inverted.
    pub fn new(seed: u64, start: JulianDate, end: JulianDate) -> Result<Self> {
        if start >= end {
            return Err(SimulationError::InvalidConfig(format!(
                "epoch window start (JD {}) must precede end (JD {})",
                start.value(),
                end.value()
            )));
        }
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            start: start.value(),
            end: end.value(),
        })
    }

    /// Draw one perihelion epoch.
    pub fn draw(&mut self) -> JulianDate {
        JulianDate::new(self.rng.gen_range(self.start..self.end))
    }

    /// Draw `n` independent epochs. Fails if `n` is zero.
    pub fn draw_n(&mut self, n: usize) -> Result<Vec<JulianDate>> {
        if n == 0 {
            return Err(SimulationError::InvalidConfig(
                "trial count must be positive".into(),
            ));
        }
        Ok((0..n).map(|_| self.draw()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> (JulianDate, JulianDate) {
        (JulianDate::new(2418672.5), JulianDate::new(2466154.5))
    }

    #[test]
    fn test_draws_stay_in_window() {
        let (start, end) = window();
        let mut sampler = EpochSampler::new(1, start, end).unwrap();
        for epoch in sampler.draw_n(1000).unwrap() {
            assert!(epoch >= start && epoch < end);
        }
    }

    #[test]
    fn test_fixed_seed_reproduces_sequence() {
        let (start, end) = window();
        let a = EpochSampler::new(42, start, end).unwrap().draw_n(100).unwrap();
        let b = EpochSampler::new(42, start, end).unwrap().draw_n(100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let (start, end) = window();
        let a = EpochSampler::new(1, start, end).unwrap().draw_n(10).unwrap();
        let b = EpochSampler::new(2, start, end).unwrap().draw_n(10).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_inverted_window_rejected() {
        let (start, end) = window();
        assert!(EpochSampler::new(0, end, start).is_err());
        assert!(EpochSampler::new(0, start, start).is_err());
    }

    #[test]
    fn test_zero_draws_rejected() {
        let (start, end) = window();
        let mut sampler = EpochSampler::new(0, start, end).unwrap();
        assert!(sampler.draw_n(0).is_err());
    }

    #[test]
    fn test_draws_cover_the_window() {
        // With 2000 draws over 130 years, both halves of the window
        // should be populated.
        let (start, end) = window();
        let mid = (start.value() + end.value()) / 2.0;
        let draws = EpochSampler::new(9, start, end).unwrap().draw_n(2000).unwrap();
        let below = draws.iter().filter(|d| d.value() < mid).count();
        assert!(below > 500 && below < 1500, "unbalanced draws: {}", below);
    }
}
