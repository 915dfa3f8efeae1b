//! Lambert transfer solver and the Jupiter intercept scan.
//!
//! Universal-variable formulation of the two-body boundary value problem
//! (single revolution, prograde), plus a universal Kepler propagator for
//! following the resulting transfer orbit. Units are AU and days, with
//! `GM_SUN` as the gravitational parameter.

use nalgebra::Vector3;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::InterceptConfig;
use crate::ephemeris::{self, Planet};
use crate::error::{Result, SimulationError};
use crate::kepler::{self, AU_KM, GM_SUN};
use crate::models::elements::CometaryElements;
use crate::models::time::JulianDate;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Standard Earth gravity, for expressing accelerations in g.
pub const STANDARD_GRAVITY_M_S2: f64 = 9.80665;

/// Stumpff function C(z).
fn stumpff_c(z: f64) -> f64 {
    if z > 1e-8 {
        (1.0 - z.sqrt().cos()) / z
    } else if z < -1e-8 {
        ((-z).sqrt().cosh() - 1.0) / (-z)
    } else {
        0.5 - z / 24.0
    }
}

/// Stumpff function S(z).
fn stumpff_s(z: f64) -> f64 {
    if z > 1e-8 {
        let sz = z.sqrt();
        (sz - sz.sin()) / (sz * sz * sz)
    } else if z < -1e-8 {
        let sz = (-z).sqrt();
        (sz.sinh() - sz) / (sz * sz * sz)
    } else {
        1.0 / 6.0 - z / 120.0
    }
}

/// Solve Lambert's problem: velocities at departure and arrival for the
/// prograde single-revolution transfer from `r1` to `r2` in `tof` days.
pub fn solve_lambert(
    r1: &Vector3<f64>,
    r2: &Vector3<f64>,
    tof: f64,
    mu: f64,
) -> Result<(Vector3<f64>, Vector3<f64>)> {
    if tof <= 0.0 {
        return Err(SimulationError::LambertFailed(
            "time of flight must be positive".into(),
        ));
    }

    let r1n = r1.norm();
    let r2n = r2.norm();
    let cos_dnu = (r1.dot(r2) / (r1n * r2n)).clamp(-1.0, 1.0);

    // Prograde transfer: the sweep direction follows the z-component of
    // the plane normal.
    let dnu = if r1.cross(r2).z >= 0.0 {
        cos_dnu.acos()
    } else {
        2.0 * std::f64::consts::PI - cos_dnu.acos()
    };

    let a_coef = dnu.sin() * (r1n * r2n / (1.0 - cos_dnu)).sqrt();
    if !a_coef.is_finite() || a_coef.abs() < 1e-12 {
        return Err(SimulationError::LambertFailed(
            "degenerate transfer geometry (0 or 180 degree sweep)".into(),
        ));
    }

    let y = |z: f64| r1n + r2n + a_coef * (z * stumpff_s(z) - 1.0) / stumpff_c(z).sqrt();
    let time_of = |z: f64| {
        let yz = y(z);
        if yz < 0.0 {
            return f64::NAN;
        }
        let chi = (yz / stumpff_c(z)).sqrt();
        (chi.powi(3) * stumpff_s(z) + a_coef * yz.sqrt()) / mu.sqrt()
    };

    // t(z) is monotone increasing on the single-revolution branch;
    // bracket it and bisect. y(z) is monotone in z (direction set by the
    // sign of the A coefficient) and must stay positive, so first shrink
    // the bracket to just inside the y > 0 region.
    let four_pi_sq = 4.0 * std::f64::consts::PI * std::f64::consts::PI;
    let mut lo = -4.0 * four_pi_sq;
    let mut hi = four_pi_sq - 1e-6;

    if y(lo) <= 0.0 && y(hi) <= 0.0 {
        return Err(SimulationError::LambertFailed(
            "transfer geometry admits no positive chord parameter".into(),
        ));
    }
    if y(lo) <= 0.0 {
        let (mut bad, mut good) = (lo, hi);
        for _ in 0..200 {
            let mid = (bad + good) / 2.0;
            if y(mid) > 0.0 {
                good = mid;
            } else {
                bad = mid;
            }
            if (good - bad).abs() < 1e-12 {
                break;
            }
        }
        lo = good;
    } else if y(hi) <= 0.0 {
        let (mut good, mut bad) = (lo, hi);
        for _ in 0..200 {
            let mid = (good + bad) / 2.0;
            if y(mid) > 0.0 {
                good = mid;
            } else {
                bad = mid;
            }
            if (bad - good).abs() < 1e-12 {
                break;
            }
        }
        hi = good;
    }
    if time_of(lo) > tof {
        return Err(SimulationError::LambertFailed(format!(
            "no transfer with tof {:.1} days for this geometry",
            tof
        )));
    }

    let mut z = 0.0;
    for _ in 0..200 {
        z = (lo + hi) / 2.0;
        let t = time_of(z);
        if t.is_nan() || t < tof {
            lo = z;
        } else {
            hi = z;
        }
        if (hi - lo).abs() < 1e-12 {
            break;
        }
    }

    let t_final = time_of(z);
    if !t_final.is_finite() || (t_final - tof).abs() > 1e-4 * tof {
        return Err(SimulationError::LambertFailed(format!(
            "bisection did not converge (t = {:.4}, wanted {:.4})",
            t_final, tof
        )));
    }

    let yz = y(z);
    let f = 1.0 - yz / r1n;
    let g = a_coef * (yz / mu).sqrt();
    let g_dot = 1.0 - yz / r2n;

    let v1 = (r2 - f * r1) / g;
    let v2 = (g_dot * r2 - r1) / g;
    Ok((v1, v2))
}

/// Propagate a state vector by `dt` days on its two-body orbit, any
/// conic, via the universal Kepler equation.
pub fn propagate_universal(
    r0: &Vector3<f64>,
    v0: &Vector3<f64>,
    dt: f64,
    mu: f64,
) -> Result<(Vector3<f64>, Vector3<f64>)> {
    if dt == 0.0 {
        return Ok((*r0, *v0));
    }

    let r0n = r0.norm();
    let vr0 = r0.dot(v0) / r0n;
    let alpha = 2.0 / r0n - v0.norm_squared() / mu;
    let sqrt_mu = mu.sqrt();

    let mut chi = sqrt_mu * alpha.abs() * dt;
    let mut converged = false;
    for _ in 0..500 {
        let z = alpha * chi * chi;
        let c = stumpff_c(z);
        let s = stumpff_s(z);
        let f_val = r0n * vr0 / sqrt_mu * chi * chi * c
            + (1.0 - alpha * r0n) * chi.powi(3) * s
            + r0n * chi
            - sqrt_mu * dt;
        let f_der = r0n * vr0 / sqrt_mu * chi * (1.0 - z * s)
            + (1.0 - alpha * r0n) * chi * chi * c
            + r0n;
        let step = f_val / f_der;
        chi -= step;
        if step.abs() < 1e-10 {
            converged = true;
            break;
        }
    }
    if !converged || !chi.is_finite() {
        return Err(SimulationError::LambertFailed(
            "universal Kepler iteration did not converge".into(),
        ));
    }

    let z = alpha * chi * chi;
    let c = stumpff_c(z);
    let s = stumpff_s(z);

    let f = 1.0 - chi * chi / r0n * c;
    let g = dt - chi.powi(3) * s / sqrt_mu;
    let r = f * r0 + g * v0;
    let rn = r.norm();

    let f_dot = sqrt_mu / (rn * r0n) * chi * (z * s - 1.0);
    let g_dot = 1.0 - chi * chi / rn * c;
    let v = f_dot * r0 + g_dot * v0;

    Ok((r, v))
}

/// Best transfer found by the intercept scan.
#[derive(Debug, Clone, Serialize)]
pub struct InterceptSolution {
    pub target: Planet,
    pub departure_epoch: JulianDate,
    pub arrival_epoch: JulianDate,
    pub transfer_days: u32,
    /// Object state at departure
    pub r0_au: [f64; 3],
    pub v0_au_day: [f64; 3],
    /// Velocity the object would need at departure
    pub departure_velocity_au_day: [f64; 3],
    /// Impulsive delta-v magnitude (AU/day)
    pub delta_v_au_day: f64,
}

impl InterceptSolution {
    /// Delta-v in km/s.
    pub fn delta_v_km_s(&self) -> f64 {
        self.delta_v_au_day * AU_KM / SECONDS_PER_DAY
    }

    /// Acceleration if the delta-v were applied continuously over the
    /// transfer, in m/s^2.
    pub fn continuous_acceleration_m_s2(&self) -> f64 {
        self.delta_v_km_s() * 1000.0 / (self.transfer_days as f64 * SECONDS_PER_DAY)
    }

    /// The continuous acceleration expressed in Earth gravities.
    pub fn continuous_g_force(&self) -> f64 {
        self.continuous_acceleration_m_s2() / STANDARD_GRAVITY_M_S2
    }
}

/// One row of the observed-vs-intercept trajectory comparison table.
#[derive(Debug, Clone, Serialize)]
pub struct TrajectoryComparisonRow {
    pub date: String,
    pub days_from_start: u32,
    pub observed_dist_au: f64,
    pub intercept_dist_au: f64,
    pub observed_vel_km_s: f64,
    pub intercept_vel_km_s: f64,
}

/// Scan candidate arrival dates for the minimum-delta-v transfer that
/// puts the object on a collision course with `target`.
///
/// Candidates whose Lambert geometry fails to converge are skipped; the
/// scan only errors when every candidate fails.
pub fn scan_intercept(
    config: &InterceptConfig,
    elements: &CometaryElements,
    target: Planet,
) -> Result<InterceptSolution> {
    config.validate()?;

    let (r0, v0) = kepler::propagate_cometary(elements, config.start_epoch).ok_or_else(|| {
        SimulationError::LambertFailed("object state undefined at departure epoch".into())
    })?;

    info!(
        planet = target.name(),
        scenario = %config.scenario,
        "scanning transfer windows from {} to {} days",
        config.min_transfer_days,
        config.max_transfer_days
    );

    let mut best: Option<InterceptSolution> = None;
    let mut days = config.min_transfer_days;
    while days < config.max_transfer_days {
        let arrival = config.start_epoch + days as f64;
        let r_target = ephemeris::planet_position(target, arrival);

        match solve_lambert(&r0, &r_target, days as f64, GM_SUN) {
            Ok((v_dep, _v_arr)) => {
                let delta_v = (v_dep - v0).norm();
                if best.as_ref().map_or(true, |b| delta_v < b.delta_v_au_day) {
                    best = Some(InterceptSolution {
                        target,
                        departure_epoch: config.start_epoch,
                        arrival_epoch: arrival,
                        transfer_days: days,
                        r0_au: r0.into(),
                        v0_au_day: v0.into(),
                        departure_velocity_au_day: v_dep.into(),
                        delta_v_au_day: delta_v,
                    });
                }
            }
            Err(e) => debug!(days, "skipping candidate: {}", e),
        }
        days += config.scan_step_days;
    }

    best.ok_or(SimulationError::NoInterceptFound)
}

/// Build the observed-vs-intercept trajectory comparison table at the
/// configured step, from departure to arrival.
pub fn comparison_table(
    config: &InterceptConfig,
    elements: &CometaryElements,
    solution: &InterceptSolution,
) -> Result<Vec<TrajectoryComparisonRow>> {
    let r0 = Vector3::from(solution.r0_au);
    let v_dep = Vector3::from(solution.departure_velocity_au_day);
    let to_km_s = AU_KM / SECONDS_PER_DAY;

    let mut rows = Vec::new();
    let mut day = 0u32;
    while day < solution.transfer_days {
        let t = config.start_epoch + day as f64;

        let Some((r_obs, v_obs)) = kepler::propagate_cometary(elements, t) else {
            day += config.table_step_days;
            continue;
        };
        // A non-converging universal propagation skips the row, same as
        // a missing observed sample
        let Ok((r_hyp, v_hyp)) = propagate_universal(&r0, &v_dep, day as f64, GM_SUN) else {
            day += config.table_step_days;
            continue;
        };

        rows.push(TrajectoryComparisonRow {
            date: t.to_datetime().format("%Y-%m-%d").to_string(),
            days_from_start: day,
            observed_dist_au: r_obs.norm(),
            intercept_dist_au: r_hyp.norm(),
            observed_vel_km_s: v_obs.norm() * to_km_s,
            intercept_vel_km_s: v_hyp.norm() * to_km_s,
        });
        day += config.table_step_days;
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stumpff_continuity_at_zero() {
        assert_relative_eq!(stumpff_c(1e-12), 0.5, epsilon = 1e-9);
        assert_relative_eq!(stumpff_s(1e-12), 1.0 / 6.0, epsilon = 1e-9);
        assert_relative_eq!(stumpff_c(0.01), stumpff_c(-0.01), epsilon = 1e-3);
    }

    #[test]
    fn test_lambert_recovers_circular_orbit() {
        // Quarter of a circular 1 AU orbit: the departure velocity is
        // the circular velocity, tangential at r1.
        let mu = GM_SUN;
        let r1 = Vector3::new(1.0, 0.0, 0.0);
        let r2 = Vector3::new(0.0, 1.0, 0.0);
        let period = 2.0 * std::f64::consts::PI / mu.sqrt();
        let (v1, v2) = solve_lambert(&r1, &r2, period / 4.0, mu).unwrap();

        let v_circ = mu.sqrt();
        assert_relative_eq!(v1.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(v1.y, v_circ, epsilon = 1e-6);
        assert_relative_eq!(v2.x, -v_circ, epsilon = 1e-6);
        assert_relative_eq!(v2.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_lambert_short_transfer_propagates_to_target() {
        // A fast 30-day 90-degree transfer sits well below the circular
        // transfer time; the solver must still bracket it, and the
        // departure state must actually reach r2 in the requested time.
        let mu = GM_SUN;
        let r1 = Vector3::new(1.0, 0.0, 0.0);
        let r2 = Vector3::new(0.0, 1.0, 0.0);
        let tof = 30.0;

        let (v1, v2) = solve_lambert(&r1, &r2, tof, mu).unwrap();
        let (r_end, v_end) = propagate_universal(&r1, &v1, tof, mu).unwrap();
        assert_relative_eq!((r_end - r2).norm(), 0.0, epsilon = 1e-6);
        assert_relative_eq!((v_end - v2).norm(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_lambert_rejects_bad_tof() {
        let r1 = Vector3::new(1.0, 0.0, 0.0);
        let r2 = Vector3::new(0.0, 1.0, 0.0);
        assert!(solve_lambert(&r1, &r2, -1.0, GM_SUN).is_err());
        assert!(solve_lambert(&r1, &r2, 0.0, GM_SUN).is_err());
    }

    #[test]
    fn test_universal_propagation_circular_quarter() {
        let mu = GM_SUN;
        let r0 = Vector3::new(1.0, 0.0, 0.0);
        let v0 = Vector3::new(0.0, mu.sqrt(), 0.0);
        let period = 2.0 * std::f64::consts::PI / mu.sqrt();

        let (r, v) = propagate_universal(&r0, &v0, period / 4.0, mu).unwrap();
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(v.x, -mu.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn test_universal_propagation_matches_cometary() {
        // Both propagators must agree on the 3I hyperbola
        let elements = crate::models::elements::CometaryElements::atlas_3i();
        let t0 = elements.perihelion_epoch;
        let (r0, v0) = kepler::propagate_cometary(&elements, t0).unwrap();

        for dt in [10.0, 100.0, 500.0] {
            let (r_uni, _) = propagate_universal(&r0, &v0, dt, GM_SUN).unwrap();
            let (r_kep, _) = kepler::propagate_cometary(&elements, t0 + dt).unwrap();
            assert_relative_eq!((r_uni - r_kep).norm(), 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_scan_finds_jupiter_transfer() {
        let mut config = InterceptConfig::today();
        config.min_transfer_days = 100;
        config.max_transfer_days = 600;
        config.scan_step_days = 50;

        let solution = scan_intercept(
            &config,
            &crate::models::elements::CometaryElements::atlas_3i(),
            Planet::Jupiter,
        )
        .unwrap();

        assert!(solution.delta_v_km_s() > 0.0);
        assert!(solution.delta_v_km_s().is_finite());
        assert!(solution.transfer_days >= 100 && solution.transfer_days < 600);
        // Continuous thrust over months stays far below 1 g
        assert!(solution.continuous_g_force() < 1.0);
    }

    #[test]
    fn test_comparison_table_rows() {
        let mut config = InterceptConfig::today();
        config.min_transfer_days = 100;
        config.max_transfer_days = 300;
        config.scan_step_days = 100;

        let elements = crate::models::elements::CometaryElements::atlas_3i();
        let solution = scan_intercept(&config, &elements, Planet::Jupiter).unwrap();
        let rows = comparison_table(&config, &elements, &solution).unwrap();

        assert!(!rows.is_empty());
        assert_eq!(rows[0].days_from_start, 0);
        // At departure both trajectories share the same position
        assert_relative_eq!(rows[0].observed_dist_au, rows[0].intercept_dist_au, epsilon = 1e-6);
    }
}
