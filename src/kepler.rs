//! Two-body propagation primitives.
//!
//! Kepler equation solvers for the elliptic and hyperbolic cases, the
//! perifocal/ecliptic/equatorial frame rotations, and state-vector
//! propagation of cometary elements. Units are AU and days throughout,
//! with the Gaussian gravitational constant setting GM of the Sun.

use nalgebra::Vector3;

use crate::models::elements::CometaryElements;
use crate::models::time::JulianDate;

/// Kilometers per astronomical unit.
pub const AU_KM: f64 = 149_597_870.7;

/// Gaussian gravitational constant k (AU^(3/2) / day).
pub const GAUSS_K: f64 = 0.01720209895;

/// Heliocentric gravitational parameter GM = k^2 (AU^3 / day^2).
pub const GM_SUN: f64 = GAUSS_K * GAUSS_K;

/// Mean obliquity of the ecliptic at J2000.0 (degrees).
pub const OBLIQUITY_DEG: f64 = 23.4392911;

const NEWTON_TOL: f64 = 1e-8;
const NEWTON_MAX_ITER: usize = 100;

/// Solve the elliptic Kepler equation M = E - e sin E for E (radians).
pub fn solve_elliptic(m: f64, e: f64) -> f64 {
    // Starting from M converges for small e; for high e start at pi
    let mut ea = if e < 0.8 { m } else { std::f64::consts::PI.copysign(m) };
    for _ in 0..NEWTON_MAX_ITER {
        let f = ea - e * ea.sin() - m;
        let df = 1.0 - e * ea.cos();
        let d = f / df;
        ea -= d;
        if d.abs() < NEWTON_TOL {
            break;
        }
    }
    ea
}

/// Solve the hyperbolic Kepler equation M = e sinh H - H for H (radians).
pub fn solve_hyperbolic(m: f64, e: f64) -> f64 {
    let mut h = m / (e - 1.0);
    // Newton converges slowly from the linear guess when |M| is large;
    // the asinh guess keeps it within a few iterations there.
    if h.abs() > 10.0 {
        h = (m / e).asinh();
    }
    for _ in 0..NEWTON_MAX_ITER {
        let f = e * h.sinh() - h - m;
        let df = e * h.cosh() - 1.0;
        let dh = f / df;
        h -= dh;
        if dh.abs() < NEWTON_TOL {
            break;
        }
    }
    h
}

/// Rotate perifocal (orbital-plane) coordinates into the heliocentric
/// ecliptic frame. Angles in radians.
pub fn perifocal_to_ecliptic(x_orb: f64, y_orb: f64, peri: f64, incl: f64, node: f64) -> Vector3<f64> {
    // Rotate by omega around z, then i around x, then Omega around z
    let (sin_peri, cos_peri) = peri.sin_cos();
    let x1 = x_orb * cos_peri - y_orb * sin_peri;
    let y1 = x_orb * sin_peri + y_orb * cos_peri;

    let (sin_i, cos_i) = incl.sin_cos();
    let x2 = x1;
    let y2 = y1 * cos_i;
    let z2 = y1 * sin_i;

    let (sin_node, cos_node) = node.sin_cos();
    Vector3::new(
        x2 * cos_node - y2 * sin_node,
        x2 * sin_node + y2 * cos_node,
        z2,
    )
}

/// Rotate a heliocentric ecliptic vector into the equatorial frame.
pub fn ecliptic_to_equatorial(v: &Vector3<f64>) -> Vector3<f64> {
    let eps = OBLIQUITY_DEG.to_radians();
    let (s, c) = eps.sin_cos();
    Vector3::new(v.x, v.y * c - v.z * s, v.y * s + v.z * c)
}

/// Heliocentric state vector (position AU, velocity AU/day) of a body on
/// a hyperbolic orbit at time `t`.
///
/// Returns `None` when the propagation produces non-finite components,
/// which the caller treats as a missing sample rather than an error.
pub fn propagate_cometary(elements: &CometaryElements, t: JulianDate) -> Option<(Vector3<f64>, Vector3<f64>)> {
    let a = elements.semi_major_axis();
    let e = elements.eccentricity;
    debug_assert!(e > 1.0, "cometary propagation expects a hyperbolic orbit");

    let n = (GM_SUN / a.abs().powi(3)).sqrt();
    let m = n * (t - elements.perihelion_epoch);
    let h = solve_hyperbolic(m, e);

    let (sinh_h, cosh_h) = (h.sinh(), h.cosh());

    // Perifocal position: x = a(cosh H - e), y = -a sqrt(e^2 - 1) sinh H.
    // a < 0 for hyperbolae, so y has the sign of the true anomaly.
    let x_orb = a * (cosh_h - e);
    let y_orb = -a * (e * e - 1.0).sqrt() * sinh_h;

    // dM/dt = n and M = e sinh H - H give dH/dt = n / (e cosh H - 1)
    let h_dot = n / (e * cosh_h - 1.0);
    let vx_orb = a * sinh_h * h_dot;
    let vy_orb = -a * (e * e - 1.0).sqrt() * cosh_h * h_dot;

    let peri = elements.periapsis_argument.to_radians();
    let incl = elements.inclination.to_radians();
    let node = elements.ascending_node.to_radians();

    let pos = ecliptic_to_equatorial(&perifocal_to_ecliptic(x_orb, y_orb, peri, incl, node));
    let vel = ecliptic_to_equatorial(&perifocal_to_ecliptic(vx_orb, vy_orb, peri, incl, node));

    if pos.iter().chain(vel.iter()).all(|c| c.is_finite()) {
        Some((pos, vel))
    } else {
        None
    }
}
