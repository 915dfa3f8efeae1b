//! Analytic planetary ephemeris.
//!
//! Heliocentric planet positions from the JPL approximate mean Keplerian
//! elements (Standish), valid 1800-2050 AD, which covers the full
//! 1910-2040 sampling window. Accuracy is a few thousandths of an AU,
//! ample against hit thresholds of 25-150 million km.
//!
//! The Earth entry is the Earth-Moon barycenter; the outer planets are
//! their system barycenters in the underlying fit, matching what the
//! close-approach statistic actually compares against.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::kepler::{ecliptic_to_equatorial, perifocal_to_ecliptic, solve_elliptic};
use crate::models::time::JulianDate;

/// The eight major planets, ordered by distance from the Sun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Planet {
    /// All planets in order from the Sun.
    pub const ALL: [Planet; 8] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Earth,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
        }
    }

    /// Index into per-planet arrays (0 = Mercury .. 7 = Neptune).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Parse a planet from its English name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Planet> {
        Planet::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for Planet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Mean elements at J2000.0 plus per-century rates.
/// a in AU; angles in degrees; rates per Julian century.
struct MeanElements {
    a: f64,
    e: f64,
    i: f64,
    /// Mean longitude L
    l: f64,
    /// Longitude of perihelion (varpi)
    long_peri: f64,
    /// Longitude of the ascending node
    long_node: f64,
    a_dot: f64,
    e_dot: f64,
    i_dot: f64,
    l_dot: f64,
    long_peri_dot: f64,
    long_node_dot: f64,
}

/// JPL approximate planetary elements, 1800-2050 fit (Standish, Table 1).
#[rustfmt::skip]
const MEAN_ELEMENTS: [MeanElements; 8] = [
    // Mercury
    MeanElements { a: 0.38709927, e: 0.20563593, i: 7.00497902, l: 252.25032350, long_peri: 77.45779628, long_node: 48.33076593,
                   a_dot: 0.00000037, e_dot: 0.00001906, i_dot: -0.00594749, l_dot: 149472.67411175, long_peri_dot: 0.16047689, long_node_dot: -0.12534081 },
    // Venus
    MeanElements { a: 0.72333566, e: 0.00677672, i: 3.39467605, l: 181.97909950, long_peri: 131.60246718, long_node: 76.67984255,
                   a_dot: 0.00000390, e_dot: -0.00004107, i_dot: -0.00078890, l_dot: 58517.81538729, long_peri_dot: 0.00268329, long_node_dot: -0.27769418 },
    // Earth-Moon barycenter
    MeanElements { a: 1.00000261, e: 0.01671123, i: -0.00001531, l: 100.46457166, long_peri: 102.93768193, long_node: 0.0,
                   a_dot: 0.00000562, e_dot: -0.00004392, i_dot: -0.01294668, l_dot: 35999.37244981, long_peri_dot: 0.32327364, long_node_dot: 0.0 },
    // Mars
    MeanElements { a: 1.52371034, e: 0.09339410, i: 1.84969142, l: -4.55343205, long_peri: -23.94362959, long_node: 49.55953891,
                   a_dot: 0.00001847, e_dot: 0.00007882, i_dot: -0.00813131, l_dot: 19140.30268499, long_peri_dot: 0.44441088, long_node_dot: -0.29257343 },
    // Jupiter
    MeanElements { a: 5.20288700, e: 0.04838624, i: 1.30439695, l: 34.39644051, long_peri: 14.72847983, long_node: 100.47390909,
                   a_dot: -0.00011607, e_dot: -0.00013253, i_dot: -0.00183714, l_dot: 3034.74612775, long_peri_dot: 0.21252668, long_node_dot: 0.20469106 },
    // Saturn
    MeanElements { a: 9.53667594, e: 0.05386179, i: 2.48599187, l: 49.95424423, long_peri: 92.59887831, long_node: 113.66242448,
                   a_dot: -0.00125060, e_dot: -0.00050991, i_dot: 0.00193609, l_dot: 1222.49362201, long_peri_dot: -0.41897216, long_node_dot: -0.28867794 },
    // Uranus
    MeanElements { a: 19.18916464, e: 0.04725744, i: 0.77263783, l: 313.23810451, long_peri: 170.95427630, long_node: 74.01692503,
                   a_dot: -0.00196176, e_dot: -0.00004397, i_dot: -0.00242939, l_dot: 428.48202785, long_peri_dot: 0.40805281, long_node_dot: 0.04240589 },
    // Neptune
    MeanElements { a: 30.06992276, e: 0.00859048, i: 1.77004347, l: -55.12002969, long_peri: 44.96476227, long_node: 131.78422574,
                   a_dot: 0.00026291, e_dot: 0.00005105, i_dot: 0.00035372, l_dot: 218.45945325, long_peri_dot: -0.32241464, long_node_dot: -0.00508664 },
];

/// Normalize an angle in degrees to [-180, 180).
fn normalize_deg(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a >= 180.0 {
        a - 360.0
    } else {
        a
    }
}

/// Heliocentric position of a planet at `jd`, equatorial frame, AU.
pub fn planet_position(planet: Planet, jd: JulianDate) -> Vector3<f64> {
    let t = jd.centuries_since_j2000();
    let el = &MEAN_ELEMENTS[planet.index()];

    let a = el.a + el.a_dot * t;
    let e = el.e + el.e_dot * t;
    let i = (el.i + el.i_dot * t).to_radians();
    let l = el.l + el.l_dot * t;
    let long_peri = el.long_peri + el.long_peri_dot * t;
    let long_node = el.long_node + el.long_node_dot * t;

    // Argument of perihelion and mean anomaly from the longitudes
    let peri = (long_peri - long_node).to_radians();
    let node = long_node.to_radians();
    let m = normalize_deg(l - long_peri).to_radians();

    let ea = solve_elliptic(m, e);

    // Perifocal coordinates
    let x_orb = a * (ea.cos() - e);
    let y_orb = a * (1.0 - e * e).sqrt() * ea.sin();

    let ecliptic = perifocal_to_ecliptic(x_orb, y_orb, peri, i, node);
    ecliptic_to_equatorial(&ecliptic)
}

/// Positions of all eight planets at `jd`, equatorial frame, AU.
pub fn all_planet_positions(jd: JulianDate) -> [Vector3<f64>; 8] {
    Planet::ALL.map(|p| planet_position(p, jd))
}
