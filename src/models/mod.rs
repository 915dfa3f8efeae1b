//! Domain types: orbital elements, time, and the observed reference
//! configuration.

pub mod elements;
pub mod observed;
pub mod time;

pub use elements::{CometaryElements, OrbitClass};
pub use observed::ObservedApproach;
pub use time::JulianDate;
