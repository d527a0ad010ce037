//! The SSP model grid: in-memory store and bilinear interpolation.
//!
//! Responsibilities:
//!
//! - assemble the model cube and ionizing-photon table into dense, validated
//!   (metallicity x age) grids (`GridStore::load`)
//! - produce a spectrum + photon rate at an arbitrary (age, metallicity)
//!   query by bilinear interpolation, clamped at the grid boundary

pub mod interp;
pub mod store;

pub use store::*;
