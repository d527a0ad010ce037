//! `ssp-fit` library crate.
//!
//! Bayesian parameter estimation for the integrated light of a star cluster:
//! an observed spectrum is compared against a grid of synthetic
//! stellar-population spectra by an external ensemble-MCMC driver, and this
//! crate is the forward-model and posterior-evaluation core sitting between
//! the two:
//!
//! - interpolate the SSP grid in (age, metallicity)
//! - add a nebular free-free/free-bound continuum
//! - redden with a selectable extinction law
//! - resample onto the observed wavelength grid and rescale
//! - evaluate a masked chi-square log-posterior
//!
//! The sampler itself, chain persistence, plotting, and file parsing are
//! external collaborators: the crate consumes already-parsed in-memory
//! structures and hands back one scalar per proposal.

pub mod domain;
pub mod error;
pub mod extinction;
pub mod fit;
pub mod grid;
pub mod math;
pub mod model;
