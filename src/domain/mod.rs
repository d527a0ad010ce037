//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the sampled parameter vector (`ParameterVector`)
//! - bounded-uniform priors (`ParamRange`, `PriorBounds`)
//! - the observed spectrum with its likelihood mask (`ObservedSpectrum`)
//! - the per-evaluation synthetic spectrum (`SyntheticSpectrum`)
//! - immutable per-run configuration (`RunConfig`)

pub mod types;

pub use types::*;
