//! Forward model: nebular continuum generation and spectrum synthesis.
//!
//! `synth::Synthesizer` is the single entry point the posterior evaluator
//! calls; `nebular` holds the Case-B continuum component it composes in.

pub mod nebular;
pub mod synth;

pub use nebular::*;
pub use synth::*;
