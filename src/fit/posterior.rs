//! Log-posterior evaluation.
//!
//! The wire contract with the external sampler: parameter vector in, one
//! scalar out, where the scalar is either finite or `-inf`, never NaN.
//! `-inf` covers both prior rejection and every per-evaluation numerical
//! pathology (non-finite synthetic flux, zero flux error, wandering
//! proposals hitting an extinction-law domain edge), so a single bad proposal
//! can never abort a run.
//!
//! The prior check runs *before* synthesis and returns immediately on any
//! out-of-bounds component. Callers may rely on synthesis never running for a
//! rejected proposal: ensemble samplers propose outside the box constantly,
//! and synthesis dominates the cost of an evaluation.

use crate::domain::{ObservedSpectrum, ParameterVector, PriorBounds, SyntheticSpectrum};
use crate::error::ModelError;

/// Flat prior: 0 inside the bounds box, `-inf` outside.
pub fn log_prior(params: &ParameterVector, priors: &PriorBounds) -> f64 {
    if priors.contains(params) {
        0.0
    } else {
        f64::NEG_INFINITY
    }
}

/// Masked chi-square log-likelihood: `-0.5 * sum(((y - m) / err)^2)` over the
/// pixels selected by the observation's mask.
///
/// Returns `-inf` when the masked region contains a non-finite model value, a
/// zero flux error, or any term that fails to stay finite. An all-excluded
/// mask yields an empty sum, i.e. 0.
pub fn log_likelihood(observed: &ObservedSpectrum, synthetic: &SyntheticSpectrum) -> f64 {
    let mut chi_square = 0.0;
    for i in 0..observed.len() {
        if !observed.mask()[i] {
            continue;
        }
        let model = synthetic.flux[i];
        let err = observed.flux_error()[i];
        if !model.is_finite() || err == 0.0 {
            return f64::NEG_INFINITY;
        }
        let r = (observed.flux()[i] - model) / err;
        let term = r * r;
        if !term.is_finite() {
            return f64::NEG_INFINITY;
        }
        chi_square += term;
    }
    -0.5 * chi_square
}

/// Log-posterior of `params`: prior short-circuit, then synthesis, then the
/// masked likelihood.
///
/// `synth` is called exactly once for an in-bounds proposal and never for an
/// out-of-bounds one. Synthesis failures are absorbed into `-inf`.
pub fn log_posterior<F>(
    params: &ParameterVector,
    observed: &ObservedSpectrum,
    priors: &PriorBounds,
    synth: F,
) -> f64
where
    F: FnOnce(&ParameterVector) -> Result<SyntheticSpectrum, ModelError>,
{
    let lp = log_prior(params, priors);
    if !lp.is_finite() {
        return f64::NEG_INFINITY;
    }

    let synthetic = match synth(params) {
        Ok(s) => s,
        Err(_) => return f64::NEG_INFINITY,
    };

    lp + log_likelihood(observed, &synthetic)
}
