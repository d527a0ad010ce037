//! Sampler boundary.
//!
//! The external ensemble-MCMC driver sees exactly one callable: parameter
//! vector in, log-posterior scalar out. `SamplerAdapter` closes over the
//! validated grid, observed spectrum, and run configuration, so the driver
//! needs no knowledge of the synthesis pipeline.
//!
//! The adapter also hosts the two ensemble conveniences that sit outside the
//! posterior computation proper:
//!
//! - `evaluate_batch`: all walkers' proposals for one step evaluated in
//!   parallel (the evaluator is pure over shared read-only state, so this is
//!   a plain data-parallel map)
//! - `initial_positions`: a Gaussian ball around a caller-supplied center,
//!   clamped into the prior box so no walker starts rejected

use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;

use crate::domain::{N_DIM, ObservedSpectrum, ParameterVector, RunConfig};
use crate::error::ModelError;
use crate::fit::posterior;
use crate::grid::GridStore;
use crate::model::Synthesizer;

/// The posterior callable handed to the external ensemble sampler.
#[derive(Debug)]
pub struct SamplerAdapter<'a> {
    observed: &'a ObservedSpectrum,
    config: &'a RunConfig,
    synth: Synthesizer<'a>,
}

impl<'a> SamplerAdapter<'a> {
    /// Wire up a run, failing fast on configurations that could never
    /// evaluate: a grid too small to interpolate, or a model wavelength grid
    /// extending beyond the configured law's valid domain (the wavelength
    /// grid is run-constant, so every evaluation would be `-inf`).
    pub fn new(
        grid: &'a GridStore,
        observed: &'a ObservedSpectrum,
        config: &'a RunConfig,
    ) -> Result<Self, ModelError> {
        if grid.log_ages().len() < 2 {
            return Err(ModelError::Interpolation {
                axis: "age",
                count: grid.log_ages().len(),
            });
        }
        if grid.metallicities().len() < 2 {
            return Err(ModelError::Interpolation {
                axis: "metallicity",
                count: grid.metallicities().len(),
            });
        }

        let (min, max) = config.extinction_law.wavelength_domain();
        for &edge in &[grid.wavelength()[0], grid.wavelength()[grid.wavelength().len() - 1]] {
            if edge < min || edge > max {
                return Err(ModelError::Domain {
                    law: config.extinction_law.name(),
                    wavelength: edge,
                    min,
                    max,
                });
            }
        }

        Ok(Self {
            observed,
            config,
            synth: Synthesizer::new(grid, config),
        })
    }

    /// Log-posterior for one proposal. Finite or `-inf`, never NaN.
    pub fn log_posterior(&self, params: &ParameterVector) -> f64 {
        posterior::log_posterior(params, self.observed, &self.config.priors, |p| {
            self.synth.synthesize(p, self.observed.wavelength())
        })
    }

    /// Log-posteriors for a whole ensemble step, evaluated in parallel.
    ///
    /// The ensemble sampler synchronizes between steps, so this is the unit
    /// of parallelism: one map over the step's proposals.
    pub fn evaluate_batch(&self, positions: &[ParameterVector]) -> Vec<f64> {
        positions
            .par_iter()
            .map(|p| self.log_posterior(p))
            .collect()
    }

    /// Initial walker positions: an `n_walkers x 4` matrix drawn from a
    /// Gaussian ball of width `config.walker_spread` around `center`, with
    /// each coordinate clamped into its prior interval.
    ///
    /// If `center` satisfies the priors, so does every returned row.
    pub fn initial_positions<R: Rng>(
        &self,
        center: &ParameterVector,
        rng: &mut R,
    ) -> DMatrix<f64> {
        let n = self.config.n_walkers;
        let spread = self.config.walker_spread;
        let center = center.to_array();
        let ranges = self.config.priors.ranges();

        let mut positions = DMatrix::zeros(n, N_DIM);
        for w in 0..n {
            for d in 0..N_DIM {
                let offset: f64 = rng.sample(StandardNormal);
                positions[(w, d)] = ranges[d].1.clamp(center[d] + spread * offset);
            }
        }
        positions
    }
}
