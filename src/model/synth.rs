//! Forward-model synthesis.
//!
//! One synthetic spectrum per proposal, composed in a fixed order:
//!
//! 1. interpolate the stellar spectrum and photon rate at (age, metallicity)
//! 2. add the nebular continuum, *before* reddening: the nebular gas sits
//!    behind the same foreground dust column as the stars
//! 3. attenuate with the run's extinction law and the candidate E(B-V)
//! 4. resample onto the observed wavelength grid
//! 5. rescale by 10^(log amplitude)
//!
//! Amplitude comes last so it stays a pure normalization knob, decoupled from
//! the shape parameters.

use crate::domain::{ParameterVector, RunConfig, SyntheticSpectrum};
use crate::error::ModelError;
use crate::extinction::ExtinctionLaw;
use crate::grid::GridStore;
use crate::math::resample_linear;
use crate::model::nebular::nebular_continuum;

/// Synthesizes model spectra against one grid + run configuration.
///
/// Pure and stateless between calls; a single instance may be shared across
/// evaluation threads.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'a> {
    grid: &'a GridStore,
    law: ExtinctionLaw,
    add_nebular: bool,
}

impl<'a> Synthesizer<'a> {
    pub fn new(grid: &'a GridStore, config: &RunConfig) -> Self {
        Self {
            grid,
            law: config.extinction_law,
            add_nebular: config.add_nebular,
        }
    }

    /// Synthetic spectrum for `params`, sampled on `observed_wavelength`.
    pub fn synthesize(
        &self,
        params: &ParameterVector,
        observed_wavelength: &[f64],
    ) -> Result<SyntheticSpectrum, ModelError> {
        let (mut flux, log_rate) = self
            .grid
            .interpolate(params.log_age, params.log_metallicity)?;

        if self.add_nebular {
            let nebular = nebular_continuum(log_rate, self.grid.wavelength());
            for (f, n) in flux.iter_mut().zip(nebular.iter()) {
                *f += n;
            }
        }

        let factors = self.law.attenuation_factors(self.grid.wavelength(), params.ebv)?;
        for (f, k) in flux.iter_mut().zip(factors.iter()) {
            *f = (*f * k).max(0.0);
        }

        let mut resampled = resample_linear(self.grid.wavelength(), &flux, observed_wavelength);

        let amplitude = 10f64.powf(params.log_amplitude);
        for f in &mut resampled {
            *f *= amplitude;
        }

        Ok(SyntheticSpectrum { flux: resampled })
    }
}
