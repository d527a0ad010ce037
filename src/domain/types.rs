//! Shared domain types.
//!
//! Conventions that every caller must preserve:
//!
//! - age is log10(yr), metallicity is log10(mass fraction), amplitude is a
//!   log10 rescaling factor; E(B-V) is **linear** magnitudes. The asymmetry is
//!   a deliberate modeling convention, not an accident.
//! - all of these types are immutable for the duration of a sampling run;
//!   evaluations may therefore share them freely across worker threads.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::extinction::ExtinctionLaw;

/// Number of sampled parameters. The posterior is defined over exactly this
/// vector; the external sampler must be configured with the same
/// dimensionality.
pub const N_DIM: usize = 4;

/// One point in parameter space, in sampling order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterVector {
    /// log10 age in years.
    pub log_age: f64,
    /// log10 metallicity (mass fraction).
    pub log_metallicity: f64,
    /// Color excess E(B-V) in magnitudes (linear).
    pub ebv: f64,
    /// log10 amplitude applied to the final synthetic spectrum.
    pub log_amplitude: f64,
}

impl ParameterVector {
    pub fn new(log_age: f64, log_metallicity: f64, ebv: f64, log_amplitude: f64) -> Self {
        Self {
            log_age,
            log_metallicity,
            ebv,
            log_amplitude,
        }
    }

    /// Components in sampling order, as handed over the sampler boundary.
    pub fn to_array(self) -> [f64; N_DIM] {
        [self.log_age, self.log_metallicity, self.ebv, self.log_amplitude]
    }
}

impl From<[f64; N_DIM]> for ParameterVector {
    fn from(v: [f64; N_DIM]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// A closed interval `[low, high]` bounding one parameter's flat prior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub low: f64,
    pub high: f64,
}

impl ParamRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Both ends inclusive, so clamped values are always accepted.
    pub fn contains(&self, v: f64) -> bool {
        v >= self.low && v <= self.high
    }

    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.low, self.high)
    }
}

/// Flat-prior boundaries for the four sampled parameters.
///
/// Read-only during sampling; validated once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorBounds {
    pub age: ParamRange,
    pub metallicity: ParamRange,
    pub ebv: ParamRange,
    pub amplitude: ParamRange,
}

impl Default for PriorBounds {
    fn default() -> Self {
        Self {
            age: ParamRange::new(6.0, 7.5),
            metallicity: ParamRange::new(-3.0, -1.5),
            ebv: ParamRange::new(0.01, 1.0),
            amplitude: ParamRange::new(-20.0, 1.0),
        }
    }
}

impl PriorBounds {
    /// Named ranges in sampling order.
    pub fn ranges(&self) -> [(&'static str, ParamRange); N_DIM] {
        [
            ("age", self.age),
            ("met", self.metallicity),
            ("ebv", self.ebv),
            ("amp", self.amplitude),
        ]
    }

    /// Check that every interval is ordered, warning about ranges that extend
    /// to physically implausible values.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (param, range) in self.ranges() {
            if !(range.low.is_finite() && range.high.is_finite()) || range.low > range.high {
                return Err(ModelError::PriorOrder {
                    param,
                    low: range.low,
                    high: range.high,
                });
            }
        }

        if self.age.low < 5.0 || self.age.high > 11.0 {
            log::warn!(
                "age prior [{}, {}] log yr may extend to unphysically young/old values",
                self.age.low,
                self.age.high
            );
        }
        if self.metallicity.low < -5.0 || self.metallicity.high > -1.3 {
            log::warn!(
                "metallicity prior [{}, {}] may extend to unphysical values",
                self.metallicity.low,
                self.metallicity.high
            );
        }
        if self.ebv.low < 0.0 || self.ebv.high > 100.0 {
            log::warn!(
                "E(B-V) prior [{}, {}] may extend to unphysical values",
                self.ebv.low,
                self.ebv.high
            );
        }

        Ok(())
    }

    /// True iff every component lies inside its interval.
    pub fn contains(&self, p: &ParameterVector) -> bool {
        self.age.contains(p.log_age)
            && self.metallicity.contains(p.log_metallicity)
            && self.ebv.contains(p.ebv)
            && self.amplitude.contains(p.log_amplitude)
    }
}

/// The observed spectrum being fit, with its likelihood mask.
///
/// Immutable for the duration of a run; constructed once, shared by all
/// evaluator invocations.
#[derive(Debug, Clone)]
pub struct ObservedSpectrum {
    wavelength: Vec<f64>,
    flux: Vec<f64>,
    flux_error: Vec<f64>,
    /// `true` = pixel contributes to the likelihood.
    mask: Vec<bool>,
}

impl ObservedSpectrum {
    /// Build an observed spectrum, excluding pixels inside any of the
    /// `exclude_windows` wavelength intervals (union semantics; an empty list
    /// keeps every pixel).
    ///
    /// Windows cover absorption-line or contamination regions that should
    /// not drive the fit (sky lines, geocoronal emission, ISM features).
    pub fn new(
        wavelength: Vec<f64>,
        flux: Vec<f64>,
        flux_error: Vec<f64>,
        exclude_windows: &[[f64; 2]],
    ) -> Result<Self, ModelError> {
        if wavelength.is_empty() {
            return Err(ModelError::SpectrumFormat("wavelength array is empty".into()));
        }
        if flux.len() != wavelength.len() || flux_error.len() != wavelength.len() {
            return Err(ModelError::SpectrumFormat(format!(
                "array lengths disagree: wavelength={}, flux={}, flux_error={}",
                wavelength.len(),
                flux.len(),
                flux_error.len()
            )));
        }
        if wavelength.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ModelError::SpectrumFormat(
                "wavelength array must be strictly increasing".into(),
            ));
        }
        for (k, win) in exclude_windows.iter().enumerate() {
            if !(win[0].is_finite() && win[1].is_finite()) || win[0] > win[1] {
                return Err(ModelError::SpectrumFormat(format!(
                    "mask window {k} is out of order: [{}, {}]",
                    win[0], win[1]
                )));
            }
        }

        let mask = wavelength
            .iter()
            .map(|&wl| !exclude_windows.iter().any(|win| wl >= win[0] && wl <= win[1]))
            .collect();

        Ok(Self {
            wavelength,
            flux,
            flux_error,
            mask,
        })
    }

    pub fn wavelength(&self) -> &[f64] {
        &self.wavelength
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    pub fn flux_error(&self) -> &[f64] {
        &self.flux_error
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn len(&self) -> usize {
        self.wavelength.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelength.is_empty()
    }

    /// Number of pixels contributing to the likelihood.
    pub fn masked_len(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }
}

/// A synthetic spectrum produced by one forward-model evaluation.
///
/// Transient: sampled on the observed wavelength grid it was synthesized for
/// and dropped as soon as the likelihood is computed. Never shared across
/// threads.
#[derive(Debug, Clone)]
pub struct SyntheticSpectrum {
    pub flux: Vec<f64>,
}

/// Immutable configuration for one sampling run.
///
/// Constructed once, then shared by reference; concurrent runs in one process
/// each get their own value, so nothing leaks between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Extinction law applied to every synthesized spectrum.
    pub extinction_law: ExtinctionLaw,
    pub priors: PriorBounds,
    /// Ensemble size, consumed by the external sampler and by
    /// `initial_positions`.
    pub n_walkers: usize,
    /// Chain length, consumed by the external sampler.
    pub n_steps: usize,
    /// Whether the nebular continuum component is added before reddening.
    pub add_nebular: bool,
    /// Standard deviation of the Gaussian ball drawn around the center by
    /// `initial_positions`.
    pub walker_spread: f64,
}

impl RunConfig {
    pub const DEFAULT_N_WALKERS: usize = 128;
    pub const DEFAULT_N_STEPS: usize = 10_000;
    pub const DEFAULT_WALKER_SPREAD: f64 = 0.1;

    /// Resolve and validate a run configuration.
    ///
    /// Invalid law names and out-of-order priors fail here, at configuration
    /// time, never at first use inside the sampling loop.
    pub fn new(extinction_law: &str, priors: PriorBounds) -> Result<Self, ModelError> {
        let law = ExtinctionLaw::from_name(extinction_law)?;
        priors.validate()?;
        log::info!("model spectra will be reddened assuming the {} extinction curve", law.name());

        Ok(Self {
            extinction_law: law,
            priors,
            n_walkers: Self::DEFAULT_N_WALKERS,
            n_steps: Self::DEFAULT_N_STEPS,
            add_nebular: true,
            walker_spread: Self::DEFAULT_WALKER_SPREAD,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prior_bounds_reject_out_of_order() {
        let mut priors = PriorBounds::default();
        priors.ebv = ParamRange::new(1.0, 0.0);
        let err = priors.validate().unwrap_err();
        assert!(matches!(err, ModelError::PriorOrder { param: "ebv", .. }));
    }

    #[test]
    fn prior_bounds_contains_is_inclusive() {
        let priors = PriorBounds::default();
        let on_edge = ParameterVector::new(6.0, -1.5, 1.0, -20.0);
        assert!(priors.contains(&on_edge));
        let outside = ParameterVector::new(5.99, -2.0, 0.5, 0.0);
        assert!(!priors.contains(&outside));
    }

    #[test]
    fn observed_spectrum_mask_windows_union() {
        let wl: Vec<f64> = (0..10).map(|i| 1000.0 + 10.0 * i as f64).collect();
        let spec = ObservedSpectrum::new(
            wl,
            vec![1.0; 10],
            vec![0.1; 10],
            &[[1010.0, 1030.0], [1020.0, 1050.0]],
        )
        .unwrap();
        // Pixels at 1010..=1050 are excluded; 5 remain.
        assert_eq!(spec.masked_len(), 5);
        assert!(spec.mask()[0]);
        assert!(!spec.mask()[1]);
        assert!(!spec.mask()[5]);
        assert!(spec.mask()[6]);
    }

    #[test]
    fn observed_spectrum_empty_window_list_keeps_all() {
        let spec =
            ObservedSpectrum::new(vec![1.0, 2.0, 3.0], vec![0.0; 3], vec![1.0; 3], &[]).unwrap();
        assert_eq!(spec.masked_len(), 3);
    }

    #[test]
    fn observed_spectrum_rejects_length_mismatch() {
        let err = ObservedSpectrum::new(vec![1.0, 2.0], vec![0.0; 3], vec![1.0; 2], &[])
            .unwrap_err();
        assert!(matches!(err, ModelError::SpectrumFormat(_)));
    }

    #[test]
    fn run_config_rejects_unknown_law() {
        let err = RunConfig::new("NotALaw", PriorBounds::default()).unwrap_err();
        assert!(matches!(err, ModelError::UnknownExtinctionLaw { .. }));
    }

    #[test]
    fn run_config_defaults() {
        let config = RunConfig::new("CCM", PriorBounds::default()).unwrap();
        assert_eq!(config.n_walkers, 128);
        assert_eq!(config.n_steps, 10_000);
        assert!(config.add_nebular);
    }
}
