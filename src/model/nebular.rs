//! Nebular free-free/free-bound continuum.
//!
//! The continuum is built from a sparse table of HI + HeI emission
//! coefficients (free-free, bound-free, and two-photon emission, with
//! He/H = 0.1), assuming typical Case-B conditions (T = 1e4 K, no escaping
//! ionizing photons). Coefficient values follow Aller (1984) and Ferland
//! (1980). The tabulated points sit at recombination edges, so consecutive
//! near-duplicate wavelengths encode the discontinuities.
//!
//! The component scales linearly with the ionizing-photon rate; a non-finite
//! or below-floor log rate is the "no nebular component" sentinel and yields
//! a zero array, so callers can disable the component without a separate code
//! path.

use crate::math::interp_extrapolated;

/// Emission coefficients in units of 1e-40 erg cm^3 s^-1 Hz^-1.
const GAMMA: [f64; 24] = [
    0.0, 2.11e-4, 5.647, 9.35, 9.847, 10.582, 16.101, 24.681, 26.736, 24.883, 29.979, 6.519,
    8.773, 11.545, 13.585, 6.333, 10.444, 7.023, 9.361, 7.59, 9.35, 8.32, 9.53, 8.87,
];

/// Wavelengths (Angstrom) of the tabulated coefficients.
const GAMMA_WAVELENGTH: [f64; 24] = [
    912.0, 913.0, 1300.0, 1500.0, 1800.0, 2200.0, 2855.0, 3331.0, 3421.0, 3422.0, 3642.0,
    3648.0, 5700.0, 7000.0, 8207.0, 8209.0, 14583.0, 14585.0, 22787.0, 22789.0, 32813.0,
    32815.0, 44680.0, 44682.0,
];

/// Case-B recombination coefficient, cm^3 s^-1.
const ALPHA_B: f64 = 2.6e-13;

/// Reference log10 photon rate the tabulated continuum is evaluated at.
const LOG_Q_BASE: f64 = 52.0;

/// Speed of light in Angstrom/s.
const C_ANGSTROM: f64 = 2.998e18;

/// Solar luminosity in erg/s; output is in solar luminosities per Angstrom.
const L_SUN: f64 = 3.83e33;

/// log10 photon rates below this floor disable the component entirely.
pub const LOG_RATE_FLOOR: f64 = 0.0;

/// Nebular continuum in solar luminosities per Angstrom on `wavelength`.
///
/// `log_photon_rate` is log10 of the ionizing-photon production rate. NaN or
/// anything below `LOG_RATE_FLOOR` returns a zero array.
pub fn nebular_continuum(log_photon_rate: f64, wavelength: &[f64]) -> Vec<f64> {
    if !log_photon_rate.is_finite() || log_photon_rate < LOG_RATE_FLOOR {
        return vec![0.0; wavelength.len()];
    }

    // Continuum at the reference rate, per tabulated wavelength:
    // L_nu -> L_lambda via c/lambda^2, photon budget 10^Q / alpha_B.
    let mut base = [0.0; 24];
    for (b, (&g, &wl)) in base
        .iter_mut()
        .zip(GAMMA.iter().zip(GAMMA_WAVELENGTH.iter()))
    {
        *b = (C_ANGSTROM * g * 1e-40 * 10f64.powf(LOG_Q_BASE)) / (ALPHA_B * wl * wl) / L_SUN;
    }

    let scale = 10f64.powf(log_photon_rate - LOG_Q_BASE);
    wavelength
        .iter()
        .map(|&wl| (interp_extrapolated(&GAMMA_WAVELENGTH, &base, wl) * scale).max(0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_rates_yield_zero_continuum() {
        let wl = [1000.0, 5000.0, 20000.0];
        for rate in [f64::NAN, f64::NEG_INFINITY, -5.0] {
            let out = nebular_continuum(rate, &wl);
            assert!(out.iter().all(|&f| f == 0.0), "rate {rate} not disabled");
        }
    }

    #[test]
    fn matches_closed_form_at_table_wavelength() {
        // At a tabulated wavelength the interpolation is exact.
        let out = nebular_continuum(52.0, &[1500.0]);
        let expected = (2.998e18 * 9.35e-40 * 1e52) / (2.6e-13 * 1500.0 * 1500.0) / 3.83e33;
        assert!((out[0] - expected).abs() < 1e-9 * expected);
    }

    #[test]
    fn scales_linearly_with_photon_rate() {
        let wl = [1500.0, 3000.0, 7000.0];
        let lo = nebular_continuum(51.0, &wl);
        let hi = nebular_continuum(52.0, &wl);
        for (l, h) in lo.iter().zip(hi.iter()) {
            assert!((h - 10.0 * l).abs() < 1e-9 * h);
        }
    }

    #[test]
    fn continuum_is_never_negative() {
        // Extrapolation below the 912 A edge would go negative; it is floored.
        let out = nebular_continuum(52.0, &[800.0, 912.0, 50000.0]);
        assert!(out.iter().all(|&f| f >= 0.0));
    }
}
