//! Published extinction-curve shapes.
//!
//! Each curve family reduces to one of three published parameterizations:
//!
//! - polynomial `a(x), b(x)` pairs with `A(lambda)/A_V = a + b/R_V`
//!   (Cardelli, Clayton & Mathis 1989; O'Donnell 1994 optical update)
//! - an FM90-style UV function joined to a cubic spline through fixed
//!   optical/IR anchor knots (Fitzpatrick 1999; Fitzpatrick & Massa 2007;
//!   Gordon et al. 2003 Magellanic averages)
//! - piecewise fits with Drude features and overlap blending
//!   (Gordon et al. 2023), plus the closed-form Calzetti et al. 2000
//!   starburst law
//!
//! Conventions: `x` is inverse wavelength in 1/micron, `wave` is wavelength
//! in micron. Every public item here returns a curve value; the conversion to
//! an attenuation factor lives in the registry (`extinction::ExtinctionLaw`).

use crate::math::CubicSpline;

/// Drude profile in inverse-wavelength space (the 2175 A bump shape).
fn drude(x: f64, x0: f64, gamma: f64) -> f64 {
    let x2 = x * x;
    x2 / ((x2 - x0 * x0).powi(2) + x2 * gamma * gamma)
}

/// Drude profile in amplitude/center/fractional-width form, as used by the
/// Gordon 2023 optical intermediate-scale features.
fn drude_feature(x: f64, amp: f64, x0: f64, gamma: f64) -> f64 {
    let g0 = gamma / x0;
    amp * g0 * g0 / ((x / x0 - x0 / x).powi(2) + g0 * g0)
}

/// Asymmetric ("modified") Drude profile used by the Gordon 2023 silicate
/// features, with wavelength-dependent width.
fn modified_drude(wave: f64, amp: f64, center: f64, fwhm: f64, asym: f64) -> f64 {
    let g = 2.0 * fwhm / (1.0 + (asym * (wave - center)).exp());
    let g0 = g / center;
    amp * g0 * g0 / ((wave / center - center / wave).powi(2) + g0 * g0)
}

/// FM90 UV parameterization: linear background + bump + far-UV curvature.
struct Fm90 {
    c1: f64,
    c2: f64,
    c3: f64,
    c4: f64,
    x0: f64,
    gamma: f64,
}

impl Fm90 {
    fn eval(&self, x: f64) -> f64 {
        let mut k = self.c1 + self.c2 * x + self.c3 * drude(x, self.x0, self.gamma);
        if x > 5.9 {
            let y = x - 5.9;
            k += self.c4 * (0.5392 * y * y + 0.05644 * y * y * y);
        }
        k
    }
}

// ---------------------------------------------------------------------------
// Cardelli, Clayton & Mathis 1989 (+ O'Donnell 1994 optical polynomials)
// ---------------------------------------------------------------------------

/// `A(lambda)/A_V` for the CCM89 family, valid for `x` in [0.3, 10].
///
/// `od94` swaps in the O'Donnell 1994 optical polynomials; the IR and UV
/// segments are shared.
pub fn ccm_like_axav(x: f64, rv: f64, od94: bool) -> f64 {
    let (a, b) = if x < 1.1 {
        // Infrared.
        let t = x.powf(1.61);
        (0.574 * t, -0.527 * t)
    } else if x < 3.3 {
        // Optical/NIR polynomials in y = x - 1.82.
        let y = x - 1.82;
        if od94 {
            let a = 1.0
                + y * (0.104
                    + y * (-0.609
                        + y * (0.701
                            + y * (1.137
                                + y * (-1.718 + y * (-0.827 + y * (1.647 + y * -0.505)))))));
            let b = y
                * (1.952
                    + y * (2.908
                        + y * (-3.989
                            + y * (-7.985
                                + y * (11.102 + y * (5.491 + y * (-10.805 + y * 3.347)))))));
            (a, b)
        } else {
            let a = 1.0
                + y * (0.17699
                    + y * (-0.50447
                        + y * (-0.02427
                            + y * (0.72085
                                + y * (0.01979 + y * (-0.77530 + y * 0.32999))))));
            let b = y
                * (1.41338
                    + y * (2.28305
                        + y * (1.07233
                            + y * (-5.38434 + y * (-0.62251 + y * (5.30260 + y * -2.09002))))));
            (a, b)
        }
    } else if x < 8.0 {
        // UV, with the far-UV curvature correction beyond x = 5.9.
        let (mut fa, mut fb) = (0.0, 0.0);
        if x >= 5.9 {
            let y = x - 5.9;
            fa = -0.04473 * y * y - 0.009779 * y * y * y;
            fb = 0.2130 * y * y + 0.1207 * y * y * y;
        }
        let a = 1.752 - 0.316 * x - 0.104 / ((x - 4.67).powi(2) + 0.341) + fa;
        let b = -3.090 + 1.825 * x + 1.206 / ((x - 4.62).powi(2) + 0.263) + fb;
        (a, b)
    } else {
        // Far UV.
        let y = x - 8.0;
        let a = -1.073 + y * (-0.628 + y * (0.137 + y * -0.070));
        let b = 13.670 + y * (4.257 + y * (-0.420 + y * 0.374));
        (a, b)
    };

    a + b / rv
}

// ---------------------------------------------------------------------------
// Fitzpatrick 1999
// ---------------------------------------------------------------------------

/// Inverse wavelength above which the analytic UV function applies (2700 A).
const UV_CUT_X: f64 = 1.0e4 / 2700.0;

const F99_SPLINE_X: [f64; 9] = [
    0.0,
    1.0e4 / 26500.0,
    1.0e4 / 12200.0,
    1.0e4 / 6000.0,
    1.0e4 / 5470.0,
    1.0e4 / 4670.0,
    1.0e4 / 4110.0,
    1.0e4 / 2700.0,
    1.0e4 / 2600.0,
];

/// Fitzpatrick 1999 curve for a given R_V, as `A(lambda)/E(B-V)`.
pub struct F99Curve {
    spline: CubicSpline,
    rv: f64,
    c1: f64,
    c2: f64,
}

impl F99Curve {
    pub fn new(rv: f64) -> Self {
        let c2 = -0.824 + 4.717 / rv;
        let c1 = 2.030 - 3.007 * c2;

        // Optical anchors are polynomial in R_V (Fitzpatrick 1999, table 4);
        // the two UV-edge anchors come from the analytic UV function so the
        // spline joins it smoothly.
        let mut k = [0.0; 9];
        k[1] = 0.26469 * rv / 3.1;
        k[2] = 0.82925 * rv / 3.1;
        k[3] = -0.422809 + 1.00270 * rv + 2.13572e-4 * rv * rv;
        k[4] = -5.13540e-2 + 1.00216 * rv - 7.35778e-5 * rv * rv;
        k[5] = 0.700127 + 1.00184 * rv - 3.32598e-5 * rv * rv;
        k[6] = 1.19456 + 1.01707 * rv - 5.46959e-3 * rv * rv + 7.97809e-4 * rv.powi(3)
            - 4.45636e-5 * rv.powi(4);
        k[7] = Self::uv_k(F99_SPLINE_X[7], c1, c2) + rv;
        k[8] = Self::uv_k(F99_SPLINE_X[8], c1, c2) + rv;

        Self {
            spline: CubicSpline::natural(&F99_SPLINE_X, &k),
            rv,
            c1,
            c2,
        }
    }

    fn uv_k(x: f64, c1: f64, c2: f64) -> f64 {
        Fm90 {
            c1,
            c2,
            c3: 3.23,
            c4: 0.41,
            x0: 4.596,
            gamma: 0.99,
        }
        .eval(x)
    }

    /// `A(lambda)/E(B-V)` at inverse wavelength `x`.
    pub fn a_over_ebv(&self, x: f64) -> f64 {
        if x >= UV_CUT_X {
            Self::uv_k(x, self.c1, self.c2) + self.rv
        } else {
            self.spline.eval(x)
        }
    }
}

// ---------------------------------------------------------------------------
// Fitzpatrick & Massa 2007 (fixed R_V = 3.1)
// ---------------------------------------------------------------------------

pub const FM07_RV: f64 = 3.1;

const FM07_SPLINE_X: [f64; 10] = [
    0.0,
    0.25,
    0.50,
    0.75,
    1.0,
    1.0e4 / 5530.0,
    1.0e4 / 4000.0,
    1.0e4 / 3300.0,
    1.0e4 / 2700.0,
    1.0e4 / 2600.0,
];

/// Fitzpatrick & Massa 2007 average Milky Way curve, as
/// `k = E(lambda-V)/E(B-V)`; `A(lambda) = E(B-V) * (k + R_V)`.
pub struct Fm07Curve {
    spline: CubicSpline,
}

impl Fm07Curve {
    pub fn new() -> Self {
        let mut k = [0.0; 10];
        // IR anchors: power law normalized so k(V) = 0.
        for i in 0..5 {
            k[i] = (-0.83 + 0.63 * FM07_RV) * FM07_SPLINE_X[i].powf(1.84) - FM07_RV;
        }
        k[5] = 0.0;
        k[6] = 1.322;
        k[7] = 2.055;
        k[8] = Self::uv_k(FM07_SPLINE_X[8]);
        k[9] = Self::uv_k(FM07_SPLINE_X[9]);

        Self {
            spline: CubicSpline::natural(&FM07_SPLINE_X, &k),
        }
    }

    fn uv_k(x: f64) -> f64 {
        let mut k = Fm90 {
            c1: -0.175,
            c2: 0.807,
            c3: 2.991,
            c4: 0.0,
            x0: 4.592,
            gamma: 0.922,
        }
        .eval(x);
        // FM07 far-UV curvature uses its own pivot and a pure quadratic.
        if x > 6.097 {
            let y = x - 6.097;
            k += 0.319 * y * y;
        }
        k
    }

    /// `E(lambda-V)/E(B-V)` at inverse wavelength `x`.
    pub fn k(&self, x: f64) -> f64 {
        if x >= UV_CUT_X {
            Self::uv_k(x)
        } else {
            self.spline.eval(x)
        }
    }
}

impl Default for Fm07Curve {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Gordon et al. 2003 Magellanic-cloud averages
// ---------------------------------------------------------------------------

/// Optical/NIR anchor inverse wavelengths shared by both G03 averages.
const G03_ANCHOR_X: [f64; 8] = [
    1.0 / 2.198,
    1.0 / 1.65,
    1.0 / 1.25,
    1.0 / 0.81,
    1.0 / 0.65,
    1.0 / 0.55,
    1.0 / 0.44,
    1.0 / 0.37,
];

/// Gordon et al. 2003 average curve (SMC bar or LMC), as `A(lambda)/A_V`.
pub struct G03Curve {
    spline: CubicSpline,
    uv: Fm90,
    rv: f64,
}

impl G03Curve {
    pub fn smc_bar() -> Self {
        Self::build(
            2.74,
            Fm90 {
                c1: -4.959,
                c2: 2.264,
                c3: 0.389,
                c4: 0.461,
                x0: 4.6,
                gamma: 1.0,
            },
            &[0.11, 0.169, 0.25, 0.567, 0.801, 1.0, 1.374, 1.672],
        )
    }

    pub fn lmc_avg() -> Self {
        Self::build(
            3.41,
            Fm90 {
                c1: -0.890,
                c2: 0.998,
                c3: 2.719,
                c4: 0.400,
                x0: 4.579,
                gamma: 0.934,
            },
            &[0.10, 0.186, 0.257, 0.587, 0.790, 1.0, 1.293, 1.518],
        )
    }

    fn build(rv: f64, uv: Fm90, anchors_axav: &[f64; 8]) -> Self {
        // Spline knots: origin + published optical/NIR anchors + two UV-edge
        // values from the FM90 function (converted to A/A_V) for continuity.
        let mut x = Vec::with_capacity(11);
        let mut y = Vec::with_capacity(11);
        x.push(0.0);
        y.push(0.0);
        x.extend_from_slice(&G03_ANCHOR_X);
        y.extend_from_slice(anchors_axav);
        for edge in [UV_CUT_X, 1.0e4 / 2600.0] {
            x.push(edge);
            y.push(1.0 + uv.eval(edge) / rv);
        }

        Self {
            spline: CubicSpline::natural(&x, &y),
            uv,
            rv,
        }
    }

    /// `A(lambda)/A_V` at inverse wavelength `x`.
    pub fn axav(&self, x: f64) -> f64 {
        if x >= UV_CUT_X {
            1.0 + self.uv.eval(x) / self.rv
        } else {
            self.spline.eval(x)
        }
    }

    pub fn rv(&self) -> f64 {
        self.rv
    }
}

// ---------------------------------------------------------------------------
// Gordon et al. 2023 Milky Way average
// ---------------------------------------------------------------------------

/// `A(lambda)/A_V` for the Gordon 2023 Milky Way average at the given R_V.
///
/// The published model is piecewise in wavelength (UV / optical / IR) with
/// linear blending across the two overlap windows, and carries the R_V
/// dependence as `A/A_V = a(x) + b(x) * (1/R_V - 1/3.1)`.
pub fn g23_axav(wave: f64, rv: f64) -> f64 {
    let (a, b) = if wave < 0.3 {
        g23_uv_ab(wave)
    } else if wave < 0.33 {
        let w = (wave - 0.3) / 0.03;
        blend(g23_uv_ab(wave), g23_optical_ab(wave), w)
    } else if wave < 0.9 {
        g23_optical_ab(wave)
    } else if wave < 1.1 {
        let w = (wave - 0.9) / 0.2;
        blend(g23_optical_ab(wave), g23_ir_ab(wave), w)
    } else {
        g23_ir_ab(wave)
    };

    a + b * (1.0 / rv - 1.0 / 3.1)
}

fn blend(lo: (f64, f64), hi: (f64, f64), w: f64) -> (f64, f64) {
    ((1.0 - w) * lo.0 + w * hi.0, (1.0 - w) * lo.1 + w * hi.1)
}

fn g23_uv_ab(wave: f64) -> (f64, f64) {
    let x = 1.0 / wave;
    let a = Fm90 {
        c1: 0.81297,
        c2: 0.2775,
        c3: 1.06295,
        c4: 0.11303,
        x0: 4.60,
        gamma: 0.99,
    }
    .eval(x);
    let b = Fm90 {
        c1: -2.97868,
        c2: 1.89808,
        c3: 3.10334,
        c4: 0.65484,
        x0: 4.60,
        gamma: 0.99,
    }
    .eval(x);
    (a, b)
}

fn g23_optical_ab(wave: f64) -> (f64, f64) {
    let x = 1.0 / wave;
    // Quartic background + three intermediate-scale Drude features.
    let a = -0.35848
        + x * (0.7122 + x * (0.08746 + x * (-0.05403 + x * 0.00674)))
        + drude_feature(x, 0.03893, 2.288, 0.243)
        + drude_feature(x, 0.02965, 2.054, 0.179)
        + drude_feature(x, 0.01747, 1.587, 0.243);
    let b = 0.12354
        + x * (-2.68335 + x * (2.01901 + x * (-0.39299 + x * 0.03355)))
        + drude_feature(x, 0.18453, 2.288, 0.243)
        + drude_feature(x, 0.19728, 2.054, 0.179)
        + drude_feature(x, 0.17130, 1.587, 0.243);
    (a, b)
}

fn g23_ir_ab(wave: f64) -> (f64, f64) {
    // Power-law continuum plus the two silicate features.
    let a = 0.38526 * wave.powf(-1.68467)
        + modified_drude(wave, 0.06652, 9.8434, 2.21205, -0.24703)
        + modified_drude(wave, 0.02670, 19.58294, 17.0, -0.27);
    let b = -1.01251 * wave.powf(-1.06099);
    (a, b)
}

// ---------------------------------------------------------------------------
// Calzetti et al. 2000 starburst attenuation
// ---------------------------------------------------------------------------

pub const CALZETTI_RV: f64 = 4.05;

/// `A(lambda)/E(B-V)` for the Calzetti 2000 starburst law (`wave` in micron).
pub fn calzetti00_k(wave: f64) -> f64 {
    if wave >= 0.63 {
        2.659 * (-1.857 + 1.040 / wave) + CALZETTI_RV
    } else {
        2.659 * (-2.156 + 1.509 / wave - 0.198 / (wave * wave) + 0.011 / wave.powi(3))
            + CALZETTI_RV
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ccm_axav_is_unity_at_v_band() {
        // At the V band (5500 A, x ~ 1.818) A(lambda)/A_V must be ~1.
        let x = 1.0e4 / 5500.0;
        let v = ccm_like_axav(x, 3.1, false);
        assert!((v - 1.0).abs() < 0.01, "CCM A/A_V at V = {v}");
        let v94 = ccm_like_axav(x, 3.1, true);
        assert!((v94 - 1.0).abs() < 0.01, "OD94 A/A_V at V = {v94}");
    }

    #[test]
    fn ccm_uv_exceeds_optical() {
        let uv = ccm_like_axav(1.0e4 / 1500.0, 3.1, false);
        let opt = ccm_like_axav(1.0e4 / 5500.0, 3.1, false);
        assert!(uv > opt);
    }

    #[test]
    fn f99_close_to_rv_at_v_band() {
        let curve = F99Curve::new(3.1);
        // A(5470)/E(B-V) anchor is ~R_V by construction.
        let k = curve.a_over_ebv(1.0e4 / 5470.0);
        assert!((k - 3.1).abs() < 0.1, "F99 A/E(B-V) near V = {k}");
    }

    #[test]
    fn fm07_k_is_zero_at_v_band() {
        let curve = Fm07Curve::new();
        let k = curve.k(1.0e4 / 5530.0);
        assert!(k.abs() < 1e-9, "FM07 k at V = {k}");
    }

    #[test]
    fn g03_axav_is_unity_at_v_band() {
        // 0.55 micron is an anchor knot with A/A_V = 1 for both averages.
        for curve in [G03Curve::smc_bar(), G03Curve::lmc_avg()] {
            let v = curve.axav(1.0 / 0.55);
            assert!((v - 1.0).abs() < 1e-9, "G03 A/A_V at V = {v}");
        }
    }

    #[test]
    fn g03_smc_lacks_strong_bump() {
        // The SMC bar average is famously bump-weak relative to the LMC:
        // compare the 2175 A bump height over the local continuum.
        let smc = G03Curve::smc_bar();
        let lmc = G03Curve::lmc_avg();
        let bump = |c: &G03Curve| c.axav(4.6) - 0.5 * (c.axav(3.8) + c.axav(5.4));
        assert!(bump(&smc) < bump(&lmc));
    }

    #[test]
    fn g23_axav_reasonable_at_v_band() {
        let v = g23_axav(0.55, 3.1);
        assert!((v - 1.0).abs() < 0.1, "G23 A/A_V at V = {v}");
    }

    #[test]
    fn g23_continuous_across_overlaps() {
        for (lo, hi) in [(0.299, 0.301), (0.329, 0.331), (0.899, 0.901), (1.099, 1.101)] {
            let dv = (g23_axav(lo, 3.1) - g23_axav(hi, 3.1)).abs();
            assert!(dv < 0.05, "G23 jump of {dv} across [{lo}, {hi}]");
        }
    }

    #[test]
    fn calzetti_k_decreases_with_wavelength() {
        let k_uv = calzetti00_k(0.15);
        let k_v = calzetti00_k(0.55);
        let k_ir = calzetti00_k(2.0);
        assert!(k_uv > k_v && k_v > k_ir);
        // k(V) ~ R_V for a starburst law.
        assert!((k_v - CALZETTI_RV).abs() < 0.6);
    }
}
