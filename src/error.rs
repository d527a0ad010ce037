//! Error taxonomy for the fitting core.
//!
//! Two classes of failure are kept strictly apart:
//!
//! - structural/configuration errors (malformed grid, unknown law name,
//!   out-of-order priors) are returned as `ModelError` and abort before a run
//!   starts
//! - per-evaluation numerical pathologies are absorbed into the `-inf`
//!   log-posterior sentinel by the `fit` layer, so a single bad proposal can
//!   never kill a multi-hour sampling run
//!
//! Messages carry enough context (axis, node, law name, bounds) to fix the
//! input without re-running under a debugger.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// The SSP cube or photon table is malformed or the two disagree.
    #[error("model grid: {0}")]
    GridFormat(String),

    /// The grid is too small to interpolate on the named axis.
    #[error("interpolation: {axis} axis has {count} node(s); at least 2 are required")]
    Interpolation { axis: &'static str, count: usize },

    /// The requested extinction-law name is not in the registry.
    #[error("'{name}' is not a valid choice of extinction law; accepted values are {accepted}")]
    UnknownExtinctionLaw { name: String, accepted: &'static str },

    /// A wavelength fell outside the configured law's valid domain.
    #[error(
        "wavelength {wavelength:.1} A is outside the valid domain \
         [{min:.1}, {max:.1}] A of the {law} law"
    )]
    Domain {
        law: &'static str,
        wavelength: f64,
        min: f64,
        max: f64,
    },

    /// The observed spectrum arrays are inconsistent.
    #[error("observed spectrum: {0}")]
    SpectrumFormat(String),

    /// Prior boundaries are out of order for the named parameter.
    #[error("prior boundaries are out of order for parameter '{param}': low={low}, high={high}")]
    PriorOrder {
        param: &'static str,
        low: f64,
        high: f64,
    },
}
