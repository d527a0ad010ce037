//! Posterior evaluation and the sampler boundary.
//!
//! Responsibilities:
//!
//! - bounded-uniform log-prior and masked chi-square log-likelihood
//! - the prior short-circuit: out-of-bounds proposals never reach synthesis
//! - `SamplerAdapter`: the vector-in/scalar-out callable handed to the
//!   external ensemble sampler, plus initial-position construction

pub mod posterior;
pub mod sampler;

pub use posterior::*;
pub use sampler::*;
