//! Mathematical utilities: axis bracketing, linear interpolation/resampling,
//! and a natural cubic spline.

pub mod interp;
pub mod spline;

pub use interp::*;
pub use spline::*;
