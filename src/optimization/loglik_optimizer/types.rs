//! Shared numeric aliases and pre-wired solver types for the optimizer.
//!
//! Centralizing these aliases keeps the rest of the optimization code
//! agnostic to `ndarray` and Argmin generics: parameter vectors, gradients,
//! Hessians, and scalar costs all have one canonical spelling, and the
//! L-BFGS solver types are pinned to those shapes once.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are column vectors with length equal to the number of
//!   free (unconstrained) parameters.
//! - `Cost` is a scalar in cost space, `c(θ) = -ℓ(θ)`; sign handling lives in
//!   the adapter, never here.
//! - `DEFAULT_LBFGS_MEM` is the history size used when a run does not
//!   override it.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Unconstrained parameter vector `θ` used by the optimizer.
pub type Theta = Array1<f64>;

/// Gradient vector matching the shape of [`Theta`].
pub type Grad = Array1<f64>;

/// Dense Hessian matrix, `n × n` for `n = Theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value in cost space, `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver, keyed by argmin's
/// counter names (e.g. `"cost_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Hager–Zhang line search specialized to this crate's numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
