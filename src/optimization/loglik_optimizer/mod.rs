//! loglik_optimizer — argmin-powered log-likelihood maximizer.
//!
//! Purpose
//! -------
//! Provide the high-level optimization layer used to fit state-space models
//! by maximum likelihood. Callers implement the [`LogLikelihood`] trait and
//! invoke [`maximize`] to run L-BFGS with a configurable line search,
//! stopping rules, and finite-difference derivative fallbacks.
//!
//! Key behaviors
//! -------------
//! - Convert a user log-likelihood `ℓ(θ)` into an argmin cost
//!   `c(θ) = -ℓ(θ)` via [`adapter::ArgMinAdapter`].
//! - Validate the initial guess ([`LogLikelihood::check`]), build the solver
//!   ([`builders`]), execute it ([`run::run_lbfgs`]), and normalize results
//!   into an [`OptimOutcome`].
//! - Fall back to validated finite differences ([`finite_diff`]) when no
//!   analytic gradient exists.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameters live in an unconstrained space as [`Theta`]
//!   (`Array1<f64>`); constrained ↔ unconstrained mapping belongs to the
//!   model layer.
//! - Model code reports invalid inputs as recoverable
//!   [`crate::optimization::errors::OptError`] values, never panics.
//! - All user-facing diagnostics (including [`OptimOutcome::value`]) are in
//!   log-likelihood space; the cost sign flip is an internal detail.
//!
//! Downstream usage
//! ----------------
//! - `statespace::estimate::KalmanLikelihood` implements [`LogLikelihood`]
//!   over a model/dataset pair; `statespace::estimate::fit` calls
//!   [`maximize`] with an [`MLEOptions`] configuration.
//! - `inference::hessian` reuses [`finite_diff::compute_hessian`] for
//!   observed-information standard errors.
//!
//! Testing notes
//! -------------
//! - Submodule unit tests cover sign conventions (adapter), solver
//!   construction (builders), derivative validation (finite_diff,
//!   validation), and configuration/outcome invariants (traits).
//! - Integration tests exercise [`maximize`] end-to-end by fitting the
//!   bundled state-space models.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};
