//! High-level entry point for maximizing a user-provided [`LogLikelihood`].
//!
//! Selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the model in an [`ArgMinAdapter`] (which *minimizes*
//! `-ℓ(θ)`), and delegates execution to `run_lbfgs`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize a log-likelihood `ℓ(θ)` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Wraps `(f, data)` in an adapter exposing the minimization problem
///   `c(θ) = -ℓ(θ)` to argmin.
/// - Builds the solver selected by `opts.line_searcher` and runs it.
///
/// # Parameters
/// - `f`: the model implementing [`LogLikelihood`].
/// - `theta0`: initial unconstrained parameter vector (consumed).
/// - `data`: model data passed through to `value`/`grad`.
/// - `opts`: optimizer options.
///
/// # Returns
/// An [`OptimOutcome`] with `theta_hat`, the best value `ℓ(θ̂)`, termination
/// status, iteration count, function-evaluation counters, and optionally the
/// gradient norm. A non-converged run is reported through the outcome's
/// `converged`/`status` fields, not as an error.
///
/// # Errors
/// - Propagates errors from `f.check`, the solver builders, and the runner.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use rust_statespace::optimization::loglik_optimizer::{
///     LogLikelihood, MLEOptions, maximize,
/// };
/// use rust_statespace::optimization::errors::OptResult;
///
/// struct Concave;
/// impl LogLikelihood for Concave {
///     type Data = ();
///     fn value(&self, theta: &ndarray::Array1<f64>, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &ndarray::Array1<f64>, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Concave, array![0.4, -0.1], &(), &MLEOptions::default()).unwrap();
/// assert!(out.value <= 0.0);
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
