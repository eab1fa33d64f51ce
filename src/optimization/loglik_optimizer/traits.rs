//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: trait implemented once per model family.
//! - [`MLEOptions`] and [`Tolerances`]: validated optimizer configuration.
//! - [`LineSearcher`]: choice of line search used by L-BFGS.
//! - [`OptimOutcome`]: normalized result returned by the high-level
//!   [`maximize`](crate::optimization::loglik_optimizer::maximize) API.
//!
//! Convention: a user log-likelihood `ℓ(θ)` is *maximized* by minimizing the
//! cost `c(θ) = -ℓ(θ)`. An analytic gradient, when provided, is the gradient
//! of the log-likelihood (`∇ℓ(θ)`); the adapter flips signs as needed.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// User-implemented log-likelihood interface.
///
/// Implementors evaluate `ℓ(θ)` over an unconstrained parameter vector; the
/// optimizer internally minimizes `c(θ) = -ℓ(θ)`. The associated `Data` type
/// carries whatever per-run payload the model needs (for the state-space
/// driver this is the observed dataset).
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `ℓ(θ)`. Invalid
///   inputs or model failures must come back as recoverable [`OptError`]
///   values, never panics.
/// - `check(&Theta, &Data) -> OptResult<()>`: one-time validation hook run
///   before optimization starts, rejecting obviously bad `θ`/`data` pairs.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient `∇ℓ(θ)`.
///   When absent, robust finite differences are used automatically.
pub trait LogLikelihood {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Parses case-insensitively from `"MoreThuente"` or `"HagerZhang"`; unknown
/// names return [`OptError::InvalidLineSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — stopping rules and iteration limit.
/// - `line_searcher: LineSearcher` — line-search algorithm used by L-BFGS.
/// - `verbose: bool` — if `true`, attaches a progress observer (behind the
///   `obs_slog` feature) and prints a pre-iteration summary line.
/// - `lbfgs_mem: Option<usize>` — L-BFGS history size; `None` uses the crate
///   default of 7.
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Create a validated set of optimizer options.
    ///
    /// Numeric validation of the tolerances happens in [`Tolerances::new`];
    /// this constructor only rejects a zero L-BFGS memory.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::new(Some(1e-6), None, Some(300)).unwrap(),
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: terminate when the gradient norm falls below this value.
/// - `tol_cost`: terminate when the change in cost falls below this value.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field may be `None`, but at least one of the three must be provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - At least one of `tol_grad`, `tol_cost`, `max_iter` must be `Some`.
    /// - Tolerances, when provided, must be finite and strictly positive.
    /// - `max_iter`, when provided, must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_grad(tol_grad)?;
        verify_tol_cost(tol_cost)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best **log-likelihood** value `ℓ(θ̂)` (not the cost).
/// - `converged`: `true` if the solver reported a terminating status other
///   than `NotTerminated`.
/// - `status`: human-readable termination status.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by argmin.
/// - `grad_norm`: norm of the last available gradient, if present.
///
/// Non-convergence is surfaced through `converged`/`status` rather than an
/// error: callers get the estimates and decide how to treat them.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `theta_hat` check via `validate_theta_hat` (present and all finite).
    /// - `value` check via `validate_value` (finite).
    /// - Maps `TerminationStatus` into `(converged, status)`.
    /// - Computes `grad_norm` when a gradient was available.
    ///
    /// # Errors
    /// Propagates validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let status: String;
        let converged = match termination {
            TerminationStatus::NotTerminated => {
                status = "Not terminated".to_string();
                false
            }
            _ => {
                status = format!("{termination:?}");
                true
            }
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::collections::HashMap;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Tolerances construction rules (at-least-one, positivity, max_iter).
    // - LineSearcher parsing, including case-insensitivity and bad names.
    // - MLEOptions rejection of zero L-BFGS memory.
    // - OptimOutcome construction from raw solver state.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure at least one stopping rule is required and that valid inputs
    // produce a Tolerances value preserving all fields.
    //
    // Given
    // -----
    // - All-None inputs, then a fully specified triple.
    //
    // Expect
    // ------
    // - NoTolerancesProvided for the former; Ok with matching fields for the
    //   latter.
    fn tolerances_require_at_least_one_rule() {
        assert_eq!(Tolerances::new(None, None, None).unwrap_err(), OptError::NoTolerancesProvided);
        let tols = Tolerances::new(Some(1e-6), Some(1e-8), Some(100)).unwrap();
        assert_eq!(tols.tol_grad, Some(1e-6));
        assert_eq!(tols.tol_cost, Some(1e-8));
        assert_eq!(tols.max_iter, Some(100));
    }

    #[test]
    // Purpose
    // -------
    // Confirm a zero iteration cap is rejected.
    //
    // Given
    // -----
    // - max_iter = Some(0) with no other rules.
    //
    // Expect
    // ------
    // - InvalidMaxIter.
    fn tolerances_reject_zero_max_iter() {
        assert!(matches!(
            Tolerances::new(None, None, Some(0)).unwrap_err(),
            OptError::InvalidMaxIter { max_iter: 0, .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify LineSearcher parsing accepts any case variant and rejects
    // unknown names.
    //
    // Given
    // -----
    // - "morethuente", "HAGERZHANG", and "newton".
    //
    // Expect
    // ------
    // - The first two parse to their variants; the last errors.
    fn line_searcher_parses_case_insensitively() {
        assert_eq!("morethuente".parse::<LineSearcher>().unwrap(), LineSearcher::MoreThuente);
        assert_eq!("HAGERZHANG".parse::<LineSearcher>().unwrap(), LineSearcher::HagerZhang);
        assert!(matches!(
            "newton".parse::<LineSearcher>().unwrap_err(),
            OptError::InvalidLineSearch { .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify MLEOptions rejects lbfgs_mem = 0 while accepting None and
    // positive values.
    //
    // Given
    // -----
    // - Valid tolerances, lbfgs_mem in {Some(0), None, Some(5)}.
    //
    // Expect
    // ------
    // - Err for Some(0); Ok otherwise.
    fn mle_options_reject_zero_memory() {
        let tols = Tolerances::new(Some(1e-6), None, Some(50)).unwrap();
        assert!(MLEOptions::new(tols, LineSearcher::MoreThuente, false, Some(0)).is_err());
        assert!(MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).is_ok());
        assert!(MLEOptions::new(tols, LineSearcher::HagerZhang, false, Some(5)).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Verify OptimOutcome normalization: NotTerminated maps to
    // converged = false, any terminating status to true, and the gradient
    // norm is computed when a gradient is present.
    //
    // Given
    // -----
    // - A finite theta_hat and value, a [3, 4] gradient.
    //
    // Expect
    // ------
    // - converged false with status "Not terminated" for NotTerminated.
    // - grad_norm = 5.0.
    fn optim_outcome_normalizes_termination_and_grad_norm() {
        let outcome = OptimOutcome::new(
            Some(array![1.0, 2.0]),
            -10.0,
            TerminationStatus::NotTerminated,
            7,
            HashMap::new(),
            Some(array![3.0, 4.0]),
        )
        .unwrap();
        assert!(!outcome.converged);
        assert_eq!(outcome.status, "Not terminated");
        assert_eq!(outcome.iterations, 7);
        assert!((outcome.grad_norm.unwrap() - 5.0).abs() < 1e-12);
    }
}
