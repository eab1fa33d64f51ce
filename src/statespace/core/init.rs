//! Initialization policies for the Kalman filter's first predicted state.
//!
//! Purpose
//! -------
//! Encode how the filter seeds `a_1` and `P_1` before the first observation
//! arrives. Three policies are supported: fully known moments, the exact
//! stationary distribution of the state recursion (via a discrete Lyapunov
//! solve), and an approximate-diffuse prior for integrated states.
//!
//! Key behaviors
//! -------------
//! - [`Initialization::known`] validates a user-supplied mean/covariance.
//! - [`Initialization::stationary`] solves `P = T P Tᵀ + R Q Rᵀ` at filter
//!   start; a transition with a unit root makes the equation unsolvable and
//!   is reported as [`SsmError::NonStationaryTransition`] rather than
//!   silently producing a distorted prior.
//! - [`Initialization::approximate_diffuse`] uses a large finite prior
//!   variance `κ·I` together with a `loglikelihood_burn` count of initial
//!   periods excluded from the likelihood, so the diffuse period does not
//!   distort the objective.
//!
//! Conventions
//! -----------
//! - Choosing the right policy is part of the model definition: stationary
//!   models default to the stationary solution, integrated models must ask
//!   for the diffuse prior. Getting this wrong is a correctness bug, which
//!   is why the stationary path hard-fails on unit roots.
use crate::statespace::errors::{SsmError, SsmResult};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

/// Default prior variance for approximate-diffuse initialization.
pub const DEFAULT_DIFFUSE_VARIANCE: f64 = 1e6;

/// Policy for seeding the first predicted state moments `(a_1, P_1)`.
///
/// Variants
/// --------
/// - `Known` — fully specified mean and covariance.
/// - `Stationary` — zero mean and the solution of the discrete Lyapunov
///   equation; requires a stationary transition.
/// - `ApproximateDiffuse` — zero mean, `variance · I` covariance, and a
///   likelihood burn count excluding the first `loglikelihood_burn` periods
///   from the objective.
#[derive(Debug, Clone, PartialEq)]
pub enum Initialization {
    /// Fully specified initial mean and covariance.
    Known { state: Array1<f64>, cov: Array2<f64> },
    /// Unconditional (stationary) distribution of the state recursion.
    Stationary,
    /// Large finite prior variance with a likelihood burn count.
    ApproximateDiffuse { variance: f64, loglikelihood_burn: usize },
}

impl Initialization {
    /// Known-moments initialization with validation.
    ///
    /// # Errors
    /// - [`SsmError::InvalidInitialState`] for non-finite mean entries.
    /// - [`SsmError::InvalidInitialCovariance`] when the covariance is not
    ///   square, not symmetric, has non-finite entries, or a negative
    ///   diagonal.
    pub fn known(state: Array1<f64>, cov: Array2<f64>) -> SsmResult<Self> {
        for (index, &value) in state.iter().enumerate() {
            if !value.is_finite() {
                return Err(SsmError::InvalidInitialState { index, value });
            }
        }
        if cov.nrows() != cov.ncols() {
            return Err(SsmError::InvalidInitialCovariance {
                reason: "Covariance must be square.",
            });
        }
        if cov.nrows() != state.len() {
            return Err(SsmError::InvalidInitialCovariance {
                reason: "Covariance dimension must match the state length.",
            });
        }
        for ((i, j), &value) in cov.indexed_iter() {
            if !value.is_finite() {
                return Err(SsmError::InvalidInitialCovariance {
                    reason: "Covariance entries must be finite.",
                });
            }
            if i == j && value < 0.0 {
                return Err(SsmError::InvalidInitialCovariance {
                    reason: "Covariance diagonal must be non-negative.",
                });
            }
            if (value - cov[[j, i]]).abs() > 1e-8 {
                return Err(SsmError::InvalidInitialCovariance {
                    reason: "Covariance must be symmetric.",
                });
            }
        }
        Ok(Initialization::Known { state, cov })
    }

    /// Stationary-distribution initialization.
    pub fn stationary() -> Self {
        Initialization::Stationary
    }

    /// Approximate-diffuse initialization with validation.
    ///
    /// # Errors
    /// [`SsmError::InvalidDiffuseVariance`] when `variance` is not finite
    /// and strictly positive.
    pub fn approximate_diffuse(variance: f64, loglikelihood_burn: usize) -> SsmResult<Self> {
        if !variance.is_finite() || variance <= 0.0 {
            return Err(SsmError::InvalidDiffuseVariance { value: variance });
        }
        Ok(Initialization::ApproximateDiffuse { variance, loglikelihood_burn })
    }

    /// Number of initial periods excluded from the likelihood.
    pub fn loglikelihood_burn(&self) -> usize {
        match self {
            Initialization::ApproximateDiffuse { loglikelihood_burn, .. } => *loglikelihood_burn,
            _ => 0,
        }
    }

    /// Resolve the policy into concrete first-period moments `(a_1, P_1)`.
    ///
    /// `transition` and `rqr` (= R Q Rᵀ) come from the model's updated system
    /// matrices; both are `k_states × k_states`.
    ///
    /// # Errors
    /// - [`SsmError::InvalidInitialCovariance`] when a `Known` covariance has
    ///   the wrong dimension for this system.
    /// - [`SsmError::NonStationaryTransition`] when the stationary solve
    ///   fails (unit root or non-finite solution).
    pub fn moments(
        &self, k_states: usize, transition: &DMatrix<f64>, rqr: &DMatrix<f64>,
    ) -> SsmResult<(DVector<f64>, DMatrix<f64>)> {
        match self {
            Initialization::Known { state, cov } => {
                if state.len() != k_states {
                    return Err(SsmError::InvalidInitialCovariance {
                        reason: "Known initialization dimension does not match the model.",
                    });
                }
                let a = DVector::from_iterator(k_states, state.iter().copied());
                let mut p = DMatrix::<f64>::zeros(k_states, k_states);
                for ((i, j), &value) in cov.indexed_iter() {
                    p[(i, j)] = value;
                }
                Ok((a, p))
            }
            Initialization::Stationary => {
                let p = solve_discrete_lyapunov(transition, rqr)
                    .ok_or(SsmError::NonStationaryTransition)?;
                Ok((DVector::zeros(k_states), p))
            }
            Initialization::ApproximateDiffuse { variance, .. } => {
                let p = DMatrix::<f64>::identity(k_states, k_states) * *variance;
                Ok((DVector::zeros(k_states), p))
            }
        }
    }
}

/// Solve the discrete Lyapunov equation `P = T P Tᵀ + Q` for `P`.
///
/// Uses the Kronecker vectorization `(I - T ⊗ T) vec(P) = vec(Q)` with an LU
/// solve; the state dimension is small for the models in this crate, so the
/// `n² × n²` system is cheap. Returns `None` when the system is singular
/// (unit-root transition) or the solution is non-finite, and symmetrizes the
/// result otherwise.
pub fn solve_discrete_lyapunov(t: &DMatrix<f64>, q: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let n = t.nrows();
    let kron = t.kronecker(t);
    let lhs = DMatrix::<f64>::identity(n * n, n * n) - kron;
    let rhs = DVector::from_iterator(n * n, q.iter().copied());
    let solution = lhs.lu().solve(&rhs)?;
    if solution.iter().any(|v| !v.is_finite()) {
        return None;
    }
    // vec() stacking is column-major on both sides, so a direct reshape works.
    let mut p = DMatrix::<f64>::zeros(n, n);
    for j in 0..n {
        for i in 0..n {
            p[(i, j)] = solution[j * n + i];
        }
    }
    let symmetrized = (&p + p.transpose()) * 0.5;
    if symmetrized.diagonal().iter().any(|&d| d < -1e-8) {
        return None;
    }
    Some(symmetrized)
}
