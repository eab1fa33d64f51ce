//! Hessian-based standard errors from the observed information.
//!
//! Purpose
//! -------
//! Convert a finite-difference Hessian of the negative log-likelihood into
//! numerically stable classical standard errors. The Hessian is copied into
//! a `nalgebra` matrix and inverted through a symmetric eigendecomposition
//! with eigenvalue truncation, so weakly identified directions inflate the
//! reported uncertainty instead of blowing up.
//!
//! Conventions
//! -----------
//! - The supplied map `f` is the gradient of the **negative**
//!   log-likelihood, so the Hessian at the optimum is the observed
//!   information `J(θ̂)` and is positive semi-definite up to noise.
//! - Eigenvalues at or below [`EIGEN_EPS`] are treated as zero when forming
//!   pseudoinverse directions.
//! - No explicit matrix inverse is formed.
use crate::optimization::{
    errors::OptResult, loglik_optimizer::finite_diff::compute_hessian,
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Classical standard errors from the observed information matrix.
///
/// # Parameters
/// - `f`: gradient map of the negative log-likelihood, `θ ↦ ∇(−ℓ)(θ)`;
///   must be C¹ near `theta_hat` so the finite-difference Hessian exists.
/// - `theta_hat`: evaluation point; its length sets the output dimension.
///
/// # Returns
/// A vector of standard errors, `se_i = sqrt((J⁺)_{ii})`, where `J⁺` is the
/// eigen-truncated pseudoinverse of the observed information.
///
/// # Errors
/// Propagates [`compute_hessian`] failures (shape or finiteness).
///
/// # Examples
/// ```rust
/// # use ndarray::array;
/// # use rust_statespace::inference::hessian::calc_standard_errors;
/// // Gradient of a quadratic negative log-likelihood: g(θ) = A θ, A PD.
/// let a = array![[4.0, 0.0], [0.0, 1.0]];
/// let f = |theta: &ndarray::Array1<f64>| a.dot(theta);
/// let se = calc_standard_errors(&f, &array![1.0, -1.0]).unwrap();
/// // For diagonal A the SEs are [1/sqrt(4), 1/sqrt(1)].
/// assert!((se[0] - 0.5).abs() < 1e-6);
/// assert!((se[1] - 1.0).abs() < 1e-6);
/// ```
pub fn calc_standard_errors<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>,
) -> OptResult<Array1<f64>> {
    let n = theta_hat.len();
    let obs_info = compute_hessian(f, theta_hat)?;
    let obs_info_nalg = fill_dmatrix(&obs_info);
    Ok(solve_for_se(obs_info_nalg, n))
}

/// Copy a square `ndarray` matrix into a `nalgebra::DMatrix`.
///
/// Symmetry is assumed to have been enforced upstream (the Hessian helper
/// symmetrizes); this is a plain copy.
fn fill_dmatrix(obs_info: &Array2<f64>) -> DMatrix<f64> {
    let mut out = DMatrix::<f64>::zeros(obs_info.nrows(), obs_info.ncols());
    for ((i, j), &value) in obs_info.indexed_iter() {
        out[(i, j)] = value;
    }
    out
}

/// Diagonal of the eigen-truncated pseudoinverse, square-rooted.
///
/// `(J⁺)_{ii} = Σ_k u_{ik}² / λ_k` over eigenvalues `λ_k > EIGEN_EPS`;
/// directions with smaller eigenvalues contribute nothing, which leaves
/// large (honest) standard errors along weakly identified axes.
fn solve_for_se(obs_info: DMatrix<f64>, n: usize) -> Array1<f64> {
    let eigen = obs_info.symmetric_eigen();
    let mut se = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut variance = 0.0;
        for k in 0..n {
            let lambda = eigen.eigenvalues[k];
            if lambda > EIGEN_EPS {
                let u = eigen.eigenvectors[(i, k)];
                variance += u * u / lambda;
            }
        }
        se[i] = variance.sqrt();
    }
    se
}
