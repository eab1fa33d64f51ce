//! Validation helpers for the log-likelihood optimizer.
//!
//! All consistency checks shared across the optimizer surface live here:
//!
//! - **Tolerances**: [`verify_tol_grad`] / [`verify_tol_cost`] require finite,
//!   strictly positive values when present.
//! - **Gradients**: [`validate_grad`] enforces dimension and finiteness.
//! - **Estimates**: [`validate_theta_hat`] requires a present, all-finite
//!   parameter vector.
//! - **Objective values**: [`validate_value`] rejects NaN/±∞ log-likelihoods.
//! - **Hessians**: [`validate_hessian`] enforces square shape and finiteness.
//!
//! Each helper reports a specific [`OptError`] variant so failures carry the
//! offending index and value.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, types::Hessian},
};

/// Validate the optional gradient-norm tolerance.
///
/// `None` is accepted (no gradient stopping rule); `Some` values must be
/// finite and strictly positive.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost-change tolerance.
///
/// `None` is accepted (no cost stopping rule); `Some` values must be finite
/// and strictly positive.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate a gradient vector against the expected dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if the length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index and value of the first
///   non-finite element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector.
///
/// # Returns
/// The owned `Theta` if present and all-finite.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was produced by the solver.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar log-likelihood value is finite.
///
/// Negative values are fine; NaN and ±∞ are not.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] for non-finite values.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Validate the shape and entries of a Hessian matrix.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] if dimensions differ from `dim × dim`.
/// - [`OptError::InvalidHessian`] with row/col/value of the first non-finite
///   entry.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((i, j), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row: i, col: j, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Acceptance/rejection rules for tolerance values.
    // - Gradient dimension and finiteness validation.
    // - theta_hat unwrap behavior for missing and non-finite inputs.
    // - Hessian shape and finiteness validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Confirm that tolerance validators accept None and positive finite
    // values, and reject zero, negative, and non-finite ones.
    //
    // Given
    // -----
    // - A spread of Some/None tolerance inputs.
    //
    // Expect
    // ------
    // - Ok for None and 1e-6; Err for 0.0, -1.0, and NaN.
    fn tolerance_validators_enforce_positive_finite() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-6)).is_ok());
        assert!(verify_tol_grad(Some(0.0)).is_err());
        assert!(verify_tol_cost(Some(-1.0)).is_err());
        assert!(verify_tol_cost(Some(f64::NAN)).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Verify gradient validation catches both wrong length and non-finite
    // entries, reporting the offending index.
    //
    // Given
    // -----
    // - A length-2 gradient checked against dim 3.
    // - A length-3 gradient with NaN at index 1 checked against dim 3.
    //
    // Expect
    // ------
    // - GradientDimMismatch for the first, InvalidGradient { index: 1 } for
    //   the second.
    fn validate_grad_reports_shape_and_finiteness() {
        let short: Array1<f64> = array![1.0, 2.0];
        assert_eq!(
            validate_grad(&short, 3).unwrap_err(),
            OptError::GradientDimMismatch { expected: 3, found: 2 }
        );

        let bad = array![1.0, f64::NAN, 3.0];
        match validate_grad(&bad, 3).unwrap_err() {
            OptError::InvalidGradient { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify theta_hat unwrapping rejects absent vectors and non-finite
    // entries while passing through valid vectors untouched.
    //
    // Given
    // -----
    // - None, a vector containing +∞, and a clean vector.
    //
    // Expect
    // ------
    // - MissingThetaHat, InvalidThetaHat, and Ok respectively.
    fn validate_theta_hat_covers_missing_and_invalid() {
        assert_eq!(validate_theta_hat(None).unwrap_err(), OptError::MissingThetaHat);
        let bad = array![0.0, f64::INFINITY];
        assert!(matches!(
            validate_theta_hat(Some(bad)).unwrap_err(),
            OptError::InvalidThetaHat { index: 1, .. }
        ));
        let good = array![0.5, -0.25];
        assert_eq!(validate_theta_hat(Some(good.clone())).unwrap(), good);
    }

    #[test]
    // Purpose
    // -------
    // Verify Hessian validation enforces square shape and finite entries.
    //
    // Given
    // -----
    // - A 2×3 matrix checked against dim 2.
    // - A 2×2 matrix containing NaN at (1, 0).
    //
    // Expect
    // ------
    // - HessianDimMismatch for the first, InvalidHessian { row: 1, col: 0 }
    //   for the second.
    fn validate_hessian_reports_shape_and_finiteness() {
        let rect = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            validate_hessian(&rect, 2).unwrap_err(),
            OptError::HessianDimMismatch { .. }
        ));

        let mut square = Array2::<f64>::zeros((2, 2));
        square[[1, 0]] = f64::NAN;
        assert!(matches!(
            validate_hessian(&square, 2).unwrap_err(),
            OptError::InvalidHessian { row: 1, col: 0, .. }
        ));
    }
}
