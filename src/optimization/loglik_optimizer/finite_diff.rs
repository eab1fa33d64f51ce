//! Finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Wrap the `finitediff` primitives with error capture, validation, and
//! symmetry cleanup so the rest of the optimizer can request derivatives
//! without depending on the `finitediff` API directly.
//!
//! Key behaviors
//! -------------
//! - [`forward_diff_with_capture`]: forward-difference gradient of a scalar
//!   objective whose evaluation errors are parked in a shared cell (the FD
//!   closure cannot return `Result`).
//! - [`compute_hessian`]: central-difference Hessian of a gradient map with
//!   a forward-difference fallback and in-place symmetrization.
//!
//! Conventions
//! -----------
//! - Differences are taken with respect to the unconstrained parameter
//!   vector; reparameterization belongs to the model layer.
//! - Returned gradients/Hessians always satisfy [`validate_grad`] /
//!   [`validate_hessian`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient with error capture and validation.
///
/// The FD closure must return `f64`, so any error raised by `func` is stored
/// into `captured` and the closure returns `NaN`. This helper clears the
/// cell, runs the forward sweep, converts a captured error back into `Err`,
/// and validates the resulting gradient.
///
/// # Errors
/// Returns the captured evaluation error, or a validation error if the
/// gradient has the wrong dimension or non-finite entries.
pub fn forward_diff_with_capture<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, captured: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    captured.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = captured.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Finite-difference Hessian of a gradient map, validated and symmetrized.
///
/// A central-difference Hessian is attempted first; any validation failure
/// (shape or finiteness) triggers one forward-difference retry whose
/// validation result is surfaced. The accepted matrix is symmetrized
/// in-place before being returned.
///
/// # Errors
/// - [`crate::optimization::errors::OptError::HessianDimMismatch`] when the
///   fallback Hessian has the wrong shape.
/// - [`crate::optimization::errors::OptError::InvalidHessian`] when it
///   contains non-finite entries.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut hess = theta.central_hessian(f);
    if validate_hessian(&hess, dim).is_err() {
        hess = theta.forward_hessian(f);
        validate_hessian(&hess, dim)?;
    }
    symmetrize(&mut hess);
    Ok(hess)
}

/// Replace each off-diagonal pair with its average, leaving the diagonal
/// untouched. Assumes a square matrix.
fn symmetrize(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Forward-difference gradients with and without captured closure errors.
    // - Central-difference Hessian accuracy on a known quadratic.
    // - Symmetry of returned Hessians.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the forward-difference helper approximates the gradient of a
    // simple quadratic and leaves the capture cell empty on success.
    //
    // Given
    // -----
    // - f(θ) = θ·θ at θ = [1, 2].
    //
    // Expect
    // ------
    // - Gradient ≈ [2, 4] within 1e-5, no captured error.
    fn forward_diff_matches_analytic_gradient() {
        let theta: Theta = array![1.0, 2.0];
        let captured = RefCell::new(None);
        let f = |x: &Theta| x.dot(x);

        let grad = forward_diff_with_capture(&theta, &f, &captured).unwrap();

        assert!((grad[0] - 2.0).abs() < 1e-5);
        assert!((grad[1] - 4.0).abs() < 1e-5);
        assert!(captured.borrow().is_none());
    }

    #[test]
    // Purpose
    // -------
    // Verify a captured closure error is converted back into Err instead of
    // silently producing a NaN gradient.
    //
    // Given
    // -----
    // - A closure that always parks an error and returns NaN.
    //
    // Expect
    // ------
    // - forward_diff_with_capture returns Err.
    fn forward_diff_surfaces_captured_errors() {
        let theta: Theta = array![0.0];
        let captured: RefCell<Option<Error>> = RefCell::new(None);
        let f = |_x: &Theta| -> f64 {
            let mut slot = captured.borrow_mut();
            if slot.is_none() {
                *slot = Some(
                    crate::optimization::errors::OptError::NonFiniteCost { value: f64::NAN }.into(),
                );
            }
            f64::NAN
        };

        assert!(forward_diff_with_capture(&theta, &f, &captured).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Verify the Hessian of a quadratic gradient map is recovered and is
    // exactly symmetric after the cleanup pass.
    //
    // Given
    // -----
    // - g(θ) = [4θ₀ + θ₁, θ₀ + 2θ₁] (Hessian [[4, 1], [1, 2]]).
    //
    // Expect
    // ------
    // - Entries within 1e-4 of the analytic Hessian, and h[0,1] == h[1,0].
    fn compute_hessian_recovers_quadratic_curvature() {
        let g = |theta: &Theta| -> Grad {
            Array1::from(vec![4.0 * theta[0] + theta[1], theta[0] + 2.0 * theta[1]])
        };
        let theta: Theta = array![0.3, -0.7];

        let hess = compute_hessian(&g, &theta).unwrap();

        assert!((hess[[0, 0]] - 4.0).abs() < 1e-4);
        assert!((hess[[0, 1]] - 1.0).abs() < 1e-4);
        assert!((hess[[1, 1]] - 2.0).abs() < 1e-4);
        assert_eq!(hess[[0, 1]], hess[[1, 0]]);
    }
}
