//! Adapter exposing a user [`LogLikelihood`] as an `argmin` problem.
//!
//! The maximization of `ℓ(θ)` becomes a minimization of the cost
//! `c(θ) = -ℓ(θ)`. Analytic gradients, when provided, are negated to match.
//! When no analytic gradient exists, the **cost** closure is
//! finite-differenced directly, so that branch needs no sign flip.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::forward_diff_with_capture,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a user [`LogLikelihood`] to argmin's `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)`.
/// - `Gradient::gradient` returns `-∇ℓ(θ)` when the model provides an
///   analytic gradient, or a finite-difference gradient of the cost
///   otherwise (central differences first, forward differences as fallback).
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user `LogLikelihood` and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`.
    ///
    /// # Errors
    /// Propagates any `OptError` from the model's `value`, and returns
    /// [`OptError::NonFiniteCost`] when the evaluated log-likelihood is not
    /// finite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let loglike = self.f.value(theta, self.data)?;
        if !loglike.is_finite() {
            return Err((OptError::NonFiniteCost { value: loglike }).into());
        }
        Ok(-loglike)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// Behavior:
    /// - With an analytic model gradient: validate it, return `-∇ℓ(θ)`.
    /// - Without one (`GradientNotImplemented`): finite-difference the cost.
    ///   Central differences are tried first; if any cost evaluation failed
    ///   during the sweep, or the result fails validation, one forward-
    ///   difference retry is made.
    ///
    /// The FD closure must return `f64`, so errors raised inside it cannot
    /// propagate through `?`; the first one is parked in a `RefCell` and the
    /// closure yields `NaN`, which the post-pass turns back into a real error.
    ///
    /// # Errors
    /// - Any model error other than `GradientNotImplemented`.
    /// - Errors raised by cost evaluations performed during FD.
    /// - Validation errors for wrong-dimension or non-finite gradients.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let captured: RefCell<Option<Error>> = RefCell::new(None);
                let cost_fn = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = captured.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let central = theta.central_diff(&cost_fn);
                if captured.borrow().is_none() && validate_grad(&central, dim).is_ok() {
                    return Ok(central);
                }
                forward_diff_with_capture(theta, &cost_fn, &captured)
            }
            Err(e) => Err(e.into()),
        }
    }
}
