//! The `StateSpace` capability trait implemented by every concrete model.
//!
//! Purpose
//! -------
//! Define the seam between model definitions and the generic machinery. A
//! model contributes exactly six things: its dimensions, a matrix skeleton,
//! the parameter-to-matrix mapping, the constrained ↔ unconstrained
//! transform pair, start-parameter heuristics, and an initialization
//! policy. The filter, estimation driver, and news decomposition are all
//! written once against this trait — no model subclassing, no runtime
//! attribute injection.
//!
//! Conventions
//! -----------
//! - `update` receives *constrained* parameters ψ and writes only the
//!   parameter-dependent matrix slots; structural constants come from
//!   `base_matrices`.
//! - `transform` maps the optimizer's unconstrained vector to ψ;
//!   `untransform` is its exact inverse on the valid domain. Both are
//!   element-wise in this crate, which the estimation driver relies on when
//!   mapping standard errors through the delta method.
//! - `start_params` returns *constrained* starting values derived from
//!   sample moments; flat zero vectors are a poor choice for variance
//!   parameters, whose likelihood surface is non-identified near zero.
//! - A model that returns `true` from `concentrate_scale` must write a unit
//!   placeholder variance into its matrices; the filter then estimates the
//!   common scale in closed form.
use crate::statespace::{
    core::{data::SsmData, dims::SsmDims, init::Initialization, matrices::SystemMatrices},
    errors::{SsmError, SsmResult},
};
use ndarray::Array1;

/// Capability interface for a linear-Gaussian state-space model.
pub trait StateSpace {
    /// Model dimensions (observation, state, and disturbance counts).
    fn dims(&self) -> SsmDims;

    /// Number of free parameters in ψ.
    fn k_params(&self) -> usize;

    /// Human-readable parameter names, in ψ order.
    fn param_names(&self) -> Vec<String>;

    /// Structural matrix skeleton with all constant entries filled in.
    fn base_matrices(&self) -> SsmResult<SystemMatrices>;

    /// Write the parameter-dependent entries of the system matrices.
    ///
    /// # Errors
    /// Implementations must reject a wrong-length or non-finite ψ with
    /// [`SsmError::ParamLengthMismatch`] / [`SsmError::NonFiniteParam`];
    /// [`validate_params`] performs both checks.
    fn update(&self, params: &Array1<f64>, matrices: &mut SystemMatrices) -> SsmResult<()>;

    /// Map an unconstrained optimizer vector to constrained parameters ψ.
    fn transform(&self, unconstrained: &Array1<f64>) -> Array1<f64>;

    /// Inverse of [`StateSpace::transform`] on the valid domain.
    fn untransform(&self, constrained: &Array1<f64>) -> Array1<f64>;

    /// Constrained starting values derived from the data.
    fn start_params(&self, data: &SsmData) -> Array1<f64>;

    /// Initialization policy for the first predicted state.
    fn initialization(&self) -> Initialization;

    /// Whether one variance is concentrated out of the likelihood.
    fn concentrate_scale(&self) -> bool {
        false
    }
}

/// Validate a constrained parameter vector against the model's count.
///
/// # Errors
/// - [`SsmError::ParamLengthMismatch`] on a wrong-length vector.
/// - [`SsmError::NonFiniteParam`] at the first NaN/±∞ entry.
pub fn validate_params<M: StateSpace + ?Sized>(
    model: &M, params: &Array1<f64>,
) -> SsmResult<()> {
    if params.len() != model.k_params() {
        return Err(SsmError::ParamLengthMismatch {
            expected: model.k_params(),
            actual: params.len(),
        });
    }
    for (index, &value) in params.iter().enumerate() {
        if !value.is_finite() {
            return Err(SsmError::NonFiniteParam { index, value });
        }
    }
    Ok(())
}

/// Check the transform/untransform round trip at one constrained point.
///
/// Exercised by model unit tests; a failure indicates a model-authoring bug
/// and is fatal at definition time, not a runtime condition.
///
/// # Errors
/// [`SsmError::InvalidTransform`] at the first coordinate where
/// `transform(untransform(ψ))` differs from ψ by more than `tol`.
pub fn check_transform_round_trip<M: StateSpace + ?Sized>(
    model: &M, params: &Array1<f64>, tol: f64,
) -> SsmResult<()> {
    let round_trip = model.transform(&model.untransform(params));
    for (index, (&value, &back)) in params.iter().zip(round_trip.iter()).enumerate() {
        if (back - value).abs() > tol * value.abs().max(1.0) {
            return Err(SsmError::InvalidTransform { index, value, round_trip: back });
        }
    }
    Ok(())
}
