//! Errors for linear-Gaussian state-space modeling (data validation,
//! dimension checks, initialization, filtering, estimation, and news
//! decomposition).
//!
//! This module defines the model error type, [`SsmError`], used across the
//! state-space core and — behind the `python-bindings` feature — converted to
//! `PyErr` at the PyO3 boundary.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Observed values must be finite; `NaN` is the missing-value marker and is
//!   never an error.
//! - Dimension mismatches are fatal and raised immediately; they are never
//!   retried.
//! - A singular innovation covariance reports the failing time index so the
//!   caller can re-initialize or regularize.
#[cfg(feature = "python-bindings")]
use pyo3::exceptions::PyValueError;
#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

/// Crate-wide result alias for state-space operations.
pub type SsmResult<T> = Result<T, SsmError>;

/// Unified error type for state-space modeling.
///
/// Covers input/data validation, system-matrix and parameter dimension
/// checks, initialization policy failures, filter-time numerical failures,
/// estimation-state errors, and news-decomposition input errors.
#[derive(Debug, Clone, PartialEq)]
pub enum SsmError {
    // ---- Input/data validation ----
    /// Series is empty.
    EmptySeries,

    /// Dataset has zero observation variables.
    NoEndogVariables,

    /// A data point is ±inf (NaN is the missing marker and is allowed).
    NonFiniteData { t: usize, variable: usize, value: f64 },

    // ---- Dimensions / matrices / parameters ----
    /// A model dimension is invalid (e.g. zero states, k_posdef > k_states).
    InvalidDims { field: &'static str, value: usize, reason: &'static str },

    /// A system matrix has the wrong shape for the declared dimensions.
    MatrixDimMismatch {
        matrix: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Parameter vector length does not match the model's parameter count.
    ParamLengthMismatch { expected: usize, actual: usize },

    /// Parameter entries must be finite.
    NonFiniteParam { index: usize, value: f64 },

    // ---- Initialization ----
    /// Approximate-diffuse prior variance must be finite and > 0.
    InvalidDiffuseVariance { value: f64 },

    /// Known initial state entries must be finite.
    InvalidInitialState { index: usize, value: f64 },

    /// Known initial covariance failed validation.
    InvalidInitialCovariance { reason: &'static str },

    /// Stationary initialization requested but the transition matrix has a
    /// unit root; the Lyapunov equation has no solution.
    NonStationaryTransition,

    // ---- Filter ----
    /// The innovation covariance was singular (not positive definite) at
    /// time index `t`.
    FilterSingularity { t: usize },

    /// The likelihood window contained no observed values.
    NoObservations,

    // ---- Estimation ----
    /// Optimizer failed; includes a human-readable status/reason.
    OptimizationFailed { status: String },

    /// Model hasn't been fitted yet.
    ModelNotFitted,

    /// Forecast horizon must be at least 1.
    InvalidHorizon { horizon: usize },

    /// transform/untransform round trip failed at a parameter index; this is
    /// a model-authoring bug surfaced at definition/testing time.
    InvalidTransform { index: usize, value: f64, round_trip: f64 },

    // ---- News decomposition ----
    /// Previous and updated datasets have different variable counts.
    EndogDimMismatch { previous: usize, updated: usize },

    /// Updated dataset is shorter than the previous one.
    UpdatedSeriesTooShort { previous: usize, updated: usize },

    /// An observation present in the previous dataset is missing from the
    /// updated one; updates may extend or revise but never drop data.
    DroppedObservation { t: usize, variable: usize },

    /// Impact range must satisfy start <= end.
    InvalidImpactRange { start: usize, end: usize },
}

impl std::error::Error for SsmError {}

impl std::fmt::Display for SsmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            SsmError::EmptySeries => {
                write!(f, "Observation series must not be empty")
            }
            SsmError::NoEndogVariables => {
                write!(f, "Dataset must contain at least one observation variable")
            }
            SsmError::NonFiniteData { t, variable, value } => {
                write!(
                    f,
                    "Infinite data value {value} at (t = {t}, variable = {variable}); \
                     use NaN to mark missing entries"
                )
            }

            // ---- Dimensions / matrices / parameters ----
            SsmError::InvalidDims { field, value, reason } => {
                write!(f, "Invalid dimension {field} = {value}: {reason}")
            }
            SsmError::MatrixDimMismatch { matrix, expected, found } => {
                write!(
                    f,
                    "System matrix {matrix} has shape {found:?}, expected {expected:?}"
                )
            }
            SsmError::ParamLengthMismatch { expected, actual } => {
                write!(f, "Parameter length mismatch: expected {expected}, actual {actual}")
            }
            SsmError::NonFiniteParam { index, value } => {
                write!(f, "Non-finite parameter at index {index}: {value}")
            }

            // ---- Initialization ----
            SsmError::InvalidDiffuseVariance { value } => {
                write!(f, "Diffuse prior variance must be finite and > 0, got {value}")
            }
            SsmError::InvalidInitialState { index, value } => {
                write!(f, "Non-finite initial state at index {index}: {value}")
            }
            SsmError::InvalidInitialCovariance { reason } => {
                write!(f, "Invalid initial state covariance: {reason}")
            }
            SsmError::NonStationaryTransition => {
                write!(
                    f,
                    "Transition matrix is not stationary; stationary initialization is \
                     undefined. Use approximate-diffuse initialization for integrated states"
                )
            }

            // ---- Filter ----
            SsmError::FilterSingularity { t } => {
                write!(f, "Singular innovation covariance at time index {t}")
            }
            SsmError::NoObservations => {
                write!(f, "No observed values in the likelihood window")
            }

            // ---- Estimation ----
            SsmError::OptimizationFailed { status } => {
                write!(f, "Optimization failed: {status}")
            }
            SsmError::ModelNotFitted => {
                write!(f, "Model has not been fitted yet")
            }
            SsmError::InvalidHorizon { horizon } => {
                write!(f, "Forecast horizon must be at least 1, got {horizon}")
            }
            SsmError::InvalidTransform { index, value, round_trip } => {
                write!(
                    f,
                    "Transform round trip failed at parameter {index}: {value} came back \
                     as {round_trip}"
                )
            }

            // ---- News decomposition ----
            SsmError::EndogDimMismatch { previous, updated } => {
                write!(
                    f,
                    "Variable count mismatch between datasets: previous has {previous}, \
                     updated has {updated}"
                )
            }
            SsmError::UpdatedSeriesTooShort { previous, updated } => {
                write!(
                    f,
                    "Updated dataset (length {updated}) must be at least as long as the \
                     previous one (length {previous})"
                )
            }
            SsmError::DroppedObservation { t, variable } => {
                write!(
                    f,
                    "Observation at (t = {t}, variable = {variable}) was observed in the \
                     previous dataset but is missing from the updated one"
                )
            }
            SsmError::InvalidImpactRange { start, end } => {
                write!(f, "Invalid impact range: start {start} > end {end}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<SsmError> for PyErr {
    fn from(err: SsmError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
