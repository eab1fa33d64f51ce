//! Python-boundary helpers for the optional PyO3 bindings.
//!
//! Purpose
//! -------
//! Centralize conversion from Python objects (NumPy arrays, sequences,
//! keyword options) into the crate's Rust types, so the binding classes in
//! the crate root stay thin: validate, convert, dispatch.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work happens in the core modules; these helpers
//!   only copy and validate inputs.
//! - Errors are reported as Python `ValueError`s with the underlying Rust
//!   error message.
#[cfg(feature = "python-bindings")]
use numpy::{PyArray1, PyArrayMethods, PyReadonlyArray1};
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances};

/// Extract a 1-D `f64` array from a NumPy array or any Python sequence of
/// floats, copying at most once.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray1<'py, f64>>() {
        return Ok(arr);
    }
    let values: Vec<f64> = raw.extract().map_err(|_| {
        PyValueError::new_err("expected a 1-D numpy.ndarray or a sequence of float64")
    })?;
    Ok(PyArray1::from_vec_bound(py, values).readonly())
}

/// Build validated [`MLEOptions`] from optional Python keyword arguments.
///
/// Defaults mirror [`MLEOptions::default`]: `tol_grad = 1e-6`,
/// `max_iter = 300`, More–Thuente line search, default L-BFGS memory.
#[cfg(feature = "python-bindings")]
pub fn build_mle_options(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<MLEOptions> {
    let tols = Tolerances::new(
        tol_grad.or(Some(1e-6)),
        tol_cost,
        max_iter.or(Some(300)),
    )
    .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let searcher = match line_searcher {
        Some(name) => {
            name.parse::<LineSearcher>().map_err(|e| PyValueError::new_err(e.to_string()))?
        }
        None => LineSearcher::MoreThuente,
    };
    MLEOptions::new(tols, searcher, false, lbfgs_mem)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}
