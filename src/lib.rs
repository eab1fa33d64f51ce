//! rust_statespace — linear-Gaussian state-space modeling with scale
//! concentration and forecast-news decomposition.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and, when the
//! `python-bindings` feature is enabled, as the PyO3 bridge exposing the
//! local level model to Python via the `_rust_statespace` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`statespace`, `inference`,
//!   `optimization`) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   Python extension, mirroring the Rust API: construct a model, `fit`,
//!   `forecast`, inspect fitted parameters and optimizer diagnostics.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work lives in the inner modules; this file
//!   performs only FFI glue, input validation, and error mapping.
//! - On successful conversion from Python objects to Rust types, the
//!   invariants documented in the core modules hold.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on the inner modules
//!   (`statespace::estimate::fit`, `statespace::news::news`, …) and can
//!   ignore the PyO3 items guarded by the `python-bindings` feature.
//! - External Python users interact with the `_rust_statespace` module
//!   defined here, typically through a thin pure-Python facade.

pub mod inference;
pub mod optimization;
pub mod statespace;
#[cfg(feature = "python-bindings")]
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    statespace::{
        core::data::SsmData,
        errors::SsmError,
        estimate::{FittedModel, fit},
        models::local_level::LocalLevelModel,
        news::news,
    },
    utils::{build_mle_options, extract_f64_array},
};

/// LocalLevel — Python-facing wrapper for the local level model.
///
/// Purpose
/// -------
/// Expose [`LocalLevelModel`] fitting, forecasting, and news decomposition
/// to Python callers while preserving the core Rust invariants and error
/// handling.
///
/// Key behaviors
/// -------------
/// - Construct an unconcentrated or concentrated model with optional
///   optimizer settings.
/// - `fit` converts a NumPy series (NaN marks missing values) into
///   [`SsmData`] and caches the [`FittedModel`] for the accessors.
/// - `forecast` and `news_against` operate on the cached fit.
///
/// Notes
/// -----
/// - Native Rust callers should use [`LocalLevelModel`] with
///   [`fit`](crate::statespace::estimate::fit) directly; this type exists
///   solely for the PyO3 binding surface.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_statespace", unsendable)]
pub struct LocalLevel {
    model: LocalLevelModel,
    opts: crate::optimization::loglik_optimizer::MLEOptions,
    fitted: Option<FittedModel>,
    data: Option<SsmData>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl LocalLevel {
    #[new]
    #[pyo3(
        signature = (
            concentrated = false,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
        ),
        text_signature = "(concentrated=False, /, tol_grad=None, tol_cost=None, max_iter=None, \
                          line_searcher=None, lbfgs_mem=None)"
    )]
    pub fn new(
        concentrated: bool, tol_grad: Option<f64>, tol_cost: Option<f64>,
        max_iter: Option<usize>, line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
    ) -> PyResult<Self> {
        let model =
            if concentrated { LocalLevelModel::concentrated() } else { LocalLevelModel::new() };
        let opts = build_mle_options(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem)?;
        Ok(LocalLevel { model, opts, fitted: None, data: None })
    }

    #[pyo3(text_signature = "(self, endog, /)")]
    pub fn fit<'py>(&mut self, py: Python<'py>, endog: &Bound<'py, PyAny>) -> PyResult<()> {
        let arr = extract_f64_array(py, endog)?;
        let values = arr.as_slice().map_err(|_| {
            PyValueError::new_err("endog must be a contiguous 1-D float64 array or sequence")
        })?;
        let data = SsmData::from_column(Array1::from(values.to_vec()))?;
        let fitted = fit(&self.model, &data, None, &self.opts)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        self.fitted = Some(fitted);
        self.data = Some(data);
        Ok(())
    }

    #[pyo3(text_signature = "(self, horizon, /)")]
    pub fn forecast(&self, horizon: usize) -> PyResult<Vec<f64>> {
        let fitted = self.fitted.as_ref().ok_or(SsmError::ModelNotFitted)?;
        let forecast = fitted.forecast(horizon)?;
        Ok(forecast.mean.column(0).to_vec())
    }

    /// News decomposition of this fit against an updated series.
    ///
    /// Returns `(news, total_impacts)` where `news` is the per-update
    /// forecast error and `total_impacts` covers the inclusive impact range.
    #[pyo3(text_signature = "(self, updated, impact_start, impact_end, /)")]
    pub fn news_against<'py>(
        &self, py: Python<'py>, updated: &Bound<'py, PyAny>, impact_start: usize,
        impact_end: usize,
    ) -> PyResult<(Vec<f64>, Vec<f64>)> {
        let fitted = self.fitted.as_ref().ok_or(SsmError::ModelNotFitted)?;
        let previous = self.data.as_ref().ok_or(SsmError::ModelNotFitted)?;
        let arr = extract_f64_array(py, updated)?;
        let values = arr.as_slice().map_err(|_| {
            PyValueError::new_err("updated must be a contiguous 1-D float64 array or sequence")
        })?;
        let updated_data = SsmData::from_column(Array1::from(values.to_vec()))?;
        let report =
            news(&self.model, &fitted.params, previous, &updated_data, impact_start, impact_end)?;
        Ok((
            report.updates.iter().map(|u| u.news).collect(),
            report.total_impacts.column(0).to_vec(),
        ))
    }

    #[getter]
    pub fn params(&self) -> PyResult<Vec<f64>> {
        let fitted = self.fitted.as_ref().ok_or(SsmError::ModelNotFitted)?;
        Ok(fitted.params.to_vec())
    }

    #[getter]
    pub fn param_names(&self) -> PyResult<Vec<String>> {
        let fitted = self.fitted.as_ref().ok_or(SsmError::ModelNotFitted)?;
        Ok(fitted.param_names.clone())
    }

    #[getter]
    pub fn loglike(&self) -> PyResult<f64> {
        let fitted = self.fitted.as_ref().ok_or(SsmError::ModelNotFitted)?;
        Ok(fitted.loglike())
    }

    #[getter]
    pub fn scale(&self) -> PyResult<Option<f64>> {
        let fitted = self.fitted.as_ref().ok_or(SsmError::ModelNotFitted)?;
        Ok(fitted.scale())
    }

    #[getter]
    pub fn converged(&self) -> PyResult<bool> {
        let fitted = self.fitted.as_ref().ok_or(SsmError::ModelNotFitted)?;
        Ok(fitted.converged())
    }

    #[getter]
    pub fn optimizer_status(&self) -> PyResult<String> {
        let fitted = self.fitted.as_ref().ok_or(SsmError::ModelNotFitted)?;
        Ok(fitted.outcome.status.clone())
    }
}

/// _rust_statespace — PyO3 module initializer for the Python extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_statespace(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<LocalLevel>()?;
    Ok(())
}
