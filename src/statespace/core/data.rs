//! Observation data containers for state-space models.
//!
//! Purpose
//! -------
//! Provide a validated container, [`SsmData`], for the observation matrix
//! consumed by the Kalman filter. Missing values are first-class: any entry
//! may be `NaN`, including entire rows, and the filter handles the resulting
//! partial- or fully-missing steps without caller involvement.
//!
//! Key behaviors
//! -------------
//! - Enforce basic invariants at construction (non-empty, at least one
//!   variable, entries finite or `NaN`).
//! - Expose observation-pattern helpers (`is_observed`) used by the filter's
//!   missing-data branch and by the news decomposition.
//! - Support padding with fully-missing rows, the crate's representation of
//!   forecast periods: appending such rows never changes the likelihood.
//!
//! Conventions
//! -----------
//! - Rows index time (0-based), columns index observation variables.
//! - `NaN` is the only missing marker; infinite values are rejected. There
//!   is no separate "omitted row" representation — callers pad instead.
use crate::statespace::errors::{SsmError, SsmResult};
use ndarray::{Array1, Array2};

/// `SsmData` — validated observation matrix with NaN missing markers.
///
/// Fields
/// ------
/// - `endog`: `Array2<f64>` of shape `(n, k_endog)`; rows are time steps.
///
/// Invariants
/// ----------
/// - `n > 0` and `k_endog > 0`.
/// - Every entry is finite or `NaN`; ±∞ is rejected at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SsmData {
    /// Observed values; `NaN` marks a missing entry.
    pub endog: Array2<f64>,
}

impl SsmData {
    /// Construct a validated dataset from an observation matrix.
    ///
    /// # Errors
    /// - [`SsmError::EmptySeries`] when there are no rows.
    /// - [`SsmError::NoEndogVariables`] when there are no columns.
    /// - [`SsmError::NonFiniteData`] for the first ±∞ entry found (`NaN` is
    ///   allowed).
    pub fn new(endog: Array2<f64>) -> SsmResult<Self> {
        if endog.nrows() == 0 {
            return Err(SsmError::EmptySeries);
        }
        if endog.ncols() == 0 {
            return Err(SsmError::NoEndogVariables);
        }
        for ((t, variable), &value) in endog.indexed_iter() {
            if value.is_infinite() {
                return Err(SsmError::NonFiniteData { t, variable, value });
            }
        }
        Ok(SsmData { endog })
    }

    /// Construct a univariate dataset from a single observation column.
    ///
    /// # Errors
    /// Same as [`SsmData::new`].
    pub fn from_column(y: Array1<f64>) -> SsmResult<Self> {
        let n = y.len();
        let endog = y.into_shape((n, 1)).map_err(|_| SsmError::EmptySeries)?;
        SsmData::new(endog)
    }

    /// Number of time steps.
    pub fn n(&self) -> usize {
        self.endog.nrows()
    }

    /// Number of observation variables.
    pub fn k_endog(&self) -> usize {
        self.endog.ncols()
    }

    /// Whether the entry at `(t, variable)` is observed (finite).
    pub fn is_observed(&self, t: usize, variable: usize) -> bool {
        self.endog[[t, variable]].is_finite()
    }

    /// Return a copy of the observation matrix extended with fully-missing
    /// rows up to `len` time steps. A `len` at or below the current length
    /// returns the matrix unchanged.
    pub fn padded(&self, len: usize) -> Array2<f64> {
        let n = self.n();
        if len <= n {
            return self.endog.clone();
        }
        let k = self.k_endog();
        let mut out = Array2::from_elem((len, k), f64::NAN);
        out.slice_mut(ndarray::s![..n, ..]).assign(&self.endog);
        out
    }
}
