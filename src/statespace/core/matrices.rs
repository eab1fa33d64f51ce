//! System matrices for linear-Gaussian state-space models.
//!
//! Purpose
//! -------
//! Hold the five structural matrices of a time-invariant state-space system
//! and enforce their mutual dimension invariants:
//!
//! ```text
//! y_t     = Z α_t + ε_t,        ε_t ~ N(0, H)
//! α_{t+1} = T α_t + R η_t,      η_t ~ N(0, Q)
//! ```
//!
//! Models obtain a skeleton via their `base_matrices` implementation and
//! write parameter-dependent entries in `update`; the filter then copies the
//! matrices into `nalgebra` containers for factorization work.
//!
//! Invariants & assumptions
//! ------------------------
//! - Shapes: Z is `k_endog × k_states`, H is `k_endog × k_endog`, T is
//!   `k_states × k_states`, R is `k_states × k_posdef`, Q is
//!   `k_posdef × k_posdef`; all validated against one [`SsmDims`].
//! - Matrices are constant across time (the time-invariant case); parameter
//!   dependence enters only through `update`.
use crate::statespace::{
    core::dims::SsmDims,
    errors::{SsmError, SsmResult},
};
use nalgebra::DMatrix;
use ndarray::Array2;

/// The five structural matrices (Z, H, T, R, Q) of a state-space system.
///
/// Fields use the conventional names: `design` (Z), `obs_cov` (H),
/// `transition` (T), `selection` (R), `state_cov` (Q).
#[derive(Debug, Clone, PartialEq)]
pub struct SystemMatrices {
    /// Design matrix Z, `k_endog × k_states`.
    pub design: Array2<f64>,
    /// Observation covariance H, `k_endog × k_endog`.
    pub obs_cov: Array2<f64>,
    /// Transition matrix T, `k_states × k_states`.
    pub transition: Array2<f64>,
    /// Selection matrix R, `k_states × k_posdef`.
    pub selection: Array2<f64>,
    /// State disturbance covariance Q, `k_posdef × k_posdef`.
    pub state_cov: Array2<f64>,
}

impl SystemMatrices {
    /// Construct validated system matrices for the given dimensions.
    ///
    /// # Errors
    /// [`SsmError::MatrixDimMismatch`] naming the first matrix whose shape
    /// disagrees with `dims`.
    pub fn new(
        dims: &SsmDims, design: Array2<f64>, obs_cov: Array2<f64>, transition: Array2<f64>,
        selection: Array2<f64>, state_cov: Array2<f64>,
    ) -> SsmResult<Self> {
        check_shape("design", &design, (dims.k_endog, dims.k_states))?;
        check_shape("obs_cov", &obs_cov, (dims.k_endog, dims.k_endog))?;
        check_shape("transition", &transition, (dims.k_states, dims.k_states))?;
        check_shape("selection", &selection, (dims.k_states, dims.k_posdef))?;
        check_shape("state_cov", &state_cov, (dims.k_posdef, dims.k_posdef))?;
        Ok(Self { design, obs_cov, transition, selection, state_cov })
    }

    /// Construct an all-zero skeleton with the correct shapes.
    ///
    /// Models fill structural constants once and parameter-dependent slots on
    /// every `update` call.
    pub fn zeros(dims: &SsmDims) -> Self {
        Self {
            design: Array2::zeros((dims.k_endog, dims.k_states)),
            obs_cov: Array2::zeros((dims.k_endog, dims.k_endog)),
            transition: Array2::zeros((dims.k_states, dims.k_states)),
            selection: Array2::zeros((dims.k_states, dims.k_posdef)),
            state_cov: Array2::zeros((dims.k_posdef, dims.k_posdef)),
        }
    }

    /// Re-validate shapes against `dims` (used after a model `update`).
    ///
    /// # Errors
    /// Same as [`SystemMatrices::new`].
    pub fn validate(&self, dims: &SsmDims) -> SsmResult<()> {
        check_shape("design", &self.design, (dims.k_endog, dims.k_states))?;
        check_shape("obs_cov", &self.obs_cov, (dims.k_endog, dims.k_endog))?;
        check_shape("transition", &self.transition, (dims.k_states, dims.k_states))?;
        check_shape("selection", &self.selection, (dims.k_states, dims.k_posdef))?;
        check_shape("state_cov", &self.state_cov, (dims.k_posdef, dims.k_posdef))?;
        Ok(())
    }

    /// Copy the design matrix into a `nalgebra` container.
    pub fn design_dmatrix(&self) -> DMatrix<f64> {
        to_dmatrix(&self.design)
    }

    /// Copy the observation covariance into a `nalgebra` container.
    pub fn obs_cov_dmatrix(&self) -> DMatrix<f64> {
        to_dmatrix(&self.obs_cov)
    }

    /// Copy the transition matrix into a `nalgebra` container.
    pub fn transition_dmatrix(&self) -> DMatrix<f64> {
        to_dmatrix(&self.transition)
    }

    /// Compute the state disturbance contribution `R Q Rᵀ` as a `nalgebra`
    /// matrix (`k_states × k_states`).
    pub fn rqr_dmatrix(&self) -> DMatrix<f64> {
        let r = to_dmatrix(&self.selection);
        let q = to_dmatrix(&self.state_cov);
        &r * q * r.transpose()
    }
}

/// Copy an `ndarray` matrix into a `nalgebra::DMatrix` entry by entry.
///
/// `ndarray` is row-major and `nalgebra` column-major, so the copy is
/// indexed rather than memcpy'd.
pub fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    let (rows, cols) = a.dim();
    let mut out = DMatrix::<f64>::zeros(rows, cols);
    for ((i, j), &value) in a.indexed_iter() {
        out[(i, j)] = value;
    }
    out
}

/// Copy a `nalgebra::DMatrix` into an `ndarray` matrix entry by entry.
pub fn to_array2(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

fn check_shape(
    matrix: &'static str, a: &Array2<f64>, expected: (usize, usize),
) -> SsmResult<()> {
    let found = a.dim();
    if found != expected {
        return Err(SsmError::MatrixDimMismatch { matrix, expected, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Mutual dimension validation across all five matrices.
    // - The ndarray ↔ nalgebra copy helpers.
    // - The R Q Rᵀ product used by the filter's time update.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that a shape mismatch in any single matrix is reported with the
    // matrix name.
    //
    // Given
    // -----
    // - Dims (1, 2, 1) and a selection matrix of shape 1×1 instead of 2×1.
    //
    // Expect
    // ------
    // - MatrixDimMismatch { matrix: "selection", .. }.
    fn new_rejects_mismatched_selection() {
        let dims = SsmDims::new(1, 2, 1).unwrap();
        let result = SystemMatrices::new(
            &dims,
            Array2::zeros((1, 2)),
            Array2::zeros((1, 1)),
            Array2::zeros((2, 2)),
            Array2::zeros((1, 1)), // wrong: should be 2×1
            Array2::zeros((1, 1)),
        );
        assert!(matches!(
            result.unwrap_err(),
            SsmError::MatrixDimMismatch { matrix: "selection", .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify the zeros skeleton validates against its own dims.
    //
    // Given
    // -----
    // - Dims (2, 3, 2).
    //
    // Expect
    // ------
    // - `zeros(..).validate(..)` returns Ok.
    fn zeros_skeleton_is_self_consistent() {
        let dims = SsmDims::new(2, 3, 2).unwrap();
        assert!(SystemMatrices::zeros(&dims).validate(&dims).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Verify the copy helpers transpose-safely round-trip a non-symmetric
    // matrix and that R Q Rᵀ is computed correctly.
    //
    // Given
    // -----
    // - A 2×3 matrix with distinct entries; R = [[1], [2]], Q = [[0.5]].
    //
    // Expect
    // ------
    // - to_array2(to_dmatrix(a)) == a.
    // - R Q Rᵀ = [[0.5, 1.0], [1.0, 2.0]].
    fn copy_helpers_and_rqr_are_correct() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        assert_eq!(to_array2(&to_dmatrix(&a)), a);

        let dims = SsmDims::new(1, 2, 1).unwrap();
        let mats = SystemMatrices::new(
            &dims,
            array![[1.0, 0.0]],
            array![[0.0]],
            array![[1.0, 0.0], [0.0, 1.0]],
            array![[1.0], [2.0]],
            array![[0.5]],
        )
        .unwrap();
        let rqr = mats.rqr_dmatrix();
        assert!((rqr[(0, 0)] - 0.5).abs() < 1e-12);
        assert!((rqr[(0, 1)] - 1.0).abs() < 1e-12);
        assert!((rqr[(1, 0)] - 1.0).abs() < 1e-12);
        assert!((rqr[(1, 1)] - 2.0).abs() < 1e-12);
    }
}
