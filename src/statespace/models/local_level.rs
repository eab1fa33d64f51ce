//! Local level model: a random-walk level observed with noise.
//!
//! Purpose
//! -------
//! Implement the simplest non-trivial state-space model,
//!
//! ```text
//! y_t     = μ_t + ε_t,      ε_t ~ N(0, σ²_irregular)
//! μ_{t+1} = μ_t + η_t,      η_t ~ N(0, σ²_level)
//! ```
//!
//! in two parameterizations:
//!
//! - **Unconcentrated**: ψ = [σ²_irregular, σ²_level], both kept positive
//!   through the softplus transform; two-dimensional numerical search.
//! - **Concentrated**: ψ = [h] with h = σ²_irregular / σ²_level. The model
//!   writes H = h and Q = 1, and the filter recovers the common scale
//!   σ̂² = σ²_level in closed form, so the numerical search is
//!   one-dimensional. At the optimum, `h · scale` recovers σ²_irregular and
//!   `scale` recovers σ²_level.
//!
//! The level state is integrated, so the model requires approximate-diffuse
//! initialization with one burn period; stationary initialization would be a
//! correctness bug, not a tuning choice.
use crate::optimization::numerical_stability::transformations::{
    safe_softplus, safe_softplus_inv,
};
use crate::statespace::{
    core::{
        data::SsmData,
        dims::SsmDims,
        init::{DEFAULT_DIFFUSE_VARIANCE, Initialization},
        matrices::SystemMatrices,
    },
    errors::SsmResult,
    model::{StateSpace, validate_params},
};
use ndarray::{Array1, array};

/// Local level model in either parameterization.
///
/// Construct with [`LocalLevelModel::new`] (unconcentrated) or
/// [`LocalLevelModel::concentrated`].
#[derive(Debug, Clone, PartialEq)]
pub struct LocalLevelModel {
    concentrated: bool,
}

impl LocalLevelModel {
    /// Unconcentrated parameterization, ψ = [σ²_irregular, σ²_level].
    pub fn new() -> Self {
        LocalLevelModel { concentrated: false }
    }

    /// Concentrated parameterization, ψ = [σ²_irregular / σ²_level].
    pub fn concentrated() -> Self {
        LocalLevelModel { concentrated: true }
    }
}

impl Default for LocalLevelModel {
    fn default() -> Self {
        LocalLevelModel::new()
    }
}

impl StateSpace for LocalLevelModel {
    fn dims(&self) -> SsmDims {
        SsmDims { k_endog: 1, k_states: 1, k_posdef: 1 }
    }

    fn k_params(&self) -> usize {
        if self.concentrated { 1 } else { 2 }
    }

    fn param_names(&self) -> Vec<String> {
        if self.concentrated {
            vec!["ratio.irregular".to_string()]
        } else {
            vec!["var.irregular".to_string(), "var.level".to_string()]
        }
    }

    fn base_matrices(&self) -> SsmResult<SystemMatrices> {
        let dims = self.dims();
        SystemMatrices::new(
            &dims,
            array![[1.0]],
            array![[0.0]],
            array![[1.0]],
            array![[1.0]],
            array![[0.0]],
        )
    }

    fn update(&self, params: &Array1<f64>, matrices: &mut SystemMatrices) -> SsmResult<()> {
        validate_params(self, params)?;
        if self.concentrated {
            matrices.obs_cov[[0, 0]] = params[0];
            matrices.state_cov[[0, 0]] = 1.0;
        } else {
            matrices.obs_cov[[0, 0]] = params[0];
            matrices.state_cov[[0, 0]] = params[1];
        }
        Ok(())
    }

    fn transform(&self, unconstrained: &Array1<f64>) -> Array1<f64> {
        unconstrained.mapv(safe_softplus)
    }

    fn untransform(&self, constrained: &Array1<f64>) -> Array1<f64> {
        constrained.mapv(safe_softplus_inv)
    }

    fn start_params(&self, data: &SsmData) -> Array1<f64> {
        let var = super::observed_variance(data, 0);
        if self.concentrated {
            array![1.0]
        } else {
            array![0.5 * var, 0.5 * var]
        }
    }

    fn initialization(&self) -> Initialization {
        Initialization::ApproximateDiffuse {
            variance: DEFAULT_DIFFUSE_VARIANCE,
            loglikelihood_burn: 1,
        }
    }

    fn concentrate_scale(&self) -> bool {
        self.concentrated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statespace::{errors::SsmError, model::check_transform_round_trip};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Parameter counts and matrix writes in both parameterizations.
    // - Rejection of wrong-length parameter vectors.
    // - Transform round trips and positive start parameters.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify `update` writes H and Q in the unconcentrated form and pins
    // Q = 1 in the concentrated form.
    //
    // Given
    // -----
    // - ψ = [0.8, 0.2] (unconcentrated) and ψ = [2.5] (concentrated).
    //
    // Expect
    // ------
    // - H = 0.8, Q = 0.2 for the former; H = 2.5, Q = 1.0 for the latter.
    fn update_writes_expected_slots() {
        let model = LocalLevelModel::new();
        let mut mats = model.base_matrices().unwrap();
        model.update(&array![0.8, 0.2], &mut mats).unwrap();
        assert_eq!(mats.obs_cov[[0, 0]], 0.8);
        assert_eq!(mats.state_cov[[0, 0]], 0.2);

        let conc = LocalLevelModel::concentrated();
        let mut mats = conc.base_matrices().unwrap();
        conc.update(&array![2.5], &mut mats).unwrap();
        assert_eq!(mats.obs_cov[[0, 0]], 2.5);
        assert_eq!(mats.state_cov[[0, 0]], 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify a wrong-length ψ is rejected with the declared count.
    //
    // Given
    // -----
    // - The unconcentrated model (2 params) updated with a length-1 vector.
    //
    // Expect
    // ------
    // - ParamLengthMismatch { expected: 2, actual: 1 }.
    fn update_rejects_wrong_length() {
        let model = LocalLevelModel::new();
        let mut mats = model.base_matrices().unwrap();
        assert_eq!(
            model.update(&array![0.5], &mut mats).unwrap_err(),
            SsmError::ParamLengthMismatch { expected: 2, actual: 1 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify the softplus transform pair round-trips on representative
    // variance values in both parameterizations.
    //
    // Given
    // -----
    // - ψ = [0.01, 5.0] and ψ = [3.2].
    //
    // Expect
    // ------
    // - check_transform_round_trip passes at 1e-10.
    fn transform_round_trips() {
        let model = LocalLevelModel::new();
        check_transform_round_trip(&model, &array![0.01, 5.0], 1e-10).unwrap();
        let conc = LocalLevelModel::concentrated();
        check_transform_round_trip(&conc, &array![3.2], 1e-10).unwrap();
    }

    #[test]
    // Purpose
    // -------
    // Verify start parameters are strictly positive and data-driven in the
    // unconcentrated form.
    //
    // Given
    // -----
    // - A short series with sample variance well above zero.
    //
    // Expect
    // ------
    // - Both start values equal half the sample variance and are > 0.
    fn start_params_use_sample_variance() {
        let data = SsmData::from_column(array![1.0, 3.0, 2.0, 5.0, 4.0]).unwrap();
        let model = LocalLevelModel::new();
        let start = model.start_params(&data);
        assert_eq!(start.len(), 2);
        assert!(start[0] > 0.0 && start[1] > 0.0);
        assert!((start[0] - start[1]).abs() < 1e-12);
    }
}
