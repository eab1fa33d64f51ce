//! Local linear trend model: random-walk level with a random-walk slope.
//!
//! ```text
//! y_t     = μ_t + ε_t,              ε_t ~ N(0, σ²_irregular)
//! μ_{t+1} = μ_t + β_t + η_t,        η_t ~ N(0, σ²_level)
//! β_{t+1} = β_t + ζ_t,              ζ_t ~ N(0, σ²_trend)
//! ```
//!
//! ψ = [σ²_irregular, σ²_level, σ²_trend], all softplus-constrained. Both
//! states are integrated, so the model requires approximate-diffuse
//! initialization with two burn periods (one per diffuse state).
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

/// Local linear trend model, ψ = [σ²_irregular, σ²_level, σ²_trend].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalLinearTrendModel;

impl LocalLinearTrendModel {
    pub fn new() -> Self {
        LocalLinearTrendModel
    }
}

impl StateSpace for LocalLinearTrendModel {
    fn dims(&self) -> SsmDims {
        SsmDims { k_endog: 1, k_states: 2, k_posdef: 2 }
    }

    fn k_params(&self) -> usize {
        3
    }

    fn param_names(&self) -> Vec<String> {
        vec![
            "var.irregular".to_string(),
            "var.level".to_string(),
            "var.trend".to_string(),
        ]
    }

    fn base_matrices(&self) -> SsmResult<SystemMatrices> {
        let dims = self.dims();
        SystemMatrices::new(
            &dims,
            array![[1.0, 0.0]],
            array![[0.0]],
            array![[1.0, 1.0], [0.0, 1.0]],
            array![[1.0, 0.0], [0.0, 1.0]],
            array![[0.0, 0.0], [0.0, 0.0]],
        )
    }

    fn update(&self, params: &Array1<f64>, matrices: &mut SystemMatrices) -> SsmResult<()> {
        validate_params(self, params)?;
        matrices.obs_cov[[0, 0]] = params[0];
        matrices.state_cov[[0, 0]] = params[1];
        matrices.state_cov[[1, 1]] = params[2];
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
        array![var / 3.0, var / 3.0, var / 30.0]
    }

    fn initialization(&self) -> Initialization {
        Initialization::ApproximateDiffuse {
            variance: DEFAULT_DIFFUSE_VARIANCE,
            loglikelihood_burn: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statespace::model::check_transform_round_trip;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Structural skeleton shape and parameter slot writes.
    // - Transform round trips.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the trend skeleton and parameter writes: the transition couples
    // level and slope, and update touches only the three variance slots.
    //
    // Given
    // -----
    // - ψ = [0.4, 0.3, 0.05].
    //
    // Expect
    // ------
    // - T = [[1, 1], [0, 1]], H = 0.4, Q = diag(0.3, 0.05), off-diagonal
    //   Q entries stay zero.
    fn skeleton_and_update_are_consistent() {
        let model = LocalLinearTrendModel::new();
        let mut mats = model.base_matrices().unwrap();
        model.update(&array![0.4, 0.3, 0.05], &mut mats).unwrap();

        assert_eq!(mats.transition, array![[1.0, 1.0], [0.0, 1.0]]);
        assert_eq!(mats.obs_cov[[0, 0]], 0.4);
        assert_eq!(mats.state_cov[[0, 0]], 0.3);
        assert_eq!(mats.state_cov[[1, 1]], 0.05);
        assert_eq!(mats.state_cov[[0, 1]], 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify the softplus transform round-trips across the three variances.
    //
    // Given
    // -----
    // - ψ = [0.4, 0.02, 7.0].
    //
    // Expect
    // ------
    // - check_transform_round_trip passes at 1e-10.
    fn transform_round_trips() {
        let model = LocalLinearTrendModel::new();
        check_transform_round_trip(&model, &array![0.4, 0.02, 7.0], 1e-10).unwrap();
    }
}
