//! AR(1) model with exact observation of the state.
//!
//! Purpose
//! -------
//! Implement the first-order autoregression as a state-space model,
//!
//! ```text
//! y_t     = α_t                       (Z = 1, H = 0)
//! α_{t+1} = φ α_t + η_t,   η_t ~ N(0, σ²)
//! ```
//!
//! with ψ = [φ, σ²]. The autoregressive coefficient is constrained to the
//! open interval (−1, 1) through a scaled logistic map, and the innovation
//! variance is kept positive through softplus. The state is stationary by
//! construction, so initialization solves the Lyapunov equation for the
//! unconditional variance σ² / (1 − φ²).
//!
//! With exact observation the filter collapses to the textbook AR(1)
//! predictor: the filtered state equals the last observation and h-step
//! forecasts decay as φ^h, which the forecast and news tests rely on.
use crate::optimization::numerical_stability::transformations::{
    safe_logistic, safe_logit, safe_softplus, safe_softplus_inv,
};
use crate::statespace::{
    core::{data::SsmData, dims::SsmDims, init::Initialization, matrices::SystemMatrices},
    errors::SsmResult,
    model::{StateSpace, validate_params},
};
use ndarray::{Array1, array};

/// AR(1) model, ψ = [φ, σ²].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ar1Model;

impl Ar1Model {
    pub fn new() -> Self {
        Ar1Model
    }
}

impl StateSpace for Ar1Model {
    fn dims(&self) -> SsmDims {
        SsmDims { k_endog: 1, k_states: 1, k_posdef: 1 }
    }

    fn k_params(&self) -> usize {
        2
    }

    fn param_names(&self) -> Vec<String> {
        vec!["ar.coefficient".to_string(), "var.innovation".to_string()]
    }

    fn base_matrices(&self) -> SsmResult<SystemMatrices> {
        let dims = self.dims();
        SystemMatrices::new(
            &dims,
            array![[1.0]],
            array![[0.0]],
            array![[0.0]],
            array![[1.0]],
            array![[0.0]],
        )
    }

    fn update(&self, params: &Array1<f64>, matrices: &mut SystemMatrices) -> SsmResult<()> {
        validate_params(self, params)?;
        matrices.transition[[0, 0]] = params[0];
        matrices.state_cov[[0, 0]] = params[1];
        Ok(())
    }

    fn transform(&self, unconstrained: &Array1<f64>) -> Array1<f64> {
        array![
            2.0 * safe_logistic(unconstrained[0]) - 1.0,
            safe_softplus(unconstrained[1]),
        ]
    }

    fn untransform(&self, constrained: &Array1<f64>) -> Array1<f64> {
        array![
            safe_logit(0.5 * (constrained[0] + 1.0)),
            safe_softplus_inv(constrained[1]),
        ]
    }

    fn start_params(&self, data: &SsmData) -> Array1<f64> {
        let phi = super::observed_autocorrelation(data, 0);
        let var = super::observed_variance(data, 0);
        let innovation = (var * (1.0 - phi * phi)).max(1e-4);
        array![phi, innovation]
    }

    fn initialization(&self) -> Initialization {
        Initialization::Stationary
    }
}
