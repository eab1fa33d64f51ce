//! Out-of-sample forecasting from a completed filter pass.
//!
//! Purpose
//! -------
//! Propagate the final predicted state of a [`FilterResults`] forward
//! through the transition equation to produce h-step-ahead forecast means
//! and covariances for the observed variables.
//!
//! Conventions
//! -----------
//! - `mean.row(j)` is the (j+1)-step-ahead forecast `ŷ_{n+j+1}`.
//! - Covariances include both state uncertainty and observation noise:
//!   `F_{n+j+1} = Z P_{n+j+1} Zᵀ + H`, with the concentrated scale folded
//!   back in when the originating pass was concentrated.
use crate::statespace::{
    core::{
        filter::FilterResults,
        matrices::{to_array2, to_dmatrix},
    },
    errors::{SsmError, SsmResult},
};
use nalgebra::DVector;
use ndarray::Array2;

/// Forecast means and covariances for a fixed horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct SsmForecast {
    /// Forecast means, shape `(horizon, k_endog)`.
    pub mean: Array2<f64>,
    /// Per-step forecast covariances, `k_endog × k_endog` each.
    pub cov: Vec<Array2<f64>>,
}

/// Compute h-step-ahead forecasts from a completed filter pass.
///
/// Starting from the one-step-ahead prediction `(a_{n+1}, P_{n+1})` recorded
/// by the filter, iterates the time update without further observations:
/// the forecast at step j is `Z a_{n+j}` with covariance `Z P_{n+j} Zᵀ + H`.
///
/// # Errors
/// [`SsmError::InvalidHorizon`] when `horizon == 0`.
pub fn forecast(results: &FilterResults, horizon: usize) -> SsmResult<SsmForecast> {
    if horizon == 0 {
        return Err(SsmError::InvalidHorizon { horizon });
    }
    let k_endog = results.dims.k_endog;
    let scale = results.scale.unwrap_or(1.0);

    let z = results.matrices.design_dmatrix();
    let h = results.matrices.obs_cov_dmatrix();
    let t_mat = results.matrices.transition_dmatrix();
    let rqr = results.matrices.rqr_dmatrix();

    let state = results.final_predicted_state();
    let mut a = DVector::from_iterator(state.len(), state.iter().copied());
    let mut p = to_dmatrix(&results.predicted_state_cov[results.n]);

    let mut mean = Array2::<f64>::zeros((horizon, k_endog));
    let mut cov: Vec<Array2<f64>> = Vec::with_capacity(horizon);
    for j in 0..horizon {
        let y_hat = &z * &a;
        for i in 0..k_endog {
            mean[[j, i]] = y_hat[i];
        }
        cov.push(to_array2(&((&z * &p * z.transpose() + &h) * scale)));

        a = &t_mat * a;
        p = &t_mat * &p * t_mat.transpose() + &rqr;
    }
    Ok(SsmForecast { mean, cov })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statespace::core::{
        data::SsmData, dims::SsmDims, filter::KalmanFilter, init::Initialization,
        matrices::SystemMatrices,
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The AR(1) geometric-decay forecast property with exact observation.
    // - Horizon validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Reproduce the AR(1) worked example: with Z = 1, H = 0, and known φ,
    // the h-step forecast equals φ^h times the last observation exactly.
    //
    // Given
    // -----
    // - φ = 0.75, unit innovation variance, stationary initialization,
    //   y ending at y_T = 2.0.
    //
    // Expect
    // ------
    // - Forecasts at h = 1..4 equal 0.75^h · 2.0 within 1e-12.
    fn ar1_forecasts_decay_geometrically() {
        let phi = 0.75;
        let dims = SsmDims::new(1, 1, 1).unwrap();
        let matrices = SystemMatrices::new(
            &dims,
            array![[1.0]],
            array![[0.0]],
            array![[phi]],
            array![[1.0]],
            array![[1.0]],
        )
        .unwrap();
        let init = Initialization::stationary();
        let data = SsmData::from_column(array![0.5, -0.3, 1.1, 2.0]).unwrap();

        let results =
            KalmanFilter::new(&dims, &matrices, &init, false).unwrap().filter(&data).unwrap();
        let fc = forecast(&results, 4).unwrap();

        for h in 1..=4usize {
            let expected = phi.powi(h as i32) * 2.0;
            assert!(
                (fc.mean[[h - 1, 0]] - expected).abs() < 1e-12,
                "horizon {h}: got {}, expected {expected}",
                fc.mean[[h - 1, 0]]
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify a zero horizon is rejected.
    //
    // Given
    // -----
    // - A completed local level filter pass.
    //
    // Expect
    // ------
    // - InvalidHorizon { horizon: 0 }.
    fn zero_horizon_is_rejected() {
        let dims = SsmDims::new(1, 1, 1).unwrap();
        let matrices = SystemMatrices::new(
            &dims,
            array![[1.0]],
            array![[0.5]],
            array![[1.0]],
            array![[1.0]],
            array![[0.5]],
        )
        .unwrap();
        let init = Initialization::approximate_diffuse(1e6, 1).unwrap();
        let data = SsmData::from_column(array![1.0, 2.0, 1.5]).unwrap();
        let results =
            KalmanFilter::new(&dims, &matrices, &init, false).unwrap().filter(&data).unwrap();

        assert_eq!(forecast(&results, 0).unwrap_err(), SsmError::InvalidHorizon { horizon: 0 });
    }
}
