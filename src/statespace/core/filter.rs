//! Kalman filter forward recursion with scale concentration.
//!
//! Purpose
//! -------
//! Run the standard linear-Gaussian Kalman filter over a validated dataset,
//! producing one-step-ahead prediction errors, their covariances, filtered
//! and predicted state moments, and the Gaussian log-likelihood — either the
//! full likelihood or, when the model concentrates a scale parameter, the
//! concentrated likelihood with its closed-form scale estimate.
//!
//! Key behaviors
//! -------------
//! - Per-step recursion: `v_t = y_t − Z a_t`, `F_t = Z P_t Zᵀ + H`,
//!   `K_t = P_t Zᵀ F_t⁻¹`, filtered update, then time update
//!   `a_{t+1} = T (a_t + K_t v_t)`, `P_{t+1} = T (P_t − K_t F_t K_tᵀ) Tᵀ + R Q Rᵀ`.
//! - Missing data is a first-class branch: fully missing steps skip the
//!   update entirely (prediction only), partially missing steps restrict
//!   Z, H, and y to the observed components so unobserved dimensions never
//!   touch the filtered state.
//! - Scale concentration: with `concentrated` set, the model supplies
//!   matrices with a unit placeholder variance; the filter accumulates
//!   `Σ v_tᵀ F̃_t⁻¹ v_t` and `Σ ln|F̃_t|` over post-burn observed scalars and
//!   derives `σ̂² = Σ v_tᵀ F̃_t⁻¹ v_t / N`, substituting it into the
//!   concentrated log-likelihood. This removes one dimension from the outer
//!   numerical optimization at the cost of a single closed-form pass.
//! - Innovation covariances are factorized with a Cholesky decomposition; a
//!   factorization failure is reported as
//!   [`SsmError::FilterSingularity`] with the failing time index.
//!
//! Invariants & assumptions
//! ------------------------
//! - The recursion is strictly sequential in `t`; each [`FilterResults`] is
//!   produced by exactly one filter pass and is read-only afterwards.
//! - The likelihood burn count excludes initial diffuse periods from the
//!   objective but never from the recorded state sequence.
//! - Recorded innovation covariances are the *full* `Z P Zᵀ + H` (and, in
//!   concentrated mode, unscaled); consumers apply the scale where needed.
use crate::statespace::{
    core::{
        data::SsmData,
        dims::SsmDims,
        init::Initialization,
        matrices::{SystemMatrices, to_array2},
    },
    errors::{SsmError, SsmResult},
};
use nalgebra::{Cholesky, DMatrix, DVector};
use ndarray::{Array1, Array2};

/// Configured Kalman filter over one model's system matrices.
///
/// Borrows the dimensions, matrices, and initialization policy; each call to
/// [`KalmanFilter::filter`] is an independent O(n) pass producing an owned
/// [`FilterResults`].
#[derive(Debug, Clone)]
pub struct KalmanFilter<'a> {
    dims: &'a SsmDims,
    matrices: &'a SystemMatrices,
    init: &'a Initialization,
    concentrated: bool,
}

impl<'a> KalmanFilter<'a> {
    /// Construct a filter after validating the matrices against `dims`.
    ///
    /// # Errors
    /// [`SsmError::MatrixDimMismatch`] when any system matrix disagrees with
    /// the declared dimensions.
    pub fn new(
        dims: &'a SsmDims, matrices: &'a SystemMatrices, init: &'a Initialization,
        concentrated: bool,
    ) -> SsmResult<Self> {
        matrices.validate(dims)?;
        Ok(Self { dims, matrices, init, concentrated })
    }

    /// Run the forward recursion over `data`.
    ///
    /// # Errors
    /// - [`SsmError::MatrixDimMismatch`] when the dataset's variable count
    ///   differs from the model's.
    /// - [`SsmError::NonStationaryTransition`] when stationary
    ///   initialization is requested for a unit-root transition.
    /// - [`SsmError::FilterSingularity`] when an innovation covariance is
    ///   not positive definite.
    /// - [`SsmError::NoObservations`] when no observed scalar survives the
    ///   likelihood burn.
    pub fn filter(&self, data: &SsmData) -> SsmResult<FilterResults> {
        let k_endog = self.dims.k_endog;
        let k_states = self.dims.k_states;
        if data.k_endog() != k_endog {
            return Err(SsmError::MatrixDimMismatch {
                matrix: "endog",
                expected: (data.n(), k_endog),
                found: data.endog.dim(),
            });
        }
        let n = data.n();
        let ln_2pi = (2.0 * std::f64::consts::PI).ln();

        let z = self.matrices.design_dmatrix();
        let h = self.matrices.obs_cov_dmatrix();
        let t_mat = self.matrices.transition_dmatrix();
        let rqr = self.matrices.rqr_dmatrix();
        let burn = self.init.loglikelihood_burn();
        let (mut a, mut p) = self.init.moments(k_states, &t_mat, &rqr)?;

        let mut predicted_state = Array2::<f64>::zeros((n + 1, k_states));
        let mut predicted_state_cov: Vec<Array2<f64>> = Vec::with_capacity(n + 1);
        let mut filtered_state = Array2::<f64>::zeros((n, k_states));
        let mut filtered_state_cov: Vec<Array2<f64>> = Vec::with_capacity(n);
        let mut forecast_error = Array2::<f64>::from_elem((n, k_endog), f64::NAN);
        let mut forecast_error_cov: Vec<Array2<f64>> = Vec::with_capacity(n);

        let mut n_signals: usize = 0;
        let mut sum_quad = 0.0;
        let mut sum_logdet = 0.0;
        let mut loglike_standard = 0.0;

        for t in 0..n {
            for i in 0..k_states {
                predicted_state[[t, i]] = a[i];
            }
            predicted_state_cov.push(to_array2(&p));
            forecast_error_cov.push(to_array2(&(&z * &p * z.transpose() + &h)));

            let observed: Vec<usize> =
                (0..k_endog).filter(|&i| data.endog[[t, i]].is_finite()).collect();

            let (a_filt, p_filt) = if observed.is_empty() {
                (a.clone(), p.clone())
            } else {
                let n_obs = observed.len();
                let z_obs = DMatrix::from_fn(n_obs, k_states, |r, c| z[(observed[r], c)]);
                let h_obs = DMatrix::from_fn(n_obs, n_obs, |r, c| h[(observed[r], observed[c])]);
                let y_obs = DVector::from_fn(n_obs, |r, _| data.endog[[t, observed[r]]]);

                let v = &y_obs - &z_obs * &a;
                let mut f = &z_obs * &p * z_obs.transpose() + &h_obs;
                symmetrize(&mut f);
                let chol = Cholesky::new(f).ok_or(SsmError::FilterSingularity { t })?;
                let logdet = 2.0 * chol.l().diagonal().iter().map(|d| d.ln()).sum::<f64>();
                let quad = v.dot(&chol.solve(&v));

                let zp = &z_obs * &p;
                let gain = chol.solve(&zp).transpose();
                let a_filt = &a + &gain * &v;
                let mut p_filt = &p - &gain * &zp;
                symmetrize(&mut p_filt);

                for (r, &i) in observed.iter().enumerate() {
                    forecast_error[[t, i]] = v[r];
                }
                if t >= burn {
                    n_signals += n_obs;
                    sum_quad += quad;
                    sum_logdet += logdet;
                    loglike_standard -= 0.5 * ((n_obs as f64) * ln_2pi + logdet + quad);
                }
                (a_filt, p_filt)
            };

            for i in 0..k_states {
                filtered_state[[t, i]] = a_filt[i];
            }
            filtered_state_cov.push(to_array2(&p_filt));

            a = &t_mat * &a_filt;
            let mut p_next = &t_mat * &p_filt * t_mat.transpose() + &rqr;
            symmetrize(&mut p_next);
            p = p_next;
        }
        for i in 0..k_states {
            predicted_state[[n, i]] = a[i];
        }
        predicted_state_cov.push(to_array2(&p));

        if n_signals == 0 {
            return Err(SsmError::NoObservations);
        }

        let (loglike, scale) = if self.concentrated {
            let n_f = n_signals as f64;
            let scale = sum_quad / n_f;
            let loglike = -0.5 * (n_f * (ln_2pi + 1.0 + scale.ln()) + sum_logdet);
            (loglike, Some(scale))
        } else {
            (loglike_standard, None)
        };

        Ok(FilterResults {
            n,
            dims: *self.dims,
            matrices: self.matrices.clone(),
            predicted_state,
            predicted_state_cov,
            filtered_state,
            filtered_state_cov,
            forecast_error,
            forecast_error_cov,
            loglike,
            scale,
            concentrated: self.concentrated,
            loglikelihood_burn: burn,
            n_signals,
        })
    }
}

/// Immutable record of one filter pass.
///
/// Fields
/// ------
/// - `predicted_state` / `predicted_state_cov`: `a_t`, `P_t` for
///   `t = 0..=n` (row `n` is the one-step-ahead prediction past the sample).
/// - `filtered_state` / `filtered_state_cov`: `a_{t|t}`, `P_{t|t}` for
///   `t = 0..n`; equal to the predicted moments at fully-missing steps.
/// - `forecast_error`: one-step prediction errors, `NaN` at missing entries.
/// - `forecast_error_cov`: full (unscaled) `Z P_t Zᵀ + H` per step.
/// - `loglike`: concentrated or full Gaussian log-likelihood, excluding the
///   first `loglikelihood_burn` periods.
/// - `scale`: the closed-form σ̂² when the pass was concentrated.
/// - `n_signals`: observed scalar count entering the likelihood.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResults {
    pub n: usize,
    pub dims: SsmDims,
    pub matrices: SystemMatrices,
    pub predicted_state: Array2<f64>,
    pub predicted_state_cov: Vec<Array2<f64>>,
    pub filtered_state: Array2<f64>,
    pub filtered_state_cov: Vec<Array2<f64>>,
    pub forecast_error: Array2<f64>,
    pub forecast_error_cov: Vec<Array2<f64>>,
    pub loglike: f64,
    pub scale: Option<f64>,
    pub concentrated: bool,
    pub loglikelihood_burn: usize,
    pub n_signals: usize,
}

impl FilterResults {
    /// Filtered signal estimates `Z a_{t|t}` for every in-sample step,
    /// shape `(n, k_endog)`.
    ///
    /// At fully-missing steps this is the one-step prediction of the signal;
    /// at observed steps it incorporates the current observation.
    pub fn filtered_signal(&self) -> Array2<f64> {
        let k_endog = self.dims.k_endog;
        let k_states = self.dims.k_states;
        let mut signal = Array2::<f64>::zeros((self.n, k_endog));
        for t in 0..self.n {
            for i in 0..k_endog {
                let mut acc = 0.0;
                for j in 0..k_states {
                    acc += self.matrices.design[[i, j]] * self.filtered_state[[t, j]];
                }
                signal[[t, i]] = acc;
            }
        }
        signal
    }

    /// Filtered signal estimate for one `(t, variable)` pair.
    pub fn filtered_signal_at(&self, t: usize, variable: usize) -> f64 {
        let mut acc = 0.0;
        for j in 0..self.dims.k_states {
            acc += self.matrices.design[[variable, j]] * self.filtered_state[[t, j]];
        }
        acc
    }

    /// One-step-ahead prediction of the state past the sample end, `a_{n+1}`.
    pub fn final_predicted_state(&self) -> Array1<f64> {
        self.predicted_state.row(self.n).to_owned()
    }
}

fn symmetrize(m: &mut DMatrix<f64>) {
    let n = m.nrows();
    for i in 0..n {
        for j in 0..i {
            let avg = 0.5 * (m[(i, j)] + m[(j, i)]);
            m[(i, j)] = avg;
            m[(j, i)] = avg;
        }
    }
}
