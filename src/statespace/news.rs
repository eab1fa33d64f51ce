//! Forecast-news decomposition: attribute revisions between two datasets.
//!
//! Purpose
//! -------
//! Explain how estimates change when a dataset is extended or revised, with
//! the model's parameters held fixed at their previously estimated values —
//! no re-estimation. Every newly observed scalar ("update") contributes
//! `impact = weight × news`, where the news is its forecast error relative
//! to the information available before it, and the weight is the exact
//! linear coefficient connecting that observation to each impact date's
//! estimate. Revisions to previously observed values are applied first and
//! reported as one aggregated term.
//!
//! Key behaviors
//! -------------
//! - Estimates are the filter's *filtered* signal `Z a_{t|t}` per impact
//!   date, computed on datasets padded with missing rows through the impact
//!   range; at fully-missing dates this is the model forecast.
//! - Updates are processed sequentially in chronological `(time, variable)`
//!   order: update j's news is its observed value minus the filtered
//!   prediction from the previous dataset plus revisions plus updates
//!   `1..j−1`. For a single update this is exactly the forecast error
//!   against the previous information set.
//! - Weights come from linearity: for a fixed observation pattern the
//!   filtered estimate is affine in the data (gains depend on the pattern
//!   only), so re-running the filter with one observation perturbed by +1
//!   and differencing the signals yields the exact weight column.
//! - Impacts are defined as successive estimate differences, so additivity
//!
//!   `updated estimate = previous estimate + revision impact + Σ update impacts`
//!
//!   holds to machine precision by telescoping. When updates arrive after
//!   every previously observed date (the nowcasting case, as in both worked
//!   examples), `impact = weight × news` additionally follows from the
//!   projection property of the Gaussian filter; when an update fills a gap
//!   *before* existing observations, the weights remain the exact linear
//!   coefficients but the filtered-forecast news is no longer the matching
//!   innovation, so the product is approximate there.
//!
//! Invariants & assumptions
//! ------------------------
//! - The updated dataset must contain every observation of the previous one
//!   (possibly revised); dropping data is an error.
//! - Running the decomposition with `updated == previous` yields zero news
//!   and zero impacts everywhere.
//! - Revisions are aggregated, never attributed per revised point.
use crate::statespace::{
    core::data::SsmData,
    errors::{SsmError, SsmResult},
    estimate::run_filter,
    model::StateSpace,
};
use ndarray::{Array1, Array2, s};

/// One newly observed scalar and its news.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsUpdate {
    /// Time index of the update.
    pub t: usize,
    /// Variable index of the update.
    pub variable: usize,
    /// Newly observed value.
    pub observed: f64,
    /// Forecast of this value from the information set before the update.
    pub forecast: f64,
    /// Forecast error `observed − forecast`.
    pub news: f64,
}

/// Read-only result of a news decomposition.
///
/// Impact-date arrays have shape `(impact_end − impact_start + 1, k_endog)`;
/// row `s` corresponds to impact date `impact_start + s`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsReport {
    /// First impact date (inclusive).
    pub impact_start: usize,
    /// Last impact date (inclusive).
    pub impact_end: usize,
    /// Updates in processing order, with their news.
    pub updates: Vec<NewsUpdate>,
    /// Number of revised previously observed scalars.
    pub n_revisions: usize,
    /// Estimates from the previous dataset.
    pub prev_estimates: Array2<f64>,
    /// Estimates from the updated dataset.
    pub updated_estimates: Array2<f64>,
    /// Aggregated impact of all revisions.
    pub revision_impacts: Array2<f64>,
    /// Per-update impacts, parallel to `updates`.
    pub update_impacts: Vec<Array2<f64>>,
    /// Per-update weight panels, parallel to `updates`.
    pub weights: Vec<Array2<f64>>,
    /// Revision impact plus all update impacts.
    pub total_impacts: Array2<f64>,
}

impl NewsReport {
    /// Number of impact dates covered by the report.
    pub fn n_impact_dates(&self) -> usize {
        self.impact_end - self.impact_start + 1
    }
}

/// Decompose estimate revisions between `previous` and `updated` datasets.
///
/// `params` are constrained parameter values, typically a fitted model's
/// `params` — they are held fixed throughout. Impact dates span
/// `[impact_start, impact_end]`, 0-based on the shared time axis.
///
/// # Errors
/// - [`SsmError::EndogDimMismatch`] when the datasets disagree on the
///   variable count.
/// - [`SsmError::UpdatedSeriesTooShort`] when `updated` is shorter than
///   `previous`.
/// - [`SsmError::DroppedObservation`] when a previously observed entry is
///   missing from `updated`.
/// - [`SsmError::InvalidImpactRange`] when `impact_start > impact_end`.
/// - Any model/filter error from the underlying passes.
pub fn news<M: StateSpace>(
    model: &M, params: &Array1<f64>, previous: &SsmData, updated: &SsmData,
    impact_start: usize, impact_end: usize,
) -> SsmResult<NewsReport> {
    if previous.k_endog() != updated.k_endog() {
        return Err(SsmError::EndogDimMismatch {
            previous: previous.k_endog(),
            updated: updated.k_endog(),
        });
    }
    if updated.n() < previous.n() {
        return Err(SsmError::UpdatedSeriesTooShort {
            previous: previous.n(),
            updated: updated.n(),
        });
    }
    if impact_start > impact_end {
        return Err(SsmError::InvalidImpactRange { start: impact_start, end: impact_end });
    }
    let k_endog = previous.k_endog();
    for t in 0..previous.n() {
        for variable in 0..k_endog {
            if previous.is_observed(t, variable) && !updated.is_observed(t, variable) {
                return Err(SsmError::DroppedObservation { t, variable });
            }
        }
    }

    let len = (impact_end + 1).max(updated.n());
    let prev_endog = previous.padded(len);
    let upd_endog = updated.padded(len);

    let signals = |endog: &Array2<f64>| -> SsmResult<Array2<f64>> {
        let data = SsmData::new(endog.clone())?;
        let results = run_filter(model, params, &data)?;
        Ok(results.filtered_signal().slice(s![impact_start..=impact_end, ..]).to_owned())
    };
    let signal_at = |endog: &Array2<f64>, t: usize, variable: usize| -> SsmResult<f64> {
        let data = SsmData::new(endog.clone())?;
        let results = run_filter(model, params, &data)?;
        Ok(results.filtered_signal_at(t, variable))
    };

    let prev_estimates = signals(&prev_endog)?;

    // Apply revisions jointly: previous observation pattern, updated values.
    let mut revised = prev_endog.clone();
    let mut n_revisions = 0;
    for t in 0..previous.n() {
        for variable in 0..k_endog {
            if previous.is_observed(t, variable) {
                let new_value = upd_endog[[t, variable]];
                if new_value != revised[[t, variable]] {
                    n_revisions += 1;
                }
                revised[[t, variable]] = new_value;
            }
        }
    }
    let revised_estimates =
        if n_revisions > 0 { signals(&revised)? } else { prev_estimates.clone() };
    let revision_impacts = &revised_estimates - &prev_estimates;

    // Newly observed scalars, in chronological order.
    let mut update_cells: Vec<(usize, usize)> = Vec::new();
    for t in 0..updated.n() {
        for variable in 0..k_endog {
            if updated.is_observed(t, variable)
                && !(t < previous.n() && previous.is_observed(t, variable))
            {
                update_cells.push((t, variable));
            }
        }
    }

    let mut base = revised;
    let mut base_estimates = revised_estimates;
    let mut updates: Vec<NewsUpdate> = Vec::with_capacity(update_cells.len());
    let mut update_impacts: Vec<Array2<f64>> = Vec::with_capacity(update_cells.len());
    let mut weights: Vec<Array2<f64>> = Vec::with_capacity(update_cells.len());

    for (t, variable) in update_cells {
        let observed = upd_endog[[t, variable]];
        let forecast = signal_at(&base, t, variable)?;

        base[[t, variable]] = observed;
        let new_estimates = signals(&base)?;

        let mut perturbed = base.clone();
        perturbed[[t, variable]] += 1.0;
        let perturbed_estimates = signals(&perturbed)?;

        update_impacts.push(&new_estimates - &base_estimates);
        weights.push(&perturbed_estimates - &new_estimates);
        updates.push(NewsUpdate { t, variable, observed, forecast, news: observed - forecast });
        base_estimates = new_estimates;
    }

    let mut total_impacts = revision_impacts.clone();
    for impact in &update_impacts {
        total_impacts += impact;
    }

    Ok(NewsReport {
        impact_start,
        impact_end,
        updates,
        n_revisions,
        prev_estimates,
        updated_estimates: base_estimates,
        revision_impacts,
        update_impacts,
        weights,
        total_impacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statespace::models::{ar1::Ar1Model, local_level::LocalLevelModel};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The zero-news round trip when updated == previous.
    // - The AR(1) worked example: geometric weights and exact additivity.
    // - Revision aggregation combined with an update, and the
    //   impact = weight × news identity.
    // - Dropped-observation detection.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify an unchanged dataset produces no updates, no revisions, and
    // identically zero impacts.
    //
    // Given
    // -----
    // - An AR(1) model with fixed parameters and identical datasets.
    //
    // Expect
    // ------
    // - Empty updates, n_revisions == 0, total impacts all zero, and
    //   previous == updated estimates.
    fn identical_datasets_yield_zero_news() {
        let model = Ar1Model::new();
        let params = array![0.6, 1.0];
        let data = SsmData::from_column(array![0.4, 0.9, 0.2]).unwrap();

        let report = news(&model, &params, &data, &data, 0, 5).unwrap();

        assert!(report.updates.is_empty());
        assert_eq!(report.n_revisions, 0);
        assert!(report.total_impacts.iter().all(|v| v.abs() < 1e-14));
        assert_eq!(report.prev_estimates, report.updated_estimates);
    }

    #[test]
    // Purpose
    // -------
    // Reproduce the univariate AR(1) worked example: one new observation at
    // t = 1 with impacts at horizons 1..4 after the update date weighted by
    // φ^h, news equal to the one-step forecast error, and exact additivity.
    //
    // Given
    // -----
    // - φ = 0.75, σ² = 1, previous = [y₀], updated = [y₀, y₁] with
    //   y₀ = 2.0, y₁ = 2.1; impact dates 1..=5.
    //
    // Expect
    // ------
    // - news = y₁ − φ y₀.
    // - Weight at impact date 1 + h equals φ^h for h = 0..4.
    // - updated estimate == previous estimate + total impact everywhere.
    fn ar1_weights_decay_geometrically() {
        let phi = 0.75;
        let model = Ar1Model::new();
        let params = array![phi, 1.0];
        let y0 = 2.0;
        let y1 = 2.1;
        let previous = SsmData::from_column(array![y0]).unwrap();
        let updated = SsmData::from_column(array![y0, y1]).unwrap();

        let report = news(&model, &params, &previous, &updated, 1, 5).unwrap();

        assert_eq!(report.updates.len(), 1);
        let update = &report.updates[0];
        assert_eq!((update.t, update.variable), (1, 0));
        assert!((update.news - (y1 - phi * y0)).abs() < 1e-10);

        let weights = &report.weights[0];
        for h in 0..5usize {
            let expected = phi.powi(h as i32);
            assert!(
                (weights[[h, 0]] - expected).abs() < 1e-10,
                "weight at horizon {h}: got {}, expected {expected}",
                weights[[h, 0]]
            );
        }

        for s in 0..report.n_impact_dates() {
            let additivity = report.prev_estimates[[s, 0]] + report.total_impacts[[s, 0]]
                - report.updated_estimates[[s, 0]];
            assert!(additivity.abs() < 1e-12);
            let identity =
                report.update_impacts[0][[s, 0]] - weights[[s, 0]] * update.news;
            assert!(identity.abs() < 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify a revision and an update combine additively: the revision is
    // aggregated, the update satisfies impact = weight × news, and the
    // totals reconcile the two estimate sets.
    //
    // Given
    // -----
    // - A local level model with fixed variances; previous = [1.0, 2.0, NaN],
    //   updated = [1.0, 2.5, 3.0] (revision at t = 1, update at t = 2);
    //   impact dates 0..=4.
    //
    // Expect
    // ------
    // - n_revisions == 1 and one update with news ≠ 0.
    // - Additivity within 1e-10 at every impact date.
    // - impact = weight × news within 1e-8 for the update.
    fn revision_and_update_reconcile_additively() {
        let model = LocalLevelModel::new();
        let params = array![0.5, 0.3];
        let previous = SsmData::from_column(array![1.0, 2.0, f64::NAN]).unwrap();
        let updated = SsmData::from_column(array![1.0, 2.5, 3.0]).unwrap();

        let report = news(&model, &params, &previous, &updated, 0, 4).unwrap();

        assert_eq!(report.n_revisions, 1);
        assert_eq!(report.updates.len(), 1);
        let update = &report.updates[0];
        assert_eq!((update.t, update.variable), (2, 0));
        assert!(update.news.abs() > 1e-8);

        for s in 0..report.n_impact_dates() {
            let additivity = report.prev_estimates[[s, 0]] + report.total_impacts[[s, 0]]
                - report.updated_estimates[[s, 0]];
            assert!(additivity.abs() < 1e-10, "additivity failed at row {s}: {additivity}");
            let identity = report.update_impacts[0][[s, 0]]
                - report.weights[0][[s, 0]] * update.news;
            assert!(identity.abs() < 1e-8, "weight identity failed at row {s}: {identity}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify dropping a previously observed value is rejected.
    //
    // Given
    // -----
    // - previous = [1.0, 2.0], updated = [1.0, NaN, 3.0].
    //
    // Expect
    // ------
    // - DroppedObservation { t: 1, variable: 0 }.
    fn dropped_observation_is_rejected() {
        let model = Ar1Model::new();
        let params = array![0.5, 1.0];
        let previous = SsmData::from_column(array![1.0, 2.0]).unwrap();
        let updated = SsmData::from_column(array![1.0, f64::NAN, 3.0]).unwrap();

        let err = news(&model, &params, &previous, &updated, 0, 3).unwrap_err();
        assert_eq!(err, SsmError::DroppedObservation { t: 1, variable: 0 });
    }
}
