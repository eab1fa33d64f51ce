//! statespace::models — concrete model definitions.
//!
//! Each model implements the [`StateSpace`](crate::statespace::model::StateSpace)
//! capability trait: a matrix skeleton, the ψ → (Z, H, T, R, Q) mapping, the
//! constrained ↔ unconstrained transform pair, moment-based start values,
//! and an initialization policy appropriate to the model's stationarity.

pub mod ar1;
pub mod local_level;
pub mod local_trend;

use crate::statespace::core::data::SsmData;

/// Sample variance of the observed (non-missing) entries of one variable,
/// with a unit fallback for degenerate inputs. Used by start-parameter
/// heuristics, which must not return zeros for variance parameters.
pub(crate) fn observed_variance(data: &SsmData, variable: usize) -> f64 {
    let values: Vec<f64> =
        data.endog.column(variable).iter().copied().filter(|v| v.is_finite()).collect();
    if values.len() < 2 {
        return 1.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
    if var.is_finite() && var > 0.0 { var } else { 1.0 }
}

/// First-order sample autocorrelation of the observed entries of one
/// variable, clamped away from ±1. Missing-adjacent pairs are skipped.
pub(crate) fn observed_autocorrelation(data: &SsmData, variable: usize) -> f64 {
    let col = data.endog.column(variable);
    let values: Vec<f64> = col.iter().copied().collect();
    let observed: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if observed.len() < 3 {
        return 0.0;
    }
    let mean = observed.iter().sum::<f64>() / observed.len() as f64;
    let mut num = 0.0;
    let mut den = 0.0;
    for v in &observed {
        den += (v - mean) * (v - mean);
    }
    for t in 1..values.len() {
        if values[t].is_finite() && values[t - 1].is_finite() {
            num += (values[t] - mean) * (values[t - 1] - mean);
        }
    }
    if den <= 0.0 {
        return 0.0;
    }
    (num / den).clamp(-0.97, 0.97)
}
