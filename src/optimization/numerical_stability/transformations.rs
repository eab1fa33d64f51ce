//! Numerically guarded nonlinear transforms.
//!
//! The parameter transforms used by the state-space models are prone to
//! overflow/underflow when written naively. The functions here use explicit
//! cutoffs to keep `f64` arithmetic in a well-conditioned regime, following
//! the guarded strategies common in major ML libraries.
//!
//! # Provided items
//! - [`safe_softplus(x)`] / [`safe_softplus_inv(x)`]: map ℝ ↔ (0, ∞); used
//!   to keep variance parameters strictly positive.
//! - [`safe_logistic(x)`] / [`safe_logit(p)`]: map ℝ ↔ (0, 1); used to keep
//!   autoregressive coefficients inside the stationary region.
//! - [`EIGEN_EPS`]: eigenvalue truncation threshold for pseudoinverse-based
//!   standard errors.

/// Eigenvalues with magnitude at most this threshold are treated as
/// numerically zero when forming pseudoinverses of observed information
/// matrices.
pub const EIGEN_EPS: f64 = 1e-10;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// For sufficiently large `x`, `softplus(x) ≈ x + ln1p(exp(-x)) ≈ x`;
/// otherwise the direct `ln1p(exp(x))` form is used. The cutoff `x > 20.0`
/// keeps the calculation in a well-conditioned regime for `f64`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: solves `softplus(t) = x` for `t`,
/// i.e. `t = ln(exp(x) - 1)`.
///
/// Mirrors the guard in [`safe_softplus`]: for large `x` the result is `≈ x`;
/// otherwise `ln(expm1(x))` is used. Input must be finite and `> 0`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Numerically stable logistic function `σ(x) = 1 / (1 + exp(-x))`.
///
/// Evaluated via `exp` of the negative magnitude so the exponential never
/// overflows for any finite input.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        let e = (-x).exp();
        1.0 / (1.0 + e)
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Inverse of the logistic function on `(0, 1)`: `logit(p) = ln(p / (1 - p))`.
///
/// Input must lie strictly inside the unit interval; the caller is expected
/// to keep constrained parameters away from the boundary.
pub fn safe_logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}
