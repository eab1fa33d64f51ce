//! L-BFGS solver construction helpers.
//!
//! These builders hide argmin's generic wiring: they pair an L-BFGS solver
//! with the requested line search, apply the crate-level history size and
//! tolerance options, and hand back a ready-to-run solver. The initial
//! parameter vector and iteration cap are runtime concerns applied by the
//! runner, not here, which keeps the builders side-effect free.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// Construct an L-BFGS solver with Hager–Zhang line search.
///
/// Consults `opts.lbfgs_mem` (falling back to [`DEFAULT_LBFGS_MEM`]) and
/// wires any present tolerances through [`configure_lbfgs`].
///
/// # Errors
/// Propagates argmin configuration errors (e.g. a tolerance it rejects) via
/// the crate's `From<argmin::core::Error>` conversion.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let linesearch = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(linesearch, mem), opts)
}

/// Construct an L-BFGS solver with More–Thuente line search.
///
/// Same contract as [`build_optimizer_hager_zhang`] with the alternate line
/// search.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let linesearch = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(linesearch, mem), opts)
}

/// Apply optional tolerances from [`MLEOptions`] to an L-BFGS solver.
///
/// Generic over the line-search type so both builders share one wiring
/// function. When a tolerance is `None` the corresponding `with_tolerance_*`
/// call is skipped and argmin's default remains in effect.
///
/// # Errors
/// Propagates argmin errors from `with_tolerance_grad` / `with_tolerance_cost`.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
