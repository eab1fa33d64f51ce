//! Model dimensions for linear-Gaussian state-space systems.
//!
//! Purpose
//! -------
//! Provide a small validated container, [`SsmDims`], for the three dimension
//! counts every state-space model carries: observation variables, state
//! variables, and positive-definite state disturbances. Centralizing the
//! checks here lets the matrix container, filter, and models assume
//! consistent dimensions.
//!
//! Invariants & assumptions
//! ------------------------
//! - `k_endog >= 1`, `k_states >= 1`.
//! - `1 <= k_posdef <= k_states` (the selection matrix R maps the
//!   disturbance into the state space, so it can never be wider than the
//!   state).
use crate::statespace::errors::{SsmError, SsmResult};

/// Validated dimension triple for a state-space system.
///
/// Fields
/// ------
/// - `k_endog`: number of observed variables per time step.
/// - `k_states`: length of the state vector α_t.
/// - `k_posdef`: length of the state disturbance vector η_t.
///
/// Invariants
/// ----------
/// - All three are ≥ 1 and `k_posdef <= k_states`, enforced by
///   [`SsmDims::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SsmDims {
    /// Number of observed variables.
    pub k_endog: usize,
    /// State vector length.
    pub k_states: usize,
    /// State disturbance vector length.
    pub k_posdef: usize,
}

impl SsmDims {
    /// Construct a validated dimension triple.
    ///
    /// # Errors
    /// - [`SsmError::InvalidDims`] when any count is zero or when
    ///   `k_posdef > k_states`.
    pub fn new(k_endog: usize, k_states: usize, k_posdef: usize) -> SsmResult<Self> {
        if k_endog == 0 {
            return Err(SsmError::InvalidDims {
                field: "k_endog",
                value: k_endog,
                reason: "At least one observation variable is required.",
            });
        }
        if k_states == 0 {
            return Err(SsmError::InvalidDims {
                field: "k_states",
                value: k_states,
                reason: "At least one state variable is required.",
            });
        }
        if k_posdef == 0 {
            return Err(SsmError::InvalidDims {
                field: "k_posdef",
                value: k_posdef,
                reason: "At least one state disturbance is required.",
            });
        }
        if k_posdef > k_states {
            return Err(SsmError::InvalidDims {
                field: "k_posdef",
                value: k_posdef,
                reason: "State disturbance dimension cannot exceed the state dimension.",
            });
        }
        Ok(Self { k_endog, k_states, k_posdef })
    }
}
