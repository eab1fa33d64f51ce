//! statespace — linear-Gaussian state-space modeling.
//!
//! Purpose
//! -------
//! Provide the crate's core functionality: validated containers and the
//! Kalman filter recursion ([`core`]), the model capability trait
//! ([`model::StateSpace`]) with concrete implementations ([`models`]),
//! maximum-likelihood estimation ([`estimate`]), and the forecast-news
//! decomposition ([`news`]).
//!
//! Key behaviors
//! -------------
//! - One generic filter/estimation driver serves every model; models only
//!   declare matrices, transforms, start values, and initialization.
//! - Missing data (NaN markers) is handled inside the filter; callers never
//!   special-case gaps.
//! - Scale concentration removes one variance from the numerical search
//!   when a model opts in, with the analytic scale reported alongside the
//!   concentrated likelihood.
//!
//! Downstream usage
//! ----------------
//! - Fit a model with [`estimate::fit`], inspect the returned
//!   [`estimate::FittedModel`], forecast with its `forecast` method, and
//!   feed its parameters into [`news::news`] when an updated dataset
//!   arrives.

pub mod core;
pub mod errors;
pub mod estimate;
pub mod model;
pub mod models;
pub mod news;
