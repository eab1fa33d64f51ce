//! statespace::core — containers and recursions shared by all models.
//!
//! Purpose
//! -------
//! Collect the building blocks of the state-space layer: validated
//! dimensions ([`dims::SsmDims`]), observation data with first-class missing
//! values ([`data::SsmData`]), the structural matrices
//! ([`matrices::SystemMatrices`]), initialization policies
//! ([`init::Initialization`]), the Kalman filter recursion
//! ([`filter::KalmanFilter`] / [`filter::FilterResults`]), and out-of-sample
//! forecasting ([`forecasts`]).
//!
//! Downstream usage
//! ----------------
//! - Concrete models build their skeletons from [`matrices::SystemMatrices`]
//!   and pick an [`init::Initialization`] policy.
//! - The estimation driver and news decomposition consume
//!   [`filter::FilterResults`]; neither mutates it.

pub mod data;
pub mod dims;
pub mod filter;
pub mod forecasts;
pub mod init;
pub mod matrices;
