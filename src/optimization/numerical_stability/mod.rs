//! Numerical stability helpers shared by the model and inference layers.

pub mod transformations;
