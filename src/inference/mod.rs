//! inference — uncertainty quantification for fitted models.

pub mod hessian;
