//! Estimators for geometric models.
//!
//! Only the three-point plane estimator is provided.

pub mod plane;

pub use plane::PlaneEstimator;
