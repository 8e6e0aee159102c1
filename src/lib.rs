//! # plane-ransac - Dominant plane extraction with RANSAC
//!
//! `plane-ransac` finds the planar surfaces that explain most of an
//! unstructured 3D point cloud (ground, walls, table tops in LiDAR or depth
//! scans) and strips them off one at a time.
//!
//! Each pass draws random point triples, derives the plane through each
//! triple, counts the points closer than `epsilon` to it, and keeps the plane
//! with the largest support. The number of trials per pass follows from a
//! desired confidence and an assumed inlier ratio. The winning support is then
//! removed from the working cloud and the next pass runs on what is left.
//!
//! ## Quick Start
//!
//! ```rust
//! use plane_ransac::{PointCloud, RansacPlaneExtractor, RansacSettings};
//! use plane_ransac::types::Point;
//!
//! // A floor (z = 0) and a wall (x = 0).
//! let mut cloud = PointCloud::new();
//! for i in 0..8 {
//!     for j in 0..8 {
//!         cloud.add(Point::new(1.0 + i as f64, j as f64, 0.0)).unwrap();
//!         cloud.add(Point::new(0.0, j as f64, 1.0 + i as f64 * 0.5)).unwrap();
//!     }
//! }
//!
//! let settings = RansacSettings::default().with_seed(42);
//! let mut extractor = RansacPlaneExtractor::new(&mut cloud, settings).unwrap();
//! let planes = extractor.run(2, 0.1).unwrap();
//!
//! assert_eq!(planes.len(), 2);
//! assert!(extractor.residual().is_empty());
//! ```
//!
//! ## Extending the Library
//!
//! The single-pass loop in [`core`] is generic over three traits:
//!
//! - **[`Estimator`](core::Estimator)**: builds a model from a minimal sample
//! - **[`Sampler`](core::Sampler)**: draws minimal samples from the cloud
//! - **[`Scoring<M>`](core::Scoring)**: counts a model's support
//!
//! [`RansacPlaneExtractor::with_sampler`] accepts any [`Sampler`](core::Sampler),
//! and runs can be cut short with a
//! [`StoppingCriterion`](extractor::StoppingCriterion).
//!
//! ## Modules
//!
//! - **[`cloud`]**: the mutable point container
//! - **[`core`]**: traits, iteration-count estimate, single-pass loop
//! - **[`extractor`]**: multi-pass dominant plane extraction
//! - **[`estimators`]**, **[`samplers`]**, **[`scoring`]**: built-in components
//! - **[`models`]**: the `Plane` model
//! - **[`settings`]**: configuration, loadable from TOML
//! - **[`xyz`]**: XYZ file input/output

pub mod cloud;
pub mod core;
pub mod error;
pub mod estimators;
pub mod extractor;
pub mod models;
pub mod samplers;
pub mod scoring;
pub mod settings;
pub mod types;
pub mod utils;
pub mod xyz;

pub use cloud::PointCloud;
pub use core::{estimate_iteration_count, Estimator, Sampler, Scoring};
pub use error::{RansacError, SettingsError, XyzError};
pub use extractor::{MinSupport, PlaneDetection, RansacPlaneExtractor, StoppingCriterion};
pub use models::Plane;
pub use settings::RansacSettings;
pub use xyz::{read_xyz, write_xyz};
