//! Core shared types for plane extraction.
//!
//! Points are plain `nalgebra` points so callers can feed clouds produced by
//! other `nalgebra`-based code without conversion.

use nalgebra::{Point3, Vector3};

/// A point in 3D space. Compared by value.
pub type Point = Point3<f64>;

/// Free 3D vector, used for plane normals and edge vectors.
pub type Vector = Vector3<f64>;
