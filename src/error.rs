//! Error types for plane extraction and XYZ I/O.

use thiserror::Error;

use crate::extractor::PlaneDetection;

/// Failures raised by the point cloud, plane and RANSAC layers.
///
/// Per-trial degeneracies never show up here: a collinear sample simply scores
/// zero. These variants are precondition violations that abort the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RansacError {
    #[error("cannot sample from an empty point cloud")]
    EmptyCloud,

    #[error("point ({x}, {y}, {z}) has a non-finite coordinate")]
    InvalidPoint { x: f64, y: f64, z: f64 },

    #[error("point ({x}, {y}, {z}) is not part of the cloud")]
    PointNotFound { x: f64, y: f64, z: f64 },

    #[error("point index {index} is out of range (len {len})")]
    PointIndexOutOfRange { index: usize, len: usize },

    #[error("plane normal is the zero vector; distance is undefined")]
    DegeneratePlane,

    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A multi-pass run failed after earlier passes had already removed their
    /// support from the working cloud. Those detections are handed back here;
    /// the working cloud holds exactly what they did not claim.
    #[error("pass {pass} failed after {} plane(s) were extracted: {cause}", completed.len())]
    RunAborted {
        pass: usize,
        completed: Vec<PlaneDetection>,
        #[source]
        cause: Box<RansacError>,
    },
}

impl RansacError {
    /// Detections that were completed before the failure, if any.
    pub fn completed(&self) -> &[PlaneDetection] {
        match self {
            RansacError::RunAborted { completed, .. } => completed,
            _ => &[],
        }
    }
}

/// Failures raised while reading or writing XYZ files.
#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid cloud contents: {0}")]
    Cloud(#[from] RansacError),
}

/// Failures raised while loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}
