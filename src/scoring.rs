//! Scoring primitives.
//!
//! RANSAC-style inlier counting against the point-to-plane distance.

use crate::cloud::PointCloud;
use crate::core::Scoring;
use crate::models::Plane;

/// Support of a hypothesis: the number of inliers it explains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score {
    pub inlier_count: usize,
}

impl Score {
    pub fn new(inlier_count: usize) -> Self {
        Self { inlier_count }
    }
}

/// Counts the points lying strictly closer than `threshold` to a plane.
#[derive(Debug, Clone, Copy)]
pub struct PlaneDistanceScoring {
    threshold: f64,
}

impl PlaneDistanceScoring {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Scoring<Plane> for PlaneDistanceScoring {
    type Score = Score;

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn score(&self, cloud: &PointCloud, model: &Plane, inliers_out: &mut Vec<usize>) -> Score {
        inliers_out.clear();

        // A zero normal has no defined distance; it explains nothing.
        if model.is_degenerate() {
            return Score::default();
        }

        for (i, point) in cloud.iter().enumerate() {
            match model.distance_to(point) {
                Ok(dist) if dist < self.threshold => inliers_out.push(i),
                _ => {}
            }
        }

        Score::new(inliers_out.len())
    }
}
