//! Plane estimator for 3D point clouds.

use crate::cloud::PointCloud;
use crate::core::Estimator;
use crate::models::Plane;

/// Plane estimator fitting `a·x + b·y + c·z + d = 0` through three points.
///
/// Collinear or repeated samples are not filtered out here; they yield a
/// degenerate plane that the scoring step treats as having no support.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaneEstimator;

impl PlaneEstimator {
    pub fn new() -> Self {
        Self
    }
}

impl Estimator for PlaneEstimator {
    type Model = Plane;

    fn sample_size(&self) -> usize {
        3 // A plane requires 3 points
    }

    fn estimate_model(&self, cloud: &PointCloud, sample: &[usize]) -> Plane {
        let p = cloud.as_slice();
        Plane::from_points(&p[sample[0]], &p[sample[1]], &p[sample[2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    #[test]
    fn estimates_plane_through_sampled_points() {
        let cloud = PointCloud::from_points([
            Point::new(0.0, 0.0, 1.0),
            Point::new(9.0, 9.0, 9.0),
            Point::new(1.0, 0.0, 1.0),
            Point::new(0.0, 1.0, 1.0),
        ])
        .unwrap();

        let plane = PlaneEstimator::new().estimate_model(&cloud, &[0, 2, 3]);
        assert!(!plane.is_degenerate());
        assert!(plane.distance_to(&Point::new(4.0, -2.0, 1.0)).unwrap() < 1e-12);
        assert_eq!(plane.point(1).unwrap(), Some(&Point::new(1.0, 0.0, 1.0)));
    }

    #[test]
    fn repeated_index_gives_degenerate_plane() {
        let cloud =
            PointCloud::from_points([Point::new(0.0, 0.0, 0.0), Point::new(1.0, 2.0, 3.0)])
                .unwrap();
        let plane = PlaneEstimator::new().estimate_model(&cloud, &[1, 1, 0]);
        assert!(plane.is_degenerate());
    }
}
