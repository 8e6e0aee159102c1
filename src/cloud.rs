//! Mutable, ordered point cloud.
//!
//! A `PointCloud` is a plain membership container: it validates insertions,
//! removes points that are known to be present, and hands out uniformly random
//! members. The optional name is only used to derive output file names.

use crate::error::RansacError;
use crate::types::Point;
use crate::utils::UniformRandomGenerator;

/// Ordered collection of points with an optional name.
///
/// The working cloud and each pass's support set are distinct instances.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    points: Vec<Point>,
    name: Option<String>,
}

impl PointCloud {
    /// Empty, unnamed cloud.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty cloud carrying `name`.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            points: Vec::new(),
            name: Some(name.into()),
        }
    }

    /// Empty cloud with room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            name: None,
        }
    }

    /// Build a cloud from points, validating each one.
    pub fn from_points<I>(points: I) -> Result<Self, RansacError>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut cloud = Self::new();
        for p in points {
            cloud.add(p)?;
        }
        Ok(cloud)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Append a point.
    ///
    /// Points with a NaN or infinite coordinate are rejected; they would
    /// poison every distance computed against them.
    pub fn add(&mut self, point: Point) -> Result<(), RansacError> {
        if !(point.x.is_finite() && point.y.is_finite() && point.z.is_finite()) {
            return Err(RansacError::InvalidPoint {
                x: point.x,
                y: point.y,
                z: point.z,
            });
        }
        self.points.push(point);
        Ok(())
    }

    /// Remove the first point equal to `point`.
    ///
    /// Callers only remove points they found in this cloud, so a miss is
    /// reported as an error rather than ignored.
    pub fn remove(&mut self, point: &Point) -> Result<Point, RansacError> {
        match self.points.iter().position(|p| p == point) {
            Some(idx) => Ok(self.points.remove(idx)),
            None => Err(RansacError::PointNotFound {
                x: point.x,
                y: point.y,
                z: point.z,
            }),
        }
    }

    /// Remove every position listed in `indices` in a single pass.
    ///
    /// Survivors keep their relative order. Indices may come in any order but
    /// must be in range and unique; otherwise nothing is removed.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Result<(), RansacError> {
        let len = self.points.len();
        let mut doomed = vec![false; len];
        for &index in indices {
            match doomed.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(RansacError::PointIndexOutOfRange { index, len }),
            }
        }

        let mut position = 0;
        self.points.retain(|_| {
            let keep = !doomed[position];
            position += 1;
            keep
        });
        Ok(())
    }

    /// Position of a uniformly random point.
    pub fn sample_index(&self, rng: &mut UniformRandomGenerator) -> Result<usize, RansacError> {
        if self.points.is_empty() {
            return Err(RansacError::EmptyCloud);
        }
        Ok(rng.next_index(self.points.len()))
    }

    /// A uniformly random point.
    pub fn sample_one(&self, rng: &mut UniformRandomGenerator) -> Result<&Point, RansacError> {
        let idx = self.sample_index(rng)?;
        Ok(&self.points[idx])
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Forward pass over the points in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud_of(n: usize) -> PointCloud {
        PointCloud::from_points((0..n).map(|i| Point::new(i as f64, 0.0, 0.0))).unwrap()
    }

    #[test]
    fn add_rejects_non_finite_points() {
        let mut cloud = PointCloud::new();
        assert!(cloud.add(Point::new(1.0, 2.0, 3.0)).is_ok());
        assert!(matches!(
            cloud.add(Point::new(f64::NAN, 0.0, 0.0)),
            Err(RansacError::InvalidPoint { .. })
        ));
        assert!(cloud.add(Point::new(0.0, f64::INFINITY, 0.0)).is_err());
        assert_eq!(cloud.len(), 1);
    }

    #[test]
    fn remove_takes_first_match_and_fails_on_miss() {
        let dup = Point::new(1.0, 1.0, 1.0);
        let mut cloud =
            PointCloud::from_points([dup, Point::new(2.0, 0.0, 0.0), dup]).unwrap();

        assert_eq!(cloud.remove(&dup).unwrap(), dup);
        assert_eq!(cloud.as_slice(), &[Point::new(2.0, 0.0, 0.0), dup]);

        let missing = Point::new(9.0, 9.0, 9.0);
        assert!(matches!(
            cloud.remove(&missing),
            Err(RansacError::PointNotFound { .. })
        ));
        assert_eq!(cloud.len(), 2);
    }

    #[test]
    fn remove_indices_preserves_survivor_order() {
        let mut cloud = cloud_of(6);
        cloud.remove_indices(&[4, 0, 2]).unwrap();
        let xs: Vec<f64> = cloud.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn remove_indices_rejects_bad_input_without_mutating() {
        let mut cloud = cloud_of(3);
        assert!(matches!(
            cloud.remove_indices(&[0, 3]),
            Err(RansacError::PointIndexOutOfRange { index: 3, len: 3 })
        ));
        assert!(cloud.remove_indices(&[1, 1]).is_err());
        assert_eq!(cloud.len(), 3);
    }

    #[test]
    fn sampling_an_empty_cloud_fails() {
        let cloud = PointCloud::new();
        let mut rng = UniformRandomGenerator::from_seed(1);
        assert_eq!(cloud.sample_one(&mut rng), Err(RansacError::EmptyCloud));
    }

    #[test]
    fn sampling_returns_members() {
        let cloud = cloud_of(10);
        let mut rng = UniformRandomGenerator::from_seed(3);
        for _ in 0..50 {
            let p = cloud.sample_one(&mut rng).unwrap();
            assert!(cloud.iter().any(|q| q == p));
        }
    }

    #[test]
    fn name_round_trips() {
        let mut cloud = PointCloud::with_name("scan");
        assert_eq!(cloud.name(), Some("scan"));
        cloud.set_name("other");
        assert_eq!(cloud.name(), Some("other"));
        assert_eq!(PointCloud::new().name(), None);
    }
}
