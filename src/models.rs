//! Geometric models produced by the plane estimator.
//!
//! Only one model lives here: an implicit plane `a·x + b·y + c·z + d = 0`.
//! Planes built from three sample points remember those points so a caller
//! can trace a detection back to the triple that produced it.

use crate::error::RansacError;
use crate::types::{Point, Vector};

/// Plane in implicit form `a·x + b·y + c·z + d = 0`.
///
/// `(a, b, c)` is a (not necessarily unit) normal vector. Nothing prevents it
/// from being zero: a collinear or repeated sample produces such a plane, and
/// [`Plane::distance_to`] reports it as [`RansacError::DegeneratePlane`].
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    source: Option<[Point; 3]>,
}

impl Plane {
    /// Derive the plane through three points.
    ///
    /// The normal is the cross product of the edge vectors `p1 - p2` and
    /// `p1 - p3`; `d` follows by substituting `p1`. The points are not checked
    /// for collinearity.
    pub fn from_points(p1: &Point, p2: &Point, p3: &Point) -> Self {
        let u = p1 - p2;
        let v = p1 - p3;
        let n = u.cross(&v);
        let d = -n.dot(&p1.coords);

        Self {
            a: n.x,
            b: n.y,
            c: n.z,
            d,
            source: Some([*p1, *p2, *p3]),
        }
    }

    /// Build a plane directly from its four coefficients. No validation.
    pub fn from_coefficients(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            a,
            b,
            c,
            d,
            source: None,
        }
    }

    /// Coefficients `[a, b, c, d]`.
    pub fn coefficients(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// The raw normal `(a, b, c)`.
    pub fn normal(&self) -> Vector {
        Vector::new(self.a, self.b, self.c)
    }

    /// The normal scaled to unit length, or `None` for a degenerate plane.
    pub fn unit_normal(&self) -> Option<Vector> {
        if self.is_degenerate() {
            return None;
        }
        Some(self.normal().normalize())
    }

    /// Whether the normal is exactly the zero vector (or not finite).
    ///
    /// No tolerance is applied; the normal's length scales with the square of
    /// the coordinate units.
    pub fn is_degenerate(&self) -> bool {
        let norm = self.normal().norm();
        !norm.is_finite() || norm == 0.0
    }

    /// One of the three points the plane was derived from.
    ///
    /// Returns `Ok(None)` for planes built from coefficients.
    pub fn point(&self, index: usize) -> Result<Option<&Point>, RansacError> {
        if index > 2 {
            return Err(RansacError::PointIndexOutOfRange { index, len: 3 });
        }
        Ok(self.source.as_ref().map(|pts| &pts[index]))
    }

    /// Perpendicular distance from `point` to the plane.
    ///
    /// `|a·x + b·y + c·z + d| / sqrt(a² + b² + c²)`. Fails instead of dividing
    /// by zero when the plane is degenerate.
    pub fn distance_to(&self, point: &Point) -> Result<f64, RansacError> {
        if self.is_degenerate() {
            return Err(RansacError::DegeneratePlane);
        }
        Ok(self.signed_offset(point).abs() / self.normal().norm())
    }

    #[inline]
    fn signed_offset(&self, p: &Point) -> f64 {
        self.a * p.x + self.b * p.y + self.c * p.z + self.d
    }
}
