use super::point::{Point2d, Point3d};
use super::vector::{Vec2, Vec3};
use crate::error::GeometryError;

/// Orthonormal 2D parametrization of a plane.
///
/// `x_axis` follows an edge of the plane, `y_axis = normal x x_axis`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalCoordinateSystem {
    origin: Point3d,
    x_axis: Vec3,
    y_axis: Vec3,
}

impl LocalCoordinateSystem {
    pub fn new(edge: Vec3, normal: Vec3, origin: Point3d) -> Result<Self, GeometryError> {
        let x_axis = edge
            .normalized()
            .ok_or(GeometryError::Degenerate { what: "zero-length edge" })?;
        let y_axis = normal
            .cross(&x_axis)
            .normalized()
            .ok_or(GeometryError::Degenerate {
                what: "normal parallel to edge",
            })?;
        Ok(Self {
            origin,
            x_axis,
            y_axis,
        })
    }

    pub fn x_axis(&self) -> Vec3 {
        self.x_axis
    }

    pub fn y_axis(&self) -> Vec3 {
        self.y_axis
    }

    pub fn to_local(&self, p: &Point3d) -> Point2d {
        let rel = *p - self.origin;
        Point2d::new(rel.dot(&self.x_axis), rel.dot(&self.y_axis))
    }

    pub fn to_global(&self, q: &Point2d) -> Point3d {
        self.origin + self.x_axis * q.x + self.y_axis * q.y
    }

    /// Project a direction; the origin does not take part.
    pub fn direction_to_local(&self, v: &Vec3) -> Vec2 {
        Vec2::new(v.dot(&self.x_axis), v.dot(&self.y_axis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_xz_plane_axes() {
        let lcs = LocalCoordinateSystem::new(Vec3::X, Vec3::new(0.0, -1.0, 0.0), Point3d::ORIGIN)
            .unwrap();
        assert_abs_diff_eq!(lcs.x_axis(), Vec3::X, epsilon = 1e-12);
        assert_abs_diff_eq!(lcs.y_axis(), Vec3::Z, epsilon = 1e-12);
    }

    #[test]
    fn test_round_trip_on_plane() {
        let origin = Point3d::new(1.0, 2.0, 3.0);
        let lcs = LocalCoordinateSystem::new(Vec3::new(1.0, 1.0, 0.0), Vec3::Z, origin).unwrap();
        let p = origin + lcs.x_axis() * 0.7 + lcs.y_axis() * -2.5;
        let q = lcs.to_local(&p);
        assert_abs_diff_eq!(q, Point2d::new(0.7, -2.5), epsilon = 1e-12);
        assert_abs_diff_eq!(lcs.to_global(&q), p, epsilon = 1e-12);
    }

    #[test]
    fn test_direction_ignores_origin() {
        let lcs = LocalCoordinateSystem::new(Vec3::X, Vec3::Z, Point3d::new(5.0, 5.0, 0.0))
            .unwrap();
        assert_abs_diff_eq!(
            lcs.direction_to_local(&Vec3::new(2.0, 3.0, 0.0)),
            Vec2::new(2.0, 3.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(
            LocalCoordinateSystem::new(Vec3::ZERO, Vec3::Z, Point3d::ORIGIN),
            Err(GeometryError::Degenerate { .. })
        ));
        assert!(matches!(
            LocalCoordinateSystem::new(Vec3::X, Vec3::X * 2.0, Point3d::ORIGIN),
            Err(GeometryError::Degenerate { .. })
        ));
    }
}
