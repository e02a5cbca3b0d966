use super::{Editable, Pick, RenderData, RenderPrimitive, expect_corners};
use crate::error::GeometryError;
use crate::geometry::intersection::plane_normal;
use crate::geometry::point::Point3d;
use crate::geometry::ray::Ray;
use crate::geometry::transform::{Placement, Transform};
use crate::geometry::vector::Vec3;

/// Points and segments recorded by a dissection, in world coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugMarkers {
    pub points: Vec<Point3d>,
    pub lines: Vec<[Point3d; 2]>,
}

/// A planar quadrilateral.
///
/// Corners are laid out as a triangle strip: `c0 c1` along one side and
/// `c2 c3` along the opposite one, walked as a polygon in the order
/// [`super::WINDING`]. Picking tests the polygon directly, without a box
/// collider.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneShape {
    corners: [Point3d; 4],
    placement: Placement,
    debug: DebugMarkers,
    color_index: usize,
}

impl PlaneShape {
    pub fn new(corners: [Point3d; 4]) -> Self {
        Self {
            corners,
            placement: Placement::identity(),
            debug: DebugMarkers::default(),
            color_index: 0,
        }
    }

    /// Rectangle around the centroid of three points, lying in their plane.
    ///
    /// Width is `|p2 - p1|`, height the distance from `p3` to the midpoint
    /// of `p1 p2`, both multiplied by `scale`.
    pub fn from_three_points(
        p1: Point3d,
        p2: Point3d,
        p3: Point3d,
        scale: f64,
    ) -> Result<Self, GeometryError> {
        let normal = (p2 - p1)
            .cross(&(p3 - p1))
            .normalized()
            .ok_or(GeometryError::Degenerate {
                what: "collinear points",
            })?;
        let center = Point3d::centroid(&[p1, p2, p3]);

        let tangent = normal
            .cross(&Vec3::X)
            .normalized()
            .or_else(|| normal.cross(&Vec3::Y).normalized())
            .ok_or(GeometryError::Degenerate {
                what: "no tangent for plane normal",
            })?;
        let bitangent = normal.cross(&tangent);

        let half_width = p1.distance_to(&p2) * scale / 2.0;
        let half_height = p3.distance_to(&p1.midpoint(&p2)) * scale / 2.0;
        let corner = |u: f64, v: f64| center + tangent * (u * half_width) + bitangent * (v * half_height);

        Ok(Self::new([
            corner(-1.0, 1.0),
            corner(1.0, 1.0),
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
        ]))
    }

    /// World-space normal `(c1 - c0) x (c2 - c0)`, unnormalized.
    pub fn normal(&self) -> Vec3 {
        let world = self.world_corners();
        (world[1] - world[0]).cross(&(world[2] - world[0]))
    }

    pub fn debug_markers(&self) -> &DebugMarkers {
        &self.debug
    }

    pub(crate) fn debug_markers_mut(&mut self) -> &mut DebugMarkers {
        &mut self.debug
    }

    /// Install world corners and drop the placement.
    pub(crate) fn replace_corners(&mut self, corners: [Point3d; 4]) {
        self.corners = corners;
        self.placement.reset();
    }

    /// Whether a point of the plane falls inside the parallelogram
    /// spanned by `c1 - c0` and `c2 - c0`.
    pub fn is_point_inside(&self, point: &Point3d) -> bool {
        let world = self.world_corners();
        let edge1 = world[1] - world[0];
        let edge2 = world[2] - world[0];
        let len1 = edge1.length_squared();
        let len2 = edge2.length_squared();
        if len1 == 0.0 || len2 == 0.0 {
            return false;
        }
        let rel = *point - world[0];
        let u = rel.dot(&edge1) / len1;
        let v = rel.dot(&edge2) / len2;
        (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v)
    }
}

impl Pick for PlaneShape {
    fn pick(&self, ray: &Ray, view: &Transform) -> Option<f64> {
        let local = ray.to_local(view)?;
        let world = self.world_corners();
        let normal = plane_normal(&world).ok()?;

        let denom = local.direction.dot(&normal);
        if denom.abs() < 1e-15 {
            return None;
        }
        let t = (world[0] - local.origin).dot(&normal) / denom;
        if t < 0.0 {
            return None;
        }
        let hit = local.at(t);
        if !self.is_point_inside(&hit) {
            return None;
        }
        Some(ray.origin.distance_to(&view.transform_point(&hit)))
    }
}

impl Editable for PlaneShape {
    fn corners(&self) -> &[Point3d] {
        &self.corners
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn translate(&mut self, offset: Vec3) {
        self.placement.translate(offset);
    }

    fn scale(&mut self, factor: f64) {
        self.placement.scale(factor);
    }

    fn update_corners(&mut self, positions: &[Point3d]) -> Result<(), GeometryError> {
        expect_corners(positions, 4)?;
        self.replace_corners([positions[0], positions[1], positions[2], positions[3]]);
        Ok(())
    }

    fn color_index(&self) -> usize {
        self.color_index
    }

    fn set_color_index(&mut self, index: usize) {
        self.color_index = index;
    }

    fn render_data(&self) -> RenderData {
        RenderData {
            transform: self.placement.world(),
            color_index: self.color_index,
            primitives: vec![RenderPrimitive::TriangleStrip(self.corners.to_vec())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_xy() -> PlaneShape {
        PlaneShape::new([
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
            Point3d::new(1.0, 1.0, 0.0),
        ])
    }

    #[test]
    fn test_pick_inside_and_outside() {
        let plane = unit_xy();
        let down = Ray::new(Point3d::new(0.25, 0.75, 3.0), -Vec3::Z);
        let d = plane.pick(&down, &Transform::identity()).unwrap();
        assert!((d - 3.0).abs() < 1e-12);

        let beside = Ray::new(Point3d::new(1.5, 0.5, 3.0), -Vec3::Z);
        assert!(plane.pick(&beside, &Transform::identity()).is_none());

        let behind = Ray::new(Point3d::new(0.5, 0.5, 3.0), Vec3::Z);
        assert!(plane.pick(&behind, &Transform::identity()).is_none());
    }

    #[test]
    fn test_pick_follows_translation() {
        let mut plane = unit_xy();
        plane.translate(Vec3::new(0.0, 0.0, -2.0));
        let ray = Ray::new(Point3d::new(0.5, 0.5, 3.0), -Vec3::Z);
        let d = plane.pick(&ray, &Transform::identity()).unwrap();
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_pick_through_view() {
        let plane = unit_xy();
        let view = Transform::translation(0.0, 0.0, -4.0);
        let ray = Ray::new(Point3d::new(0.5, 0.5, 0.0), -Vec3::Z);
        let d = plane.pick(&ray, &view).unwrap();
        assert!((d - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_three_points_rectangle() {
        let plane = PlaneShape::from_three_points(
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(2.0, 0.0, 0.0),
            Point3d::new(1.0, 3.0, 0.0),
            1.0,
        )
        .unwrap();
        let c = plane.corners();
        let center = Point3d::centroid(c);
        assert_abs_diff_eq!(center, Point3d::new(1.0, 1.0, 0.0), epsilon = 1e-12);
        assert!((c[0].distance_to(&c[1]) - 2.0).abs() < 1e-12);
        assert!((c[0].distance_to(&c[2]) - 3.0).abs() < 1e-12);
        for corner in c {
            assert!(corner.z.abs() < 1e-12);
        }
        assert!(plane.normal().cross(&Vec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_from_collinear_points_fails() {
        let err = PlaneShape::from_three_points(
            Point3d::ORIGIN,
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(2.0, 0.0, 0.0),
            1.0,
        )
        .unwrap_err();
        assert!(matches!(err, GeometryError::Degenerate { .. }));
    }

    #[test]
    fn test_update_corners_resets_placement() {
        let mut plane = unit_xy();
        plane.scale(3.0);
        let moved = [
            Point3d::new(0.0, 0.0, 1.0),
            Point3d::new(1.0, 0.0, 1.0),
            Point3d::new(0.0, 1.0, 1.0),
            Point3d::new(1.0, 1.0, 1.0),
        ];
        plane.update_corners(&moved).unwrap();
        assert!(plane.placement().is_baked());
        assert_eq!(plane.world_corners(), moved.to_vec());
    }
}
