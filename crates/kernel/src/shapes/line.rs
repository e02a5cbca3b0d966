use super::{Editable, Pick, RenderData, RenderPrimitive, expect_corners};
use crate::error::GeometryError;
use crate::geometry::aabb::Aabb;
use crate::geometry::point::Point3d;
use crate::geometry::ray::Ray;
use crate::geometry::transform::{Placement, Transform};
use crate::geometry::vector::Vec3;

/// Slack around the segment so a thin line stays pickable.
const PICK_PADDING: f64 = 0.1;

/// A segment between two control points.
///
/// The collider is kept in world coordinates and follows every edit.
#[derive(Debug, Clone, PartialEq)]
pub struct LineShape {
    corners: [Point3d; 2],
    placement: Placement,
    aabb: Aabb,
    color_index: usize,
}

impl LineShape {
    pub fn new(start: Point3d, end: Point3d) -> Self {
        let mut line = Self {
            corners: [start, end],
            placement: Placement::identity(),
            aabb: Aabb::new(start, end),
            color_index: 0,
        };
        line.update_aabb();
        line
    }

    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    pub fn midpoint(&self) -> Point3d {
        let [a, b] = self.corners;
        self.placement.apply(&a.midpoint(&b))
    }

    fn update_aabb(&mut self) {
        let world = self.world_corners();
        if let Some(aabb) = Aabb::from_points(&world, PICK_PADDING) {
            self.aabb = aabb;
        }
    }
}

impl Pick for LineShape {
    fn pick(&self, ray: &Ray, view: &Transform) -> Option<f64> {
        self.aabb.ray_hit(ray, view)
    }
}

impl Editable for LineShape {
    fn corners(&self) -> &[Point3d] {
        &self.corners
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn translate(&mut self, offset: Vec3) {
        self.placement.translate(offset);
        self.aabb.translate(offset);
    }

    fn scale(&mut self, factor: f64) {
        self.placement.scale(factor);
        self.update_aabb();
    }

    fn update_corners(&mut self, positions: &[Point3d]) -> Result<(), GeometryError> {
        expect_corners(positions, 2)?;
        self.corners = [positions[0], positions[1]];
        self.placement.reset();
        self.update_aabb();
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
            primitives: vec![RenderPrimitive::Lines(self.corners.to_vec())],
        }
    }
}
