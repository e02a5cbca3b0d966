use crate::geometry::aabb::Aabb;
use crate::geometry::point::Point3d;
use crate::geometry::ray::Ray;
use crate::geometry::transform::{Placement, Transform};
use crate::geometry::vector::Vec3;
use crate::shapes::{MarkerKind, RenderData, RenderPrimitive};
use crate::store::ShapeId;

/// Half-extent of a control point's collider.
pub const CONTROL_POINT_SIZE: f64 = 0.2;

/// Palette slot shared by every control point.
pub const CONTROL_POINT_COLOR: usize = 0;

/// A draggable handle sitting on one corner of its parent shape.
///
/// The parent is referenced by key only; the corner index is the point's
/// position in the parent's control point list.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPoint {
    parent: ShapeId,
    placement: Placement,
    aabb: Aabb,
}

impl ControlPoint {
    pub fn new(parent: ShapeId, position: Point3d) -> Self {
        Self {
            parent,
            placement: Placement::at(position),
            aabb: Aabb::cube(Point3d::ORIGIN, CONTROL_POINT_SIZE),
        }
    }

    pub fn parent(&self) -> ShapeId {
        self.parent
    }

    pub fn position(&self) -> Point3d {
        self.placement.position()
    }

    /// Move the point alone. The parent is not told.
    pub fn nudge(&mut self, offset: Vec3) {
        self.placement.translate(offset);
    }

    /// Move the point onto `corner`, the parent's current world corner.
    pub fn update_position(&mut self, corner: Point3d) {
        let offset = corner - self.position();
        self.nudge(offset);
    }

    pub fn pick(&self, ray: &Ray, view: &Transform) -> Option<f64> {
        self.aabb.ray_hit(ray, &view.then(&self.placement.world()))
    }

    pub fn render_data(&self) -> RenderData {
        RenderData {
            transform: self.placement.world(),
            color_index: CONTROL_POINT_COLOR,
            primitives: vec![RenderPrimitive::Marker {
                kind: MarkerKind::Point,
                center: Point3d::ORIGIN,
                half_extent: CONTROL_POINT_SIZE,
            }],
        }
    }
}
