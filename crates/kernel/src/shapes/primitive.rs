use serde::{Deserialize, Serialize};

use super::{Editable, MarkerKind, Pick, RenderData, RenderPrimitive, expect_corners};
use crate::error::GeometryError;
use crate::geometry::aabb::Aabb;
use crate::geometry::point::Point3d;
use crate::geometry::ray::Ray;
use crate::geometry::transform::{Placement, Transform};
use crate::geometry::vector::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Point,
    Cube,
    Sphere,
}

impl PrimitiveKind {
    /// Half-extent of the collider around the local origin.
    pub fn half_extent(self) -> f64 {
        match self {
            PrimitiveKind::Point => 0.2,
            PrimitiveKind::Cube | PrimitiveKind::Sphere => 0.5,
        }
    }

    fn marker(self) -> MarkerKind {
        match self {
            PrimitiveKind::Point => MarkerKind::Point,
            PrimitiveKind::Cube => MarkerKind::Cube,
            PrimitiveKind::Sphere => MarkerKind::Sphere,
        }
    }
}

/// A solid marker picked through a box collider in its local space.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    kind: PrimitiveKind,
    placement: Placement,
    aabb: Aabb,
    color_index: usize,
}

impl Primitive {
    pub fn new(kind: PrimitiveKind, position: Point3d) -> Self {
        Self {
            kind,
            placement: Placement::at(position),
            aabb: Aabb::cube(Point3d::ORIGIN, kind.half_extent()),
            color_index: 0,
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn position(&self) -> Point3d {
        self.placement.position()
    }

    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }
}

impl Pick for Primitive {
    fn pick(&self, ray: &Ray, view: &Transform) -> Option<f64> {
        self.aabb.ray_hit(ray, &view.then(&self.placement.world()))
    }
}

impl Editable for Primitive {
    fn corners(&self) -> &[Point3d] {
        &[]
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn translate(&mut self, offset: Vec3) {
        self.placement.translate(offset);
    }

    /// Points keep their size.
    fn scale(&mut self, factor: f64) {
        if self.kind != PrimitiveKind::Point {
            self.placement.scale(factor);
        }
    }

    fn update_corners(&mut self, positions: &[Point3d]) -> Result<(), GeometryError> {
        expect_corners(positions, 0)
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
            primitives: vec![RenderPrimitive::Marker {
                kind: self.kind.marker(),
                center: Point3d::ORIGIN,
                half_extent: self.kind.half_extent(),
            }],
        }
    }
}
