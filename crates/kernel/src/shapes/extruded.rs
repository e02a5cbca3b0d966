use super::plane::PlaneShape;
use super::{Editable, Pick, RenderData, RenderPrimitive, WINDING, expect_corners};
use crate::error::GeometryError;
use crate::geometry::point::Point3d;
use crate::geometry::ray::Ray;
use crate::geometry::transform::{Placement, Transform};
use crate::geometry::vector::Vec3;

/// A quadrilateral pushed along its normal into a six-faced solid.
///
/// Corners `0..4` are the base, `4..8` the top, with `4 + i` above `i`.
/// Faces are derived from the corners and rebuilt after every edit; edits
/// are baked straight into the corners.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrudedPolygon {
    corners: [Point3d; 8],
    placement: Placement,
    faces: Vec<PlaneShape>,
    color_index: usize,
}

impl ExtrudedPolygon {
    /// Extrude `base` by `height` along the inward winding normal.
    pub fn from_plane(base: &PlaneShape, height: f64) -> Result<Self, GeometryError> {
        let world = base.world_corners();
        expect_corners(&world, 4)?;

        let mut corners = [Point3d::ORIGIN; 8];
        corners[..4].copy_from_slice(&world);
        for (k, &node) in WINDING.iter().enumerate() {
            let v = world[node];
            let next = world[WINDING[(k + 1) % 4]];
            let prev = world[WINDING[(k + 3) % 4]];
            let normal = (next - v)
                .cross(&(prev - v))
                .normalized()
                .ok_or(GeometryError::Degenerate {
                    what: "base corner without a normal",
                })?;
            corners[4 + node] = v - normal * height;
        }
        Ok(Self::from_corners(corners))
    }

    /// Rebuild a solid from its eight world corners.
    pub fn from_corners(corners: [Point3d; 8]) -> Self {
        let mut solid = Self {
            corners,
            placement: Placement::identity(),
            faces: Vec::with_capacity(6),
            color_index: 0,
        };
        solid.update_planes();
        solid
    }

    /// Four sides in winding order, then bottom, then top.
    pub fn faces(&self) -> &[PlaneShape] {
        &self.faces
    }

    fn update_planes(&mut self) {
        let c = self.world_corners();
        self.faces.clear();
        for (k, &i) in WINDING.iter().enumerate() {
            let j = WINDING[(k + 1) % 4];
            self.faces.push(PlaneShape::new([c[i], c[j], c[4 + i], c[4 + j]]));
        }
        self.faces.push(PlaneShape::new([c[0], c[1], c[2], c[3]]));
        self.faces.push(PlaneShape::new([c[4], c[5], c[6], c[7]]));
    }

    fn bake(&mut self) {
        self.placement.bake(&mut self.corners);
        self.update_planes();
    }

    fn edges(&self) -> Vec<Point3d> {
        let c = &self.corners;
        let mut lines = Vec::with_capacity(24);
        for i in 0..4 {
            lines.extend([c[i], c[4 + i]]);
        }
        for (k, &i) in WINDING.iter().enumerate() {
            let j = WINDING[(k + 1) % 4];
            lines.extend([c[i], c[j], c[4 + i], c[4 + j]]);
        }
        lines
    }
}

impl Pick for ExtrudedPolygon {
    fn pick(&self, ray: &Ray, view: &Transform) -> Option<f64> {
        self.faces
            .iter()
            .filter_map(|face| face.pick(ray, view))
            .min_by(f64::total_cmp)
    }
}

impl Editable for ExtrudedPolygon {
    fn corners(&self) -> &[Point3d] {
        &self.corners
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn translate(&mut self, offset: Vec3) {
        self.placement.translate(offset);
        self.bake();
    }

    fn scale(&mut self, factor: f64) {
        self.placement.scale(factor);
        self.bake();
    }

    fn update_corners(&mut self, positions: &[Point3d]) -> Result<(), GeometryError> {
        expect_corners(positions, 8)?;
        self.corners.copy_from_slice(positions);
        self.placement.reset();
        self.update_planes();
        Ok(())
    }

    fn color_index(&self) -> usize {
        self.color_index
    }

    fn set_color_index(&mut self, index: usize) {
        self.color_index = index;
    }

    fn render_data(&self) -> RenderData {
        let mut primitives: Vec<RenderPrimitive> = self
            .faces
            .iter()
            .map(|face| RenderPrimitive::TriangleStrip(face.corners().to_vec()))
            .collect();
        primitives.push(RenderPrimitive::Lines(self.edges()));
        RenderData {
            transform: self.placement.world(),
            color_index: self.color_index,
            primitives,
        }
    }
}
