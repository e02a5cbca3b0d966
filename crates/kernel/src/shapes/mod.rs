//! The closed set of shapes the editor knows.
//!
//! Every variant answers the same capability set: ray picking, corner
//! editing and render data. [`Shape`] dispatches with a `match`; the file
//! format switches on [`ShapeKind`] when it rebuilds shapes.

pub mod extruded;
pub mod group;
pub mod line;
pub mod plane;
pub mod primitive;

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::geometry::aabb::Aabb;
use crate::geometry::point::Point3d;
use crate::geometry::ray::Ray;
use crate::geometry::transform::{Placement, Transform};
use crate::geometry::vector::Vec3;

pub use extruded::ExtrudedPolygon;
pub use group::GroupShape;
pub use line::LineShape;
pub use plane::PlaneShape;
pub use primitive::{Primitive, PrimitiveKind};

/// Order in which the four corners of a quadrilateral are walked.
pub const WINDING: [usize; 4] = [0, 2, 3, 1];

/// Something that can be hit by a pick ray.
pub trait Pick {
    /// Distance from `ray.origin` to the hit, in the ray's space.
    ///
    /// `view` maps world coordinates into the ray's space.
    fn pick(&self, ray: &Ray, view: &Transform) -> Option<f64>;
}

/// A shape whose geometry is driven by a corner array.
pub trait Editable {
    /// Raw corners, before the placement is applied.
    fn corners(&self) -> &[Point3d];

    fn placement(&self) -> &Placement;

    fn translate(&mut self, offset: Vec3);

    fn scale(&mut self, factor: f64);

    /// Replace every corner with a world position and bake the placement.
    fn update_corners(&mut self, positions: &[Point3d]) -> Result<(), GeometryError>;

    fn render_data(&self) -> RenderData;

    /// Slot in [`PALETTE`], taken modulo its length when drawn.
    fn color_index(&self) -> usize;

    fn set_color_index(&mut self, index: usize);

    /// Step to the next palette colour, or the previous one.
    fn rotate_color(&mut self, forwards: bool) {
        let len = PALETTE.len();
        let current = self.color_index() % len;
        let next = if forwards {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.set_color_index(next);
    }

    /// Corners in world coordinates.
    fn world_corners(&self) -> Vec<Point3d> {
        let placement = self.placement();
        self.corners().iter().map(|c| placement.apply(c)).collect()
    }
}

/// Check the length of a replacement corner list.
pub(crate) fn expect_corners(positions: &[Point3d], expected: usize) -> Result<(), GeometryError> {
    if positions.len() == expected {
        Ok(())
    } else {
        Err(GeometryError::MissingState {
            expected,
            found: positions.len(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Point,
    Cube,
    Sphere,
    Line,
    Plane,
    ExtrudedPolygon,
    Group,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Primitive(Primitive),
    Line(LineShape),
    Plane(PlaneShape),
    Extruded(ExtrudedPolygon),
    Group(GroupShape),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Primitive(p) => match p.kind() {
                PrimitiveKind::Point => ShapeKind::Point,
                PrimitiveKind::Cube => ShapeKind::Cube,
                PrimitiveKind::Sphere => ShapeKind::Sphere,
            },
            Shape::Line(_) => ShapeKind::Line,
            Shape::Plane(_) => ShapeKind::Plane,
            Shape::Extruded(_) => ShapeKind::ExtrudedPolygon,
            Shape::Group(_) => ShapeKind::Group,
        }
    }

    /// Whether the shape carries draggable control points.
    pub fn has_control_points(&self) -> bool {
        !matches!(self, Shape::Primitive(_) | Shape::Group(_))
    }

    /// World-space box around the whole shape.
    pub fn bounds(&self) -> Option<Aabb> {
        match self {
            Shape::Primitive(p) => Some(p.aabb().transformed(&p.placement().world())),
            Shape::Line(line) => Some(*line.aabb()),
            Shape::Group(group) => Some(group.aabb().transformed(&group.placement().world())),
            Shape::Plane(_) | Shape::Extruded(_) => Aabb::from_points(&self.world_corners(), 0.0),
        }
    }

    pub fn as_plane(&self) -> Option<&PlaneShape> {
        match self {
            Shape::Plane(plane) => Some(plane),
            _ => None,
        }
    }

    pub fn as_plane_mut(&mut self) -> Option<&mut PlaneShape> {
        match self {
            Shape::Plane(plane) => Some(plane),
            _ => None,
        }
    }

    fn editable(&self) -> &dyn Editable {
        match self {
            Shape::Primitive(s) => s,
            Shape::Line(s) => s,
            Shape::Plane(s) => s,
            Shape::Extruded(s) => s,
            Shape::Group(s) => s,
        }
    }

    fn editable_mut(&mut self) -> &mut dyn Editable {
        match self {
            Shape::Primitive(s) => s,
            Shape::Line(s) => s,
            Shape::Plane(s) => s,
            Shape::Extruded(s) => s,
            Shape::Group(s) => s,
        }
    }
}

impl Pick for Shape {
    fn pick(&self, ray: &Ray, view: &Transform) -> Option<f64> {
        match self {
            Shape::Primitive(s) => s.pick(ray, view),
            Shape::Line(s) => s.pick(ray, view),
            Shape::Plane(s) => s.pick(ray, view),
            Shape::Extruded(s) => s.pick(ray, view),
            Shape::Group(s) => s.pick(ray, view),
        }
    }
}

impl Editable for Shape {
    fn corners(&self) -> &[Point3d] {
        self.editable().corners()
    }

    fn placement(&self) -> &Placement {
        self.editable().placement()
    }

    fn translate(&mut self, offset: Vec3) {
        self.editable_mut().translate(offset)
    }

    fn scale(&mut self, factor: f64) {
        self.editable_mut().scale(factor)
    }

    fn update_corners(&mut self, positions: &[Point3d]) -> Result<(), GeometryError> {
        self.editable_mut().update_corners(positions)
    }

    fn render_data(&self) -> RenderData {
        self.editable().render_data()
    }

    fn color_index(&self) -> usize {
        self.editable().color_index()
    }

    fn set_color_index(&mut self, index: usize) {
        self.editable_mut().set_color_index(index)
    }
}

impl From<Primitive> for Shape {
    fn from(shape: Primitive) -> Self {
        Shape::Primitive(shape)
    }
}

impl From<LineShape> for Shape {
    fn from(shape: LineShape) -> Self {
        Shape::Line(shape)
    }
}

impl From<PlaneShape> for Shape {
    fn from(shape: PlaneShape) -> Self {
        Shape::Plane(shape)
    }
}

impl From<ExtrudedPolygon> for Shape {
    fn from(shape: ExtrudedPolygon) -> Self {
        Shape::Extruded(shape)
    }
}

impl From<GroupShape> for Shape {
    fn from(shape: GroupShape) -> Self {
        Shape::Group(shape)
    }
}

// ─── Render Data ────────────────────────────────────────────────────────────

/// Linear RGB colours shapes cycle through.
pub const PALETTE: [[f32; 3]; 12] = [
    [0.90, 0.90, 0.90],
    [0.85, 0.33, 0.31],
    [0.36, 0.72, 0.36],
    [0.26, 0.55, 0.79],
    [0.94, 0.68, 0.31],
    [0.58, 0.40, 0.74],
    [0.35, 0.75, 0.80],
    [0.89, 0.47, 0.76],
    [0.55, 0.34, 0.29],
    [0.74, 0.74, 0.13],
    [0.50, 0.50, 0.50],
    [0.09, 0.75, 0.81],
];

pub fn palette_color(index: usize) -> [f32; 3] {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    Point,
    Cube,
    Sphere,
}

/// Geometry handed to a renderer, in the space of [`RenderData::transform`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderPrimitive {
    TriangleStrip(Vec<Point3d>),
    /// Pairs of points, one segment per pair.
    Lines(Vec<Point3d>),
    Marker {
        kind: MarkerKind,
        center: Point3d,
        half_extent: f64,
    },
    /// Render data of grouped shapes, each under the enclosing transform.
    Children(Vec<RenderData>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderData {
    pub transform: Transform,
    pub color_index: usize,
    pub primitives: Vec<RenderPrimitive>,
}

impl RenderData {
    pub fn color(&self) -> [f32; 3] {
        palette_color(self.color_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_control_points() {
        let cube = Shape::from(Primitive::new(PrimitiveKind::Cube, Point3d::ORIGIN));
        assert_eq!(cube.kind(), ShapeKind::Cube);
        assert!(!cube.has_control_points());

        let line = Shape::from(LineShape::new(Point3d::ORIGIN, Point3d::new(1.0, 0.0, 0.0)));
        assert_eq!(line.kind(), ShapeKind::Line);
        assert!(line.has_control_points());
        assert_eq!(line.corners().len(), 2);
        assert!(line.as_plane().is_none());
    }

    #[test]
    fn test_update_corners_rejects_wrong_length() {
        let mut line = Shape::from(LineShape::new(Point3d::ORIGIN, Point3d::new(1.0, 0.0, 0.0)));
        let err = line.update_corners(&[Point3d::ORIGIN]).unwrap_err();
        assert_eq!(err, GeometryError::MissingState { expected: 2, found: 1 });
    }

    #[test]
    fn test_rotate_color_wraps_both_ways() {
        let mut cube = Shape::from(Primitive::new(PrimitiveKind::Cube, Point3d::ORIGIN));
        assert_eq!(cube.color_index(), 0);

        cube.rotate_color(false);
        assert_eq!(cube.color_index(), PALETTE.len() - 1);
        cube.rotate_color(true);
        assert_eq!(cube.color_index(), 0);
        cube.rotate_color(true);
        assert_eq!(cube.render_data().color_index, 1);
        assert_eq!(cube.render_data().color(), PALETTE[1]);
    }

    #[test]
    fn test_bounds_of_primitive_follow_placement() {
        let mut cube = Shape::from(Primitive::new(PrimitiveKind::Cube, Point3d::new(2.0, 0.0, 0.0)));
        cube.scale(2.0);
        let bounds = cube.bounds().unwrap();
        assert_eq!(bounds.min_point, Point3d::new(1.0, -1.0, -1.0));
        assert_eq!(bounds.max_point, Point3d::new(3.0, 1.0, 1.0));
    }

    #[test]
    fn test_world_corners_follow_translation() {
        let mut line = Shape::from(LineShape::new(Point3d::ORIGIN, Point3d::new(1.0, 0.0, 0.0)));
        line.translate(Vec3::new(0.0, 2.0, 0.0));
        let world = line.world_corners();
        assert_eq!(world[0], Point3d::new(0.0, 2.0, 0.0));
        assert_eq!(world[1], Point3d::new(1.0, 2.0, 0.0));
    }
}
