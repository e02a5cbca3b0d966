use super::{Editable, Pick, RenderData, RenderPrimitive, Shape, expect_corners};
use crate::error::GeometryError;
use crate::geometry::aabb::Aabb;
use crate::geometry::point::Point3d;
use crate::geometry::ray::Ray;
use crate::geometry::transform::{Placement, Transform};
use crate::geometry::vector::Vec3;

/// Shapes combined under one box collider.
///
/// Children keep the coordinates they had when they were grouped. The
/// group's placement starts at the centre of their union box and is applied
/// on top of them, so scaling a group scales about that centre. Only the
/// union box is picked; children are never hit on their own.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupShape {
    children: Vec<Shape>,
    origin: Point3d,
    placement: Placement,
    aabb: Aabb,
    color_index: usize,
}

impl GroupShape {
    pub fn new(children: Vec<Shape>) -> Result<Self, GeometryError> {
        let bounds = children
            .iter()
            .filter_map(Shape::bounds)
            .reduce(|a, b| a.union(&b))
            .ok_or(GeometryError::Degenerate {
                what: "group without children",
            })?;
        let origin = bounds.center();
        let mut aabb = bounds;
        aabb.translate(-origin.to_vec3());
        Ok(Self {
            children,
            origin,
            placement: Placement::at(origin),
            aabb,
            color_index: 0,
        })
    }

    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Shape] {
        &mut self.children
    }

    /// Union box of the children, relative to the group origin.
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Maps the children's coordinates to world space.
    pub fn child_transform(&self) -> Transform {
        self.placement
            .world()
            .then(&Transform::from_translation_vec(-self.origin.to_vec3()))
    }
}

impl Pick for GroupShape {
    fn pick(&self, ray: &Ray, view: &Transform) -> Option<f64> {
        self.aabb.ray_hit(ray, &view.then(&self.placement.world()))
    }
}

impl Editable for GroupShape {
    fn corners(&self) -> &[Point3d] {
        &[]
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
            transform: self.child_transform(),
            color_index: self.color_index,
            primitives: vec![RenderPrimitive::Children(
                self.children.iter().map(Shape::render_data).collect(),
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{LineShape, Primitive, PrimitiveKind};
    use approx::assert_abs_diff_eq;

    fn cube_and_line() -> GroupShape {
        GroupShape::new(vec![
            Primitive::new(PrimitiveKind::Cube, Point3d::ORIGIN).into(),
            LineShape::new(Point3d::new(2.0, 0.0, 0.0), Point3d::new(4.0, 0.0, 0.0)).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_union_box_covers_children() {
        let group = cube_and_line();
        let bounds = Shape::from(group.clone()).bounds().unwrap();
        assert_abs_diff_eq!(bounds.min_point, Point3d::new(-0.5, -0.5, -0.5), epsilon = 1e-12);
        assert_abs_diff_eq!(bounds.max_point, Point3d::new(4.1, 0.5, 0.5), epsilon = 1e-12);
        assert_abs_diff_eq!(group.placement().position(), Point3d::new(1.8, 0.0, 0.0), epsilon = 1e-12);
        assert_eq!(group.child_transform(), Transform::identity());
    }

    #[test]
    fn test_empty_group_is_degenerate() {
        assert!(matches!(
            GroupShape::new(Vec::new()),
            Err(GeometryError::Degenerate { .. })
        ));
    }

    #[test]
    fn test_pick_hits_gap_between_children() {
        let group = cube_and_line();
        // x = 1.2 lies between the cube and the line but inside the union box.
        let ray = Ray::new(Point3d::new(1.2, 0.0, 5.0), -Vec3::Z);
        let d = group.pick(&ray, &Transform::identity()).unwrap();
        assert!((d - 4.5).abs() < 1e-9);

        let beside = Ray::new(Point3d::new(1.2, 3.0, 5.0), -Vec3::Z);
        assert!(group.pick(&beside, &Transform::identity()).is_none());
    }

    #[test]
    fn test_translate_moves_children_in_render_data() {
        let mut group = cube_and_line();
        group.translate(Vec3::new(0.0, 0.0, 1.0));
        let data = group.render_data();
        let moved = data.transform.transform_point(&Point3d::ORIGIN);
        assert_abs_diff_eq!(moved, Point3d::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        let RenderPrimitive::Children(children) = &data.primitives[0] else {
            panic!("group renders its children");
        };
        assert_eq!(children.len(), 2);
    }
}
