use slotmap::{SlotMap, new_key_type};
use tracing::{info, instrument, warn};

use crate::Tolerance;
use crate::control_point::ControlPoint;
use crate::dissection::{Dissection, PlaneIntersector};
use crate::error::{GeometryError, SceneError};
use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;
use crate::shapes::{Editable, ExtrudedPolygon, Shape, ShapeKind};

// ─── Entity Keys ─────────────────────────────────────────────────────────────

new_key_type! {
    pub struct ShapeId;
    pub struct ControlPointId;
}

/// A shape together with the handles on its corners.
///
/// `control_points[i]` sits on world corner `i`; the list is empty for
/// primitives and as long as the corner array otherwise.
#[derive(Debug, Clone)]
struct ShapeEntry {
    shape: Shape,
    control_points: Vec<ControlPointId>,
}

/// Arena owning every shape and control point of a scene.
///
/// All edits go through `&mut self`, so corner arrays and control points
/// are never observed out of sync between calls.
#[derive(Debug, Default)]
pub struct ShapeStore {
    shapes: SlotMap<ShapeId, ShapeEntry>,
    control_points: SlotMap<ControlPointId, ControlPoint>,
    tolerance: Tolerance,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(id)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id).map(|entry| &entry.shape)
    }

    pub fn control_point(&self, id: ControlPointId) -> Option<&ControlPoint> {
        self.control_points.get(id)
    }

    pub fn control_points_of(&self, id: ShapeId) -> &[ControlPointId] {
        self.shapes
            .get(id)
            .map(|entry| entry.control_points.as_slice())
            .unwrap_or(&[])
    }

    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter().map(|(id, entry)| (id, &entry.shape))
    }

    pub fn control_points(&self) -> impl Iterator<Item = (ControlPointId, &ControlPoint)> {
        self.control_points.iter()
    }

    /// Add a shape and create a control point on each of its world corners.
    #[instrument(skip_all)]
    pub fn insert(&mut self, shape: impl Into<Shape>) -> ShapeId {
        let shape = shape.into();
        let kind = shape.kind();
        let corners = shape.world_corners();
        let id = self.shapes.insert(ShapeEntry {
            shape,
            control_points: Vec::new(),
        });
        self.create_control_points(id, &corners);
        info!(?kind, control_points = corners.len(), "shape added");
        id
    }

    /// Remove a shape and every control point it owns.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: ShapeId) -> Result<Shape, SceneError> {
        let entry = self.shapes.remove(id).ok_or(SceneError::UnknownShape(id))?;
        for cp in &entry.control_points {
            self.control_points.remove(*cp);
        }
        info!(kind = ?entry.shape.kind(), "shape removed");
        Ok(entry.shape)
    }

    /// Move a whole shape; its control points follow.
    pub fn translate_shape(&mut self, id: ShapeId, offset: Vec3) -> Result<(), SceneError> {
        self.entry_mut(id)?.shape.translate(offset);
        self.sync_control_points(id)
    }

    /// Scale a whole shape; its control points follow.
    pub fn scale_shape(&mut self, id: ShapeId, factor: f64) -> Result<(), SceneError> {
        self.entry_mut(id)?.shape.scale(factor);
        self.sync_control_points(id)
    }

    /// Check that dragging `id` can reach its parent: the point and the
    /// parent exist and the parent has one live control point per corner.
    /// Returns the parent.
    pub fn check_control_point(&self, id: ControlPointId) -> Result<ShapeId, SceneError> {
        let parent = self
            .control_points
            .get(id)
            .ok_or(SceneError::InvalidSelection("unknown control point"))?
            .parent();
        let entry = self.shapes.get(parent).ok_or(SceneError::UnknownShape(parent))?;
        let expected = entry.shape.corners().len();
        let found = entry
            .control_points
            .iter()
            .filter(|cp| self.control_points.contains_key(**cp))
            .count();
        if found != expected || entry.control_points.len() != expected {
            return Err(GeometryError::MissingState { expected, found }.into());
        }
        Ok(parent)
    }

    /// Drag one control point; the parent rebuilds its corners from all of
    /// its control points. Nothing moves when the parent is out of sync.
    pub fn translate_control_point(
        &mut self,
        id: ControlPointId,
        offset: Vec3,
    ) -> Result<(), SceneError> {
        let parent = self.check_control_point(id)?;
        if let Some(cp) = self.control_points.get_mut(id) {
            cp.nudge(offset);
        }
        self.update_corners(parent)
    }

    /// Read every control point position into the shape's corner array.
    pub fn update_corners(&mut self, id: ShapeId) -> Result<(), SceneError> {
        let entry = self.shapes.get(id).ok_or(SceneError::UnknownShape(id))?;
        let positions: Vec<Point3d> = entry
            .control_points
            .iter()
            .map(|cp| self.control_points.get(*cp).map(ControlPoint::position))
            .collect::<Option<_>>()
            .ok_or(GeometryError::MissingState {
                expected: entry.control_points.len(),
                found: entry
                    .control_points
                    .iter()
                    .filter(|cp| self.control_points.contains_key(**cp))
                    .count(),
            })?;
        self.entry_mut(id)?.shape.update_corners(&positions)?;
        Ok(())
    }

    pub fn set_color_index(&mut self, id: ShapeId, index: usize) -> Result<(), SceneError> {
        self.entry_mut(id)?.shape.set_color_index(index);
        Ok(())
    }

    pub fn rotate_color(&mut self, id: ShapeId, forwards: bool) -> Result<(), SceneError> {
        self.entry_mut(id)?.shape.rotate_color(forwards);
        Ok(())
    }

    /// Cut the plane `target` with the plane `tool`.
    ///
    /// The target's control points are discarded and rebuilt on the new
    /// corners. On error both planes are unchanged.
    #[instrument(skip(self))]
    pub fn dissect(&mut self, target: ShapeId, tool: ShapeId) -> Result<Dissection, SceneError> {
        let tool_plane = self
            .shape(tool)
            .ok_or(SceneError::UnknownShape(tool))?
            .as_plane()
            .ok_or(SceneError::InvalidSelection("dissection tool must be a plane"))?
            .clone();
        let intersector = PlaneIntersector::new(self.tolerance);
        let target_plane = self
            .entry_mut(target)?
            .shape
            .as_plane_mut()
            .ok_or(SceneError::InvalidSelection("dissection target must be a plane"))?;

        let result = intersector.dissect(target_plane, &tool_plane).inspect_err(|err| {
            warn!(%err, "dissection skipped");
        })?;
        self.rebuild_control_points(target)?;
        Ok(result)
    }

    /// Replace the plane `id` by a solid extruded `height` from it.
    #[instrument(skip(self))]
    pub fn extrude(&mut self, id: ShapeId, height: f64) -> Result<ShapeId, SceneError> {
        let plane = self
            .shape(id)
            .ok_or(SceneError::UnknownShape(id))?
            .as_plane()
            .ok_or(SceneError::InvalidSelection("only planes can be extruded"))?;
        let mut solid = ExtrudedPolygon::from_plane(plane, height).inspect_err(|err| {
            warn!(%err, "extrusion skipped");
        })?;
        solid.set_color_index(plane.color_index());
        self.remove(id)?;
        let solid_id = self.insert(solid);
        info!(height, "plane extruded");
        Ok(solid_id)
    }

    /// Shapes of `kind`, in arena order.
    pub fn ids_of_kind(&self, kind: ShapeKind) -> Vec<ShapeId> {
        self.shapes()
            .filter(|(_, shape)| shape.kind() == kind)
            .map(|(id, _)| id)
            .collect()
    }

    fn entry_mut(&mut self, id: ShapeId) -> Result<&mut ShapeEntry, SceneError> {
        self.shapes.get_mut(id).ok_or(SceneError::UnknownShape(id))
    }

    fn create_control_points(&mut self, id: ShapeId, corners: &[Point3d]) {
        let ids: Vec<ControlPointId> = corners
            .iter()
            .map(|corner| self.control_points.insert(ControlPoint::new(id, *corner)))
            .collect();
        if let Some(entry) = self.shapes.get_mut(id) {
            entry.control_points = ids;
        }
    }

    fn rebuild_control_points(&mut self, id: ShapeId) -> Result<(), SceneError> {
        let entry = self.entry_mut(id)?;
        let old = std::mem::take(&mut entry.control_points);
        let corners = entry.shape.world_corners();
        for cp in old {
            self.control_points.remove(cp);
        }
        self.create_control_points(id, &corners);
        Ok(())
    }

    /// Move each control point onto its parent's world corner without
    /// feeding back into the parent.
    fn sync_control_points(&mut self, id: ShapeId) -> Result<(), SceneError> {
        let entry = self.shapes.get(id).ok_or(SceneError::UnknownShape(id))?;
        let corners = entry.shape.world_corners();
        if corners.len() != entry.control_points.len() {
            return Err(GeometryError::MissingState {
                expected: corners.len(),
                found: entry.control_points.len(),
            }
            .into());
        }
        for (cp, corner) in entry.control_points.iter().zip(corners) {
            if let Some(point) = self.control_points.get_mut(*cp) {
                point.update_position(corner);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{LineShape, PlaneShape, Primitive, PrimitiveKind};
    use approx::assert_abs_diff_eq;

    fn square() -> PlaneShape {
        PlaneShape::new([
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
            Point3d::new(1.0, 1.0, 0.0),
        ])
    }

    fn positions(store: &ShapeStore, id: ShapeId) -> Vec<Point3d> {
        store
            .control_points_of(id)
            .iter()
            .map(|cp| store.control_point(*cp).unwrap().position())
            .collect()
    }

    #[test]
    fn test_insert_creates_control_points() {
        let mut store = ShapeStore::new();
        let plane = store.insert(square());
        let cube = store.insert(Primitive::new(PrimitiveKind::Cube, Point3d::ORIGIN));

        assert_eq!(store.control_points_of(plane).len(), 4);
        assert!(store.control_points_of(cube).is_empty());
        assert_eq!(positions(&store, plane), store.shape(plane).unwrap().world_corners());
        for cp in store.control_points_of(plane) {
            assert_eq!(store.control_point(*cp).unwrap().parent(), plane);
        }
    }

    #[test]
    fn test_remove_drops_control_points() {
        let mut store = ShapeStore::new();
        let line = store.insert(LineShape::new(Point3d::ORIGIN, Point3d::new(1.0, 0.0, 0.0)));
        store.remove(line).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.control_points().count(), 0);
        assert_eq!(store.remove(line).unwrap_err(), SceneError::UnknownShape(line));
    }

    #[test]
    fn test_translate_shape_moves_control_points() {
        let mut store = ShapeStore::new();
        let plane = store.insert(square());
        store.translate_shape(plane, Vec3::new(0.0, 0.0, 2.0)).unwrap();

        let shape = store.shape(plane).unwrap();
        assert!(!shape.placement().is_baked());
        for (cp, corner) in positions(&store, plane).iter().zip(shape.world_corners()) {
            assert_abs_diff_eq!(*cp, corner, epsilon = 1e-12);
            assert!((cp.z - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_drag_control_point_changes_one_corner() {
        let mut store = ShapeStore::new();
        let plane = store.insert(square());
        store.scale_shape(plane, 2.0).unwrap();
        let before = store.shape(plane).unwrap().world_corners();

        let handle = store.control_points_of(plane)[3];
        store.translate_control_point(handle, Vec3::new(0.0, 0.0, 1.0)).unwrap();

        let shape = store.shape(plane).unwrap();
        assert!(shape.placement().is_baked());
        let after = shape.world_corners();
        for i in 0..3 {
            assert_abs_diff_eq!(after[i], before[i], epsilon = 1e-12);
        }
        assert_abs_diff_eq!(after[3], before[3] + Vec3::Z, epsilon = 1e-12);
        assert_eq!(positions(&store, plane), after);
    }

    #[test]
    fn test_drag_with_missing_sibling_moves_nothing() {
        let mut store = ShapeStore::new();
        let plane = store.insert(square());
        let handles = store.control_points_of(plane).to_vec();
        store.control_points.remove(handles[1]);
        let before = store.control_point(handles[0]).unwrap().position();

        let err = store
            .translate_control_point(handles[0], Vec3::new(0.0, 0.0, 1.0))
            .unwrap_err();

        assert_eq!(
            err,
            SceneError::Geometry(GeometryError::MissingState { expected: 4, found: 3 })
        );
        assert_eq!(store.control_point(handles[0]).unwrap().position(), before);
        assert_eq!(store.shape(plane).unwrap().corners(), square().corners());
        assert!(matches!(
            store.update_corners(plane),
            Err(SceneError::Geometry(GeometryError::MissingState { .. }))
        ));
    }

    #[test]
    fn test_rotate_color_and_extrusion_keeps_it() {
        let mut store = ShapeStore::new();
        let plane = store.insert(square());
        store.set_color_index(plane, 4).unwrap();
        store.rotate_color(plane, true).unwrap();
        assert_eq!(store.shape(plane).unwrap().color_index(), 5);

        let solid = store.extrude(plane, 1.0).unwrap();
        assert_eq!(store.shape(solid).unwrap().color_index(), 5);
        assert!(store.rotate_color(plane, true).is_err());
    }

    #[test]
    fn test_dissect_rebuilds_control_points() {
        let mut store = ShapeStore::new();
        let target = store.insert(PlaneShape::new([
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(2.0, 0.0, 0.0),
            Point3d::new(0.0, 0.0, 1.0),
            Point3d::new(2.0, 0.0, 1.0),
        ]));
        let tool = store.insert(PlaneShape::new([
            Point3d::new(1.0, 1.0, 0.0),
            Point3d::new(1.0, -1.0, 0.0),
            Point3d::new(1.0, 1.0, 1.0),
            Point3d::new(1.0, -1.0, 1.0),
        ]));
        let old = store.control_points_of(target).to_vec();

        store.dissect(target, tool).unwrap();

        let new = store.control_points_of(target);
        assert_eq!(new.len(), 4);
        assert!(old.iter().all(|cp| store.control_point(*cp).is_none()));
        assert_abs_diff_eq!(
            store.control_point(new[3]).unwrap().position(),
            Point3d::new(1.0, 0.0, 1.0),
            epsilon = 1e-9
        );
        assert_eq!(store.control_points().count(), 8);
    }

    #[test]
    fn test_dissect_requires_planes() {
        let mut store = ShapeStore::new();
        let plane = store.insert(square());
        let line = store.insert(LineShape::new(Point3d::ORIGIN, Point3d::new(1.0, 0.0, 0.0)));
        assert!(matches!(
            store.dissect(plane, line),
            Err(SceneError::InvalidSelection(_))
        ));
        assert!(matches!(
            store.dissect(plane, plane),
            Err(SceneError::Geometry(GeometryError::Degenerate { .. }))
        ));
    }

    #[test]
    fn test_extrude_replaces_plane() {
        let mut store = ShapeStore::new();
        let plane = store.insert(square());
        let solid = store.extrude(plane, 1.0).unwrap();

        assert!(!store.contains(plane));
        assert_eq!(store.len(), 1);
        assert_eq!(store.shape(solid).unwrap().kind(), ShapeKind::ExtrudedPolygon);
        assert_eq!(store.control_points_of(solid).len(), 8);
        assert_eq!(store.control_points().count(), 8);
    }
}
