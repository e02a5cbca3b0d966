//! Selection and the editing commands of the modeler.

use tracing::{debug, info, instrument, warn};

use crate::config::EditorConfig;
use crate::dissection::Dissection;
use crate::error::{GeometryError, SceneError};
use crate::geometry::point::Point3d;
use crate::geometry::ray::Ray;
use crate::geometry::transform::Transform;
use crate::picker::{PickHit, PickTarget, pick_nearest};
use crate::shapes::{
    Editable, GroupShape, LineShape, PALETTE, PlaneShape, Primitive, PrimitiveKind, RenderData,
    Shape, ShapeKind,
};
use crate::store::{ShapeId, ShapeStore};

/// A picked element together with where the ray met it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selected {
    pub target: PickTarget,
    /// Distance along the pick ray, reused when dragging.
    pub depth: f64,
    /// Last point under the cursor, in view space.
    pub selected_loc: Point3d,
}

#[derive(Debug, Default)]
pub struct Scene {
    store: ShapeStore,
    selection: Vec<Selected>,
    config: EditorConfig,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            store: ShapeStore::with_tolerance(config.tolerance),
            selection: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ShapeStore {
        &mut self.store
    }

    pub fn selection(&self) -> &[Selected] {
        &self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Everything a renderer needs: shapes first, then control points.
    pub fn render_data(&self) -> Vec<RenderData> {
        self.store
            .shapes()
            .map(|(_, shape)| shape.render_data())
            .chain(self.store.control_points().map(|(_, cp)| cp.render_data()))
            .collect()
    }

    /// Select the nearest element under `ray`.
    ///
    /// A hit is added when nothing is selected yet or `multiple` is set;
    /// otherwise the selection is cleared. A multiple pick of a target that
    /// is already selected leaves the selection as it is. Adding may complete a construction: three points,
    /// a line and a point, or a plane and a point each become a new plane.
    #[instrument(skip(self))]
    pub fn pick(
        &mut self,
        ray: &Ray,
        view: &Transform,
        multiple: bool,
    ) -> Result<Option<PickHit>, SceneError> {
        let hit = pick_nearest(&self.store, ray, view);
        match hit {
            Some(hit) if multiple && self.selection.iter().any(|s| s.target == hit.target) => {
                debug!("target already selected");
                Ok(Some(hit))
            }
            Some(hit) if self.selection.is_empty() || multiple => {
                self.selection.push(Selected {
                    target: hit.target,
                    depth: hit.distance,
                    selected_loc: ray.at(hit.distance),
                });
                debug!(selected = self.selection.len(), "selection grew");
                self.construct_from_selection()?;
                Ok(Some(hit))
            }
            _ => {
                self.selection.clear();
                Ok(None)
            }
        }
    }

    pub fn create_line(&mut self, start: Point3d, end: Point3d) -> ShapeId {
        self.add(LineShape::new(start, end))
    }

    /// Drop a new primitive on `ray` at the configured depth.
    ///
    /// `inverse_view` maps view space back to world space.
    #[instrument(skip(self))]
    pub fn place(&mut self, kind: PrimitiveKind, ray: &Ray, inverse_view: &Transform) -> ShapeId {
        let position = inverse_view.transform_point(&ray.at(self.config.place_depth));
        self.add(Primitive::new(kind, position))
    }

    /// Cut the first selected plane with the second one.
    #[instrument(skip(self))]
    pub fn dissect_selected(&mut self) -> Result<Dissection, SceneError> {
        let &[first, second] = self.selected_shapes().as_slice() else {
            return Err(SceneError::InvalidSelection("dissection needs two planes"));
        };
        let result = self.store.dissect(first, second)?;
        self.retain_live_selection();
        Ok(result)
    }

    /// Replace the single selected plane by an extruded solid.
    #[instrument(skip(self))]
    pub fn extrude_selected(&mut self, height: Option<f64>) -> Result<ShapeId, SceneError> {
        let &[plane] = self.selected_shapes().as_slice() else {
            return Err(SceneError::InvalidSelection("extrusion needs one plane"));
        };
        let height = height.unwrap_or(self.config.extrusion_height);
        let solid = self.store.extrude(plane, height)?;
        self.selection.clear();
        Ok(solid)
    }

    /// Drag the selection so each element stays under the cursor at its
    /// pick depth.
    #[instrument(skip(self))]
    pub fn move_selected(&mut self, ray: &Ray, inverse_view: &Transform) -> Result<(), SceneError> {
        self.validate_selection()?;
        for i in 0..self.selection.len() {
            let selected = self.selection[i];
            let new_loc = ray.at(selected.depth);
            let offset = inverse_view.transform_vector(&(new_loc - selected.selected_loc));
            match selected.target {
                PickTarget::Shape(id) => self.store.translate_shape(id, offset)?,
                PickTarget::ControlPoint(id) => self.store.translate_control_point(id, offset)?,
            }
            self.selection[i].selected_loc = new_loc;
        }
        Ok(())
    }

    /// Grow or shrink every selected shape by one step.
    #[instrument(skip(self))]
    pub fn scale_selected(&mut self, up: bool) -> Result<(), SceneError> {
        let factor = if up {
            self.config.scale_up
        } else {
            self.config.scale_down
        };
        self.validate_selection()?;
        for id in self.selected_shapes() {
            self.store.scale_shape(id, factor)?;
        }
        Ok(())
    }

    /// Step every selected shape to the next or previous palette colour.
    #[instrument(skip(self))]
    pub fn rotate_selected_color(&mut self, forwards: bool) -> Result<(), SceneError> {
        self.validate_selection()?;
        for id in self.selected_shapes() {
            self.store.rotate_color(id, forwards)?;
        }
        Ok(())
    }

    /// Replace the selected shapes by one group under their union box.
    ///
    /// The grouped shapes leave the store along with their control points
    /// and all take the same colour.
    #[instrument(skip(self))]
    pub fn combine_selected(&mut self) -> Result<ShapeId, SceneError> {
        self.validate_selection()?;
        let ids = self.selected_shapes();
        if ids.is_empty() {
            return Err(SceneError::InvalidSelection("combining needs at least one shape"));
        }
        let children = ids
            .iter()
            .map(|id| self.shape(*id).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        let mut group = GroupShape::new(children)
            .inspect_err(|err| warn!(%err, "combine skipped"))?;

        for id in &ids {
            self.store.remove(*id)?;
        }
        self.selection.clear();
        let color = self.store.len() + 1;
        for child in group.children_mut() {
            child.set_color_index(color);
        }
        let id = self.add(group);
        info!(children = ids.len(), "shapes combined");
        Ok(id)
    }

    /// Remove every selected shape along with its control points.
    ///
    /// Selected control points are left alone; they go with their parent.
    #[instrument(skip(self))]
    pub fn delete_selected(&mut self) -> Result<(), SceneError> {
        self.validate_selection()?;
        for selected in std::mem::take(&mut self.selection) {
            match selected.target {
                PickTarget::Shape(id) => {
                    self.store.remove(id)?;
                }
                PickTarget::ControlPoint(_) => debug!("control point not deleted on its own"),
            }
        }
        Ok(())
    }

    fn selected_shapes(&self) -> Vec<ShapeId> {
        self.selection
            .iter()
            .filter_map(|s| match s.target {
                PickTarget::Shape(id) => Some(id),
                PickTarget::ControlPoint(_) => None,
            })
            .collect()
    }

    /// Insert a shape with the next palette colour.
    fn add(&mut self, shape: impl Into<Shape>) -> ShapeId {
        let mut shape = shape.into();
        shape.set_color_index(self.store.len() % PALETTE.len());
        self.store.insert(shape)
    }

    /// Drop selected elements the store no longer holds.
    fn retain_live_selection(&mut self) {
        let store = &self.store;
        let before = self.selection.len();
        self.selection.retain(|s| match s.target {
            PickTarget::Shape(id) => store.contains(id),
            PickTarget::ControlPoint(id) => store.control_point(id).is_some(),
        });
        if self.selection.len() != before {
            debug!(dropped = before - self.selection.len(), "stale selection dropped");
        }
    }

    /// Drop stale entries, then fail unless every selected element can be
    /// edited, so a command either edits the whole selection or nothing.
    fn validate_selection(&mut self) -> Result<(), SceneError> {
        self.retain_live_selection();
        for selected in &self.selection {
            if let PickTarget::ControlPoint(id) = selected.target {
                self.store.check_control_point(id)?;
            }
        }
        Ok(())
    }

    fn shape(&self, id: ShapeId) -> Result<&Shape, SceneError> {
        self.store.shape(id).ok_or(SceneError::UnknownShape(id))
    }

    fn construct_from_selection(&mut self) -> Result<(), SceneError> {
        if self.selection.len() < 2 || self.selection.len() != self.selected_shapes().len() {
            return Ok(());
        }
        let ids = self.selected_shapes();
        let kinds: Vec<ShapeKind> = ids
            .iter()
            .map(|id| self.shape(*id).map(Shape::kind))
            .collect::<Result<_, _>>()?;

        let find = |kind: ShapeKind| {
            ids.iter()
                .zip(&kinds)
                .find(|(_, k)| **k == kind)
                .map(|(id, _)| *id)
        };
        let count = |kind: ShapeKind| kinds.iter().filter(|k| **k == kind).count();

        let built = match (ids.len(), count(ShapeKind::Point)) {
            (3, 3) => {
                let points: Vec<Point3d> = ids
                    .iter()
                    .map(|id| self.shape(*id).map(|s| s.placement().position()))
                    .collect::<Result<_, _>>()?;
                let plane = self.plane_from_points(points[0], points[1], points[2]);
                if plane.is_ok() {
                    for id in &ids {
                        self.store.remove(*id)?;
                    }
                }
                Some(plane)
            }
            (2, 1) => {
                let point = find(ShapeKind::Point)
                    .map(|id| self.shape(id).map(|s| s.placement().position()))
                    .transpose()?;
                let line = find(ShapeKind::Line).map(|id| self.shape(id)).transpose()?;
                let plane = find(ShapeKind::Plane).map(|id| self.shape(id)).transpose()?;
                match (point, line, plane) {
                    (Some(p), Some(line), _) => {
                        let ends = line.world_corners();
                        Some(self.plane_from_points(ends[0], ends[1], p))
                    }
                    (Some(p), None, Some(plane)) => {
                        let c = plane.world_corners();
                        Some(self.plane_from_points(p, p + (c[1] - c[0]), p + (c[2] - c[0])))
                    }
                    _ => None,
                }
            }
            _ => None,
        };

        let Some(built) = built else {
            return Ok(());
        };
        self.selection.clear();
        let plane = built.inspect_err(|err| warn!(%err, "construction skipped"))?;
        let id = self.add(plane);
        info!(?id, "plane constructed from selection");
        Ok(())
    }

    fn plane_from_points(
        &self,
        p1: Point3d,
        p2: Point3d,
        p3: Point3d,
    ) -> Result<PlaneShape, GeometryError> {
        PlaneShape::from_three_points(p1, p2, p3, self.config.plane_scale)
    }
}
