use tracing::debug;

use crate::geometry::ray::Ray;
use crate::geometry::transform::Transform;
use crate::shapes::Pick;
use crate::store::{ControlPointId, ShapeId, ShapeStore};

/// What a pick ray landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickTarget {
    Shape(ShapeId),
    ControlPoint(ControlPointId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub target: PickTarget,
    /// Distance from the ray origin, in the ray's space.
    pub distance: f64,
}

/// Nearest shape or control point hit by `ray`.
///
/// `ray` lives in view space and `view` maps world coordinates into it.
/// On equal distances the first candidate in store order wins, shapes
/// before control points.
pub fn pick_nearest(store: &ShapeStore, ray: &Ray, view: &Transform) -> Option<PickHit> {
    let shapes = store.shapes().filter_map(|(id, shape)| {
        shape.pick(ray, view).map(|distance| PickHit {
            target: PickTarget::Shape(id),
            distance,
        })
    });
    let points = store.control_points().filter_map(|(id, point)| {
        point.pick(ray, view).map(|distance| PickHit {
            target: PickTarget::ControlPoint(id),
            distance,
        })
    });

    let hit = shapes.chain(points).fold(None, |best: Option<PickHit>, hit| match best {
        Some(b) if b.distance <= hit.distance => Some(b),
        _ => Some(hit),
    });
    debug!(?hit, "pick");
    hit
}
