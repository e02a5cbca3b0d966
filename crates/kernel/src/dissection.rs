//! Cutting a plane with another plane.
//!
//! The cut keeps the target a quadrilateral: every edge crossed by the
//! intersection line moves one corner onto the crossing, and corners that
//! receive no crossing stay where they were.

use tracing::{debug, info};

use crate::Tolerance;
use crate::error::GeometryError;
use crate::geometry::frame::LocalCoordinateSystem;
use crate::geometry::intersection::{
    IntersectionLine, find_intersection_2d_with, get_intersection_line_and_point_of_two_planes,
    plane_normal, point_on_line,
};
use crate::geometry::point::Point3d;
use crate::shapes::{Editable, PlaneShape, WINDING};

/// Outcome of a successful dissection.
#[derive(Debug, Clone, PartialEq)]
pub struct Dissection {
    pub line: IntersectionLine,
    /// Crossing points in the order the edges were walked.
    pub edge_hits: Vec<Point3d>,
    pub corners: [Point3d; 4],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlaneIntersector {
    tolerance: Tolerance,
}

impl PlaneIntersector {
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    /// Compute the corners `target` would get when cut by `tool`, without
    /// touching either plane. A line that crosses no edge is `OutOfBounds`.
    pub fn compute(
        &self,
        target: &PlaneShape,
        tool: &PlaneShape,
    ) -> Result<Dissection, GeometryError> {
        let tol = &self.tolerance;
        let world = target.world_corners();
        let line =
            get_intersection_line_and_point_of_two_planes(&world, &tool.world_corners(), tol)?;

        let basis =
            LocalCoordinateSystem::new(world[1] - world[0], plane_normal(&world)?, world[0])?;
        let origin = basis.to_local(&line.point);
        let direction = basis.direction_to_local(&line.direction);

        let mut assigned: [Option<Point3d>; 4] = [None; 4];
        let mut edge_hits = Vec::new();
        for (k, &i) in WINDING.iter().enumerate() {
            let j = WINDING[(k + 1) % 4];
            let edge = [basis.to_local(&world[i]), basis.to_local(&world[j])];
            let Some(hit) = find_intersection_2d_with(edge, direction, origin, tol) else {
                continue;
            };
            if !point_on_line(hit, edge, tol.parametric) {
                continue;
            }
            let hit = basis.to_global(&hit);
            // Edges leaving corners 0 and 2 move their end corner.
            let slot = if i == 0 || i == 2 { j } else { i };
            assigned[slot] = Some(hit);
            edge_hits.push(hit);
        }
        debug!(hits = edge_hits.len(), "walked plane edges");
        if edge_hits.is_empty() {
            return Err(GeometryError::OutOfBounds { edges: WINDING.len() });
        }

        let corners = [0, 1, 2, 3].map(|i| assigned[i].unwrap_or(world[i]));
        Ok(Dissection {
            line,
            edge_hits,
            corners,
        })
    }

    /// Cut `target` by `tool` in place.
    ///
    /// On success the target holds the new world corners with an identity
    /// placement, and its debug markers gain the line point, every edge hit
    /// and the intersection line. On error nothing changes.
    pub fn dissect(
        &self,
        target: &mut PlaneShape,
        tool: &PlaneShape,
    ) -> Result<Dissection, GeometryError> {
        let result = self.compute(target, tool)?;

        let markers = target.debug_markers_mut();
        markers.points.push(result.line.point);
        markers.points.extend(result.edge_hits.iter().copied());
        markers.lines.push([result.line.point, result.line.at(1.0)]);
        target.replace_corners(result.corners);

        info!(
            edge_hits = result.edge_hits.len(),
            "plane dissected"
        );
        Ok(result)
    }
}
