use nalgebra::{Matrix3, Vector3};
use tracing::debug;

use super::point::{Point2d, Point3d};
use super::vector::{Vec2, Vec3};
use crate::Tolerance;
use crate::error::GeometryError;

/// Line along which two planes meet. `direction` is not normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionLine {
    pub point: Point3d,
    pub direction: Vec3,
}

impl IntersectionLine {
    pub fn at(&self, t: f64) -> Point3d {
        self.point + self.direction * t
    }
}

// ─── 2D Line-Segment Intersection ───────────────────────────────────────────

/// Intersect the infinite line `q + t*d` with the line through `segment`.
///
/// Returns the point on the segment's line regardless of whether it falls
/// between the endpoints. None when the lines are parallel or the segment
/// has zero length.
pub fn find_intersection_2d(segment: [Point2d; 2], d: Vec2, q: Point2d) -> Option<Point2d> {
    find_intersection_2d_with(segment, d, q, &Tolerance::default())
}

pub fn find_intersection_2d_with(
    segment: [Point2d; 2],
    d: Vec2,
    q: Point2d,
    tol: &Tolerance,
) -> Option<Point2d> {
    let [p0, p1] = segment;
    let e = p1 - p0;
    // p0 + s*e = q + t*d  =>  s*(e x d) = (q - p0) x d
    let denom = e.perp_dot(&d);
    if denom.abs() <= tol.singular * e.length() * d.length() {
        return None;
    }
    let s = (q - p0).perp_dot(&d) / denom;
    Some(p0 + e * s)
}

/// Whether `point` lies on the closed segment `segment`.
pub fn point_on_line(point: Point2d, segment: [Point2d; 2], tol: f64) -> bool {
    let [p0, p1] = segment;
    let dir = p1 - p0;
    let rel = point - p0;
    let len_sq = dir.dot(&dir);
    if len_sq <= tol * tol {
        return point.distance_to(&p0) <= tol;
    }
    if rel.perp_dot(&dir).abs() > tol * len_sq.sqrt() {
        return false;
    }
    let coef = rel.dot(&dir) / len_sq;
    (-tol..=1.0 + tol).contains(&coef)
}

// ─── Plane-Plane Intersection ───────────────────────────────────────────────

/// Normal of the plane through the first three `corners`:
/// `(c1 - c0) x (c2 - c0)`, unnormalized.
pub fn plane_normal(corners: &[Point3d]) -> Result<Vec3, GeometryError> {
    match corners {
        [c0, c1, c2, ..] => Ok((*c1 - *c0).cross(&(*c2 - *c0))),
        _ => Err(GeometryError::MissingState {
            expected: 3,
            found: corners.len(),
        }),
    }
}

/// Intersect the planes spanned by two corner sets (world coordinates).
///
/// The point is the solution of `[n1; n2; n1 x n2] x = [n1.c0, n2.c0', 0]`,
/// i.e. the point of the line closest to the world origin.
pub fn get_intersection_line_and_point_of_two_planes(
    first: &[Point3d],
    second: &[Point3d],
    tol: &Tolerance,
) -> Result<IntersectionLine, GeometryError> {
    let n1 = plane_normal(first)?;
    let n2 = plane_normal(second)?;
    let direction = n1.cross(&n2);
    if direction.length() < tol.parallel {
        debug!(?n1, ?n2, "planes are parallel");
        return Err(GeometryError::Degenerate {
            what: "parallel planes",
        });
    }

    let d1 = -n1.dot(&first[0].to_vec3());
    let d2 = -n2.dot(&second[0].to_vec3());

    #[rustfmt::skip]
    let system = Matrix3::new(
        n1.x, n1.y, n1.z,
        n2.x, n2.y, n2.z,
        direction.x, direction.y, direction.z,
    );
    let rank = system.rank(tol.rank);
    if rank < 3 {
        return Err(GeometryError::RankDeficient { rank });
    }
    let solution = system
        .lu()
        .solve(&Vector3::new(-d1, -d2, 0.0))
        .ok_or(GeometryError::RankDeficient { rank })?;

    Ok(IntersectionLine {
        point: Point3d::new(solution.x, solution.y, solution.z),
        direction,
    })
}
