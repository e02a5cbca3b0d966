use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::ray::Ray;
use super::transform::Transform;
use super::vector::Vec3;

/// Axis-aligned box collider.
///
/// `min_point <= max_point` holds componentwise after every operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min_point: Point3d,
    pub max_point: Point3d,
}

impl Aabb {
    /// Builds a box from two opposite corners in any order.
    pub fn new(a: Point3d, b: Point3d) -> Self {
        Self {
            min_point: Point3d::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max_point: Point3d::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// A cube of half-extent `half` centred at `center`.
    pub fn cube(center: Point3d, half: f64) -> Self {
        let h = Vec3::new(half, half, half);
        Self::new(center - h, center + h)
    }

    /// Smallest box containing `points`, grown by `padding` on every side.
    pub fn from_points(points: &[Point3d], padding: f64) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bb = Self::new(*first, *first);
        for p in rest {
            bb.include_point(p);
        }
        let pad = Vec3::new(padding, padding, padding);
        Some(Self::new(bb.min_point - pad, bb.max_point + pad))
    }

    pub fn include_point(&mut self, p: &Point3d) {
        self.min_point = Point3d::new(
            self.min_point.x.min(p.x),
            self.min_point.y.min(p.y),
            self.min_point.z.min(p.z),
        );
        self.max_point = Point3d::new(
            self.max_point.x.max(p.x),
            self.max_point.y.max(p.y),
            self.max_point.z.max(p.z),
        );
    }

    pub fn center(&self) -> Point3d {
        self.min_point.midpoint(&self.max_point)
    }

    pub fn contains_point(&self, p: &Point3d) -> bool {
        p.x >= self.min_point.x
            && p.x <= self.max_point.x
            && p.y >= self.min_point.y
            && p.y <= self.max_point.y
            && p.z >= self.min_point.z
            && p.z <= self.max_point.z
    }

    pub fn corners(&self) -> [Point3d; 8] {
        let (lo, hi) = (self.min_point, self.max_point);
        [0, 1, 2, 3, 4, 5, 6, 7].map(|i| {
            Point3d::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            )
        })
    }

    /// Axis-aligned box around this box's corners mapped through `transform`.
    pub fn transformed(&self, transform: &Transform) -> Self {
        let corners = self.corners().map(|c| transform.transform_point(&c));
        let mut bb = Self::new(corners[0], corners[0]);
        for c in &corners[1..] {
            bb.include_point(c);
        }
        bb
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut bb = *self;
        bb.include_point(&other.min_point);
        bb.include_point(&other.max_point);
        bb
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.min_point = self.min_point + offset;
        self.max_point = self.max_point + offset;
    }

    /// Scale about the box center. A negative factor swaps the extremes,
    /// which are re-sorted.
    pub fn scale(&mut self, factor: f64) {
        let c = self.center();
        let a = c + (self.min_point - c) * factor;
        let b = c + (self.max_point - c) * factor;
        *self = Self::new(a, b);
    }

    /// Distance from the ray origin to the box surface, or None on a miss.
    ///
    /// The box lives in the local space of `world`. When the local ray
    /// origin is inside the box the exit face is reported.
    pub fn ray_hit(&self, ray: &Ray, world: &Transform) -> Option<f64> {
        let local = ray.to_local(world)?;
        let t = self.slab_exit_or_entry(&local)?;
        let hit = world.transform_point(&local.at(t));
        Some(ray.origin.distance_to(&hit))
    }

    fn slab_exit_or_entry(&self, ray: &Ray) -> Option<f64> {
        let mut tmin = f64::NEG_INFINITY;
        let mut tmax = f64::INFINITY;

        let origin = ray.origin.to_array();
        let dir = ray.direction.to_array();
        let min = self.min_point.to_array();
        let max = self.max_point.to_array();

        for i in 0..3 {
            if dir[i].abs() < 1e-15 {
                if origin[i] < min[i] || origin[i] > max[i] {
                    return None;
                }
            } else {
                let inv_d = 1.0 / dir[i];
                let mut t0 = (min[i] - origin[i]) * inv_d;
                let mut t1 = (max[i] - origin[i]) * inv_d;
                if inv_d < 0.0 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                tmin = tmin.max(t0);
                tmax = tmax.min(t1);
                if tmax < tmin {
                    return None;
                }
            }
        }

        if tmax < 0.0 {
            None
        } else if tmin < 0.0 {
            Some(tmax)
        } else {
            Some(tmin)
        }
    }
}
