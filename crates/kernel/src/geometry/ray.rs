use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::transform::Transform;
use super::vector::Vec3;

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point3d,
    pub direction: Vec3,
}

impl Ray {
    /// Builds a ray, normalizing `direction`. A zero direction is kept as
    /// zero and such a ray hits nothing.
    pub fn new(origin: Point3d, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalized().unwrap_or(Vec3::ZERO),
        }
    }

    pub fn at(&self, t: f64) -> Point3d {
        self.origin + self.direction * t
    }

    /// Carry the ray into the local space of `world`.
    ///
    /// The origin goes through the inverse transform, the direction through
    /// the transposed linear part and is renormalized. Returns None when
    /// `world` is singular or the mapped direction vanishes.
    pub fn to_local(&self, world: &Transform) -> Option<Ray> {
        let inverse = world.inverse()?;
        let origin = inverse.transform_point(&self.origin);
        let direction = world.transpose_transform_vector(&self.direction).normalized()?;
        Some(Ray { origin, direction })
    }
}
