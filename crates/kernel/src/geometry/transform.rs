use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;

/// A 4x4 affine transformation matrix stored in column-major order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Column-major 4x4 matrix entries.
    pub m: [f64; 16],
}

impl Transform {
    pub fn identity() -> Self {
        Self::scaling(1.0, 1.0, 1.0)
    }

    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        #[rustfmt::skip]
        let m = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            dx,  dy,  dz,  1.0,
        ];
        Self { m }
    }

    pub fn from_translation_vec(v: Vec3) -> Self {
        Self::translation(v.x, v.y, v.z)
    }

    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Self {
        #[rustfmt::skip]
        let m = [
            sx,  0.0, 0.0, 0.0,
            0.0, sy,  0.0, 0.0,
            0.0, 0.0, sz,  0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { m }
    }

    pub fn uniform_scaling(s: f64) -> Self {
        Self::scaling(s, s, s)
    }

    /// Rotation around the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        #[rustfmt::skip]
        let m = [
            c,   0.0, -s,  0.0,
            0.0, 1.0, 0.0, 0.0,
            s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { m }
    }

    /// Matrix element access (row, col), 0-indexed.
    fn at(&self, row: usize, col: usize) -> f64 {
        self.m[col * 4 + row]
    }

    /// The translation column.
    pub fn translation_part(&self) -> Vec3 {
        Vec3::new(self.m[12], self.m[13], self.m[14])
    }

    /// Transform a point (applies translation).
    pub fn transform_point(&self, p: &Point3d) -> Point3d {
        let t = self.translation_part();
        Point3d::ORIGIN + self.transform_vector(&p.to_vec3()) + t
    }

    /// Transform a vector (no translation).
    pub fn transform_vector(&self, v: &Vec3) -> Vec3 {
        let row = |r: usize| self.at(r, 0) * v.x + self.at(r, 1) * v.y + self.at(r, 2) * v.z;
        Vec3::new(row(0), row(1), row(2))
    }

    /// Multiply a vector by the transpose of the 3x3 linear part.
    ///
    /// For a rigid view matrix this is the inverse rotation, which is how
    /// ray directions are carried into local space.
    pub fn transpose_transform_vector(&self, v: &Vec3) -> Vec3 {
        let col = |c: usize| self.at(0, c) * v.x + self.at(1, c) * v.y + self.at(2, c) * v.z;
        Vec3::new(col(0), col(1), col(2))
    }

    /// Compose two transforms: self * other.
    pub fn then(&self, other: &Transform) -> Transform {
        Self::from_matrix(&(self.to_matrix() * other.to_matrix()))
    }

    /// Compute the inverse transform. Returns None if the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        self.to_matrix()
            .try_inverse()
            .map(|inv| Self::from_matrix(&inv))
    }

    pub fn to_matrix(&self) -> Matrix4<f64> {
        Matrix4::from_column_slice(&self.m)
    }

    pub fn from_matrix(matrix: &Matrix4<f64>) -> Self {
        let mut m = [0.0f64; 16];
        m.copy_from_slice(matrix.as_slice());
        Self { m }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Whether a placement still carries an un-absorbed edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BakeState {
    /// Both matrices are identity; raw corners are world coordinates.
    Baked,
    /// A translation or scaling has been applied since the last bake.
    Edited,
}

/// Translation and scaling of a shape, kept as two separate matrices.
///
/// The world transform is always `translation * scaling`. Edits move the
/// placement to [`BakeState::Edited`]; [`Placement::bake`] writes the world
/// transform into raw corners and returns to [`BakeState::Baked`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    translation: Transform,
    scaling: Transform,
    state: BakeState,
}

impl Placement {
    pub fn identity() -> Self {
        Self {
            translation: Transform::identity(),
            scaling: Transform::identity(),
            state: BakeState::Baked,
        }
    }

    /// A placement translated to `position`.
    pub fn at(position: Point3d) -> Self {
        let mut placement = Self::identity();
        placement.translate(position.to_vec3());
        placement
    }

    pub fn state(&self) -> BakeState {
        self.state
    }

    pub fn is_baked(&self) -> bool {
        self.state == BakeState::Baked
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.translation = self.translation.then(&Transform::from_translation_vec(offset));
        self.state = BakeState::Edited;
    }

    pub fn scale(&mut self, factor: f64) {
        self.scaling = self.scaling.then(&Transform::uniform_scaling(factor));
        self.state = BakeState::Edited;
    }

    /// Uniform scale factor accumulated so far.
    pub fn scale_factor(&self) -> f64 {
        self.scaling.m[0]
    }

    pub fn world(&self) -> Transform {
        self.translation.then(&self.scaling)
    }

    /// Position of the local origin in world space.
    pub fn position(&self) -> Point3d {
        Point3d::ORIGIN + self.translation.translation_part()
    }

    pub fn apply(&self, p: &Point3d) -> Point3d {
        self.world().transform_point(p)
    }

    /// Absorb the world transform into `corners` and reset to identity.
    pub fn bake(&mut self, corners: &mut [Point3d]) {
        let world = self.world();
        for corner in corners.iter_mut() {
            *corner = world.transform_point(corner);
        }
        self.reset();
    }

    /// Reset both matrices to identity; the caller guarantees the corners
    /// already hold world coordinates.
    pub fn reset(&mut self) {
        *self = Self::identity();
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}
