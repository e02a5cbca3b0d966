pub mod config;
pub mod control_point;
pub mod dissection;
pub mod error;
pub mod geometry;
pub mod picker;
pub mod scene;
pub mod shapes;
pub mod store;

// Re-export the main entry points at crate root for convenience.
pub use config::{ConfigError, EditorConfig};
pub use error::{GeometryError, SceneError};
pub use geometry::point::{Point2d, Point3d};
pub use geometry::ray::Ray;
pub use geometry::transform::{BakeState, Placement, Transform};
pub use geometry::vector::{Vec2, Vec3};
pub use picker::{PickHit, PickTarget};
pub use scene::Scene;
pub use shapes::{Shape, ShapeKind};
pub use store::{ControlPointId, ShapeId, ShapeStore};

/// Numeric thresholds shared by the geometric algorithms.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Cross products of plane normals shorter than this mean parallel planes.
    pub parallel: f64,
    /// Singular values below this do not count toward a matrix rank.
    pub rank: f64,
    /// Slack for parameters and distances in segment tests.
    pub parametric: f64,
    /// Relative threshold below which a 2x2 determinant is singular.
    pub singular: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            parallel: 1e-6,
            rank: 1e-9,
            parametric: 1e-9,
            singular: 1e-12,
        }
    }
}
