pub mod aabb;
pub mod frame;
pub mod intersection;
pub mod point;
pub mod ray;
pub mod transform;
pub mod vector;
