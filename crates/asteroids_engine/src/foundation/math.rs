//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the handful of 2D-in-3D helpers the
//! simulation needs. Matrices follow nalgebra's column-vector convention:
//! `T * R * S` scales first, then rotates, then translates.

pub use nalgebra::{Matrix4, Point3 as NPoint3, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = NPoint3<f32>;

/// Math constants
pub mod constants {
    /// Pi as f32
    pub const PI: f32 = std::f32::consts::PI;

    /// Tau (2 * pi) as f32
    pub const TAU: f32 = std::f32::consts::TAU;
}

/// Convert degrees to radians
#[must_use]
pub fn radians(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Rotation about +Z by `angle` radians (counter-clockwise in XY)
#[must_use]
pub fn rotation_z(angle: f32) -> Mat4 {
    Mat4::new_rotation(Vec3::new(0.0, 0.0, angle))
}

/// Rotate a vector about +Z by `angle` radians
#[must_use]
pub fn rotate_z(v: &Vec3, angle: f32) -> Vec3 {
    rotation_z(angle).transform_vector(v)
}

/// Pure translation matrix
#[must_use]
pub fn translation(position: &Vec3) -> Mat4 {
    Mat4::new_translation(position)
}

/// Translation, then rotation about Z, then uniform scale, composed for
/// column vectors
#[must_use]
pub fn trs_z(position: &Vec3, angle: f32, scale: f32) -> Mat4 {
    translation(position) * rotation_z(angle) * Mat4::new_scaling(scale)
}
