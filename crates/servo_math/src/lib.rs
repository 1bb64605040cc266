//! 3D Mathematics Library
//!
//! This crate provides the vector and rigid-frame types shared by the
//! physics, scene and vehicle crates.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Mat4`] - Affine rigid frame (front/up/right axes plus a position)
//! - [`Aabb`] - Axis-aligned bounding box

mod vec3;
pub mod mat4;
pub mod aabb;

pub use vec3::Vec3;
pub use mat4::Mat4;
pub use aabb::Aabb;

/// Degrees to radians conversion factor
pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;

/// Sign of a scalar, treating zero as positive
///
/// Returns `1.0` for `x >= 0.0` and `-1.0` otherwise.
#[inline]
pub fn sign(x: f32) -> f32 {
    if x >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_of_zero_is_positive() {
        assert_eq!(sign(0.0), 1.0);
        assert_eq!(sign(2.5), 1.0);
        assert_eq!(sign(-0.001), -1.0);
    }

    #[test]
    fn test_deg_to_rad() {
        assert!((180.0 * DEG_TO_RAD - std::f32::consts::PI).abs() < 1e-6);
    }
}
