//! Affine rigid frames
//!
//! A [`Mat4`] stores an orthonormal basis as three row axes (`front`, `up`,
//! `right`) plus a position. Points are treated as row vectors, so
//! `a * b` applies `a` first and then `b`: a child's global frame is
//! `child_local * parent_global`.

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

use crate::Vec3;

/// Affine rigid frame (rotation rows plus translation)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat4 {
    /// Local X axis expressed in the parent space
    pub front: Vec3,
    /// Local Y axis expressed in the parent space
    pub up: Vec3,
    /// Local Z axis expressed in the parent space
    pub right: Vec3,
    /// Origin expressed in the parent space
    pub posit: Vec3,
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    /// Identity frame
    pub const IDENTITY: Self = Self {
        front: Vec3::X,
        up: Vec3::Y,
        right: Vec3::Z,
        posit: Vec3::ZERO,
    };

    /// Create a frame from its three axes and a position
    #[inline]
    pub const fn from_axes(front: Vec3, up: Vec3, right: Vec3, posit: Vec3) -> Self {
        Self { front, up, right, posit }
    }

    /// Pure translation
    #[inline]
    pub const fn from_translation(posit: Vec3) -> Self {
        Self {
            front: Vec3::X,
            up: Vec3::Y,
            right: Vec3::Z,
            posit,
        }
    }

    /// Rotation about the X axis
    pub fn pitch(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_axes(
            Vec3::X,
            Vec3::new(0.0, c, s),
            Vec3::new(0.0, -s, c),
            Vec3::ZERO,
        )
    }

    /// Rotation about the Y axis
    pub fn yaw(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_axes(
            Vec3::new(c, 0.0, -s),
            Vec3::Y,
            Vec3::new(s, 0.0, c),
            Vec3::ZERO,
        )
    }

    /// Rotation about the Z axis
    pub fn roll(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_axes(
            Vec3::new(c, s, 0.0),
            Vec3::new(-s, c, 0.0),
            Vec3::Z,
            Vec3::ZERO,
        )
    }

    /// Combined rotation `pitch * yaw * roll` with a translation
    pub fn from_pitch_yaw_roll(pitch: f32, yaw: f32, roll: f32, posit: Vec3) -> Self {
        let mut m = Self::pitch(pitch) * Self::yaw(yaw) * Self::roll(roll);
        m.posit = posit;
        m
    }

    /// Return a copy with a different position
    #[inline]
    pub fn with_posit(mut self, posit: Vec3) -> Self {
        self.posit = posit;
        self
    }

    /// Rotate a direction (no translation)
    #[inline]
    pub fn rotate_vector(&self, v: Vec3) -> Vec3 {
        self.front * v.x + self.up * v.y + self.right * v.z
    }

    /// Inverse-rotate a direction (express a parent-space direction locally)
    #[inline]
    pub fn unrotate_vector(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.front), v.dot(self.up), v.dot(self.right))
    }

    /// Transform a point from local space into parent space
    #[inline]
    pub fn transform_vector(&self, p: Vec3) -> Vec3 {
        self.rotate_vector(p) + self.posit
    }

    /// Transform a point from parent space into local space
    #[inline]
    pub fn untransform_vector(&self, p: Vec3) -> Vec3 {
        self.unrotate_vector(p - self.posit)
    }

    /// Inverse of a rigid frame
    pub fn inverse(&self) -> Self {
        let front = Vec3::new(self.front.x, self.up.x, self.right.x);
        let up = Vec3::new(self.front.y, self.up.y, self.right.y);
        let right = Vec3::new(self.front.z, self.up.z, self.right.z);
        let posit = -self.unrotate_vector(self.posit);
        Self { front, up, right, posit }
    }

    /// Compare two frames axis by axis within `epsilon`
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.front.approx_eq(other.front, epsilon)
            && self.up.approx_eq(other.up, epsilon)
            && self.right.approx_eq(other.right, epsilon)
            && self.posit.approx_eq(other.posit, epsilon)
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Self;

    /// Compose frames: `self` is applied first, then `other`
    fn mul(self, other: Self) -> Self {
        Self {
            front: other.rotate_vector(self.front),
            up: other.rotate_vector(self.up),
            right: other.rotate_vector(self.right),
            posit: other.transform_vector(self.posit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_identity_transform() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Mat4::IDENTITY.transform_vector(p), p);
    }

    #[test]
    fn test_roll_maps_x_to_y() {
        let m = Mat4::roll(FRAC_PI_2);
        let result = m.rotate_vector(Vec3::X);
        assert!(result.approx_eq(Vec3::Y, EPSILON), "got {:?}", result);
    }

    #[test]
    fn test_pitch_maps_y_to_z() {
        let m = Mat4::pitch(FRAC_PI_2);
        let result = m.rotate_vector(Vec3::Y);
        assert!(result.approx_eq(Vec3::Z, EPSILON), "got {:?}", result);
    }

    #[test]
    fn test_yaw_maps_z_to_x() {
        let m = Mat4::yaw(FRAC_PI_2);
        let result = m.rotate_vector(Vec3::Z);
        assert!(result.approx_eq(Vec3::X, EPSILON), "got {:?}", result);
    }

    #[test]
    fn test_mul_applies_left_first() {
        // Rotate then translate: the point is rotated about the origin first
        let rotate = Mat4::roll(FRAC_PI_2);
        let translate = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let m = rotate * translate;

        let result = m.transform_vector(Vec3::X);
        assert!(result.approx_eq(Vec3::new(10.0, 1.0, 0.0), EPSILON), "got {:?}", result);
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = Mat4::from_pitch_yaw_roll(0.3, -1.1, 0.7, Vec3::new(1.0, -2.0, 3.5));
        let p = Vec3::new(0.25, 4.0, -3.0);

        let back = m.inverse().transform_vector(m.transform_vector(p));
        assert!(back.approx_eq(p, EPSILON), "got {:?}", back);

        let product = m * m.inverse();
        assert!(product.approx_eq(&Mat4::IDENTITY, EPSILON));
    }

    #[test]
    fn test_untransform_matches_inverse() {
        let m = Mat4::from_pitch_yaw_roll(0.5, 0.2, -0.4, Vec3::new(3.0, 1.0, -1.0));
        let p = Vec3::new(-2.0, 0.5, 7.0);
        assert!(m.untransform_vector(p).approx_eq(m.inverse().transform_vector(p), EPSILON));
    }

    #[test]
    fn test_with_posit() {
        let m = Mat4::roll(0.3).with_posit(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.posit, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.right, Vec3::Z);
    }
}
