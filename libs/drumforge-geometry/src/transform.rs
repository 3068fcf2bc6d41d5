//! # Rigid Transforms
//!
//! Rotation-plus-translation maps and their composition. Constructors only
//! produce rigid motions, so applying a [`Transform`] to a [`crate::Solid`]
//! never mirrors it and keeps it manifold.
//!
//! Composition order is always spelled out: `a.then(b)` applies `a` first,
//! then `b`. The `*` operator follows matrix convention, so `b * a` is the
//! same map as `a.then(b)`.

use glam::{DMat4, DVec3};
use std::ops::Mul;

/// A rigid affine map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: DMat4,
}

impl Transform {
    /// The identity map.
    pub const IDENTITY: Transform = Transform {
        matrix: DMat4::IDENTITY,
    };

    /// Translation by `offset`.
    pub fn translation(offset: DVec3) -> Self {
        Self {
            matrix: DMat4::from_translation(offset),
        }
    }

    /// Rotation about the X axis (radians, right-handed).
    pub fn rotation_x(angle: f64) -> Self {
        Self {
            matrix: DMat4::from_rotation_x(angle),
        }
    }

    /// Rotation about the Y axis (radians, right-handed).
    pub fn rotation_y(angle: f64) -> Self {
        Self {
            matrix: DMat4::from_rotation_y(angle),
        }
    }

    /// Rotation about the Z axis (radians, right-handed).
    pub fn rotation_z(angle: f64) -> Self {
        Self {
            matrix: DMat4::from_rotation_z(angle),
        }
    }

    /// Rotation by `angles.x` about X, then `angles.y` about Y, then
    /// `angles.z` about Z.
    pub fn rotation_xyz(angles: DVec3) -> Self {
        Self::rotation_x(angles.x)
            .then(Self::rotation_y(angles.y))
            .then(Self::rotation_z(angles.z))
    }

    /// Applies `self` first, then `next`.
    #[must_use]
    pub fn then(self, next: Transform) -> Transform {
        Transform {
            matrix: next.matrix * self.matrix,
        }
    }

    /// The inverse motion.
    pub fn inverse(&self) -> Transform {
        Transform {
            matrix: self.matrix.inverse(),
        }
    }

    /// Maps a point.
    pub fn apply_point(&self, point: DVec3) -> DVec3 {
        self.matrix.transform_point3(point)
    }

    /// Maps a direction (ignores translation).
    pub fn apply_vector(&self, vector: DVec3) -> DVec3 {
        self.matrix.transform_vector3(vector)
    }

    /// Underlying column-major matrix.
    pub fn matrix(&self) -> &DMat4 {
        &self.matrix
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;

    /// `self * rhs` applies `rhs` first.
    fn mul(self, rhs: Transform) -> Transform {
        rhs.then(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn order_matters() {
        let rotate = Transform::rotation_z(FRAC_PI_2);
        let translate = Transform::translation(DVec3::X);

        let rotate_then_translate = rotate.then(translate).apply_point(DVec3::X);
        let translate_then_rotate = translate.then(rotate).apply_point(DVec3::X);

        assert_abs_diff_eq!(rotate_then_translate.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rotate_then_translate.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(translate_then_rotate.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(translate_then_rotate.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn mul_matches_then() {
        let a = Transform::rotation_x(0.3);
        let b = Transform::translation(DVec3::new(1.0, 2.0, 3.0));
        let p = DVec3::new(0.5, -1.0, 2.0);
        let via_then = a.then(b).apply_point(p);
        let via_mul = (b * a).apply_point(p);
        assert_abs_diff_eq!(via_then.distance(via_mul), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn identity_is_neutral() {
        let t = Transform::rotation_xyz(DVec3::new(0.1, 0.2, 0.3));
        let p = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(t.then(Transform::IDENTITY).apply_point(p), t.apply_point(p));
        assert_eq!(Transform::IDENTITY.then(t).apply_point(p), t.apply_point(p));
    }

    #[test]
    fn rotation_xyz_applies_x_first() {
        let t = Transform::rotation_xyz(DVec3::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        // Y -> Z under X rotation, Z is fixed by the Z rotation.
        let p = t.apply_point(DVec3::Y);
        assert_abs_diff_eq!(p.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn inverse_round_trips() {
        let t = Transform::rotation_y(1.1).then(Transform::translation(DVec3::splat(4.0)));
        let p = DVec3::new(-3.0, 0.25, 7.0);
        let back = t.inverse().apply_point(t.apply_point(p));
        assert_abs_diff_eq!(back.distance(p), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rigid_preserves_lengths() {
        let t = Transform::rotation_xyz(DVec3::new(0.4, -1.2, 2.5));
        let v = DVec3::new(3.0, 4.0, 12.0);
        assert_abs_diff_eq!(t.apply_vector(v).length(), 13.0, epsilon = 1e-12);
    }
}
