//! 2D math helpers layered on top of `glam`.

use glam::{DMat2, DVec2};

/// Two-component double precision vector used for every position, velocity and force.
pub type Vector2 = DVec2;

/// Rotation matrix for a body orientation.
pub type Rotation = DMat2;

/// 2D cross products that `glam` does not name.
pub trait Vector2Ext: Sized {
    /// `self × rhs`, the z component of the 3D cross product.
    fn cross(self, rhs: Self) -> f64;

    /// `s × v`, treating `s` as a vector along +z.
    fn scalar_cross(s: f64, v: Self) -> Self;

    /// True when both components are finite.
    fn is_finite_vec(self) -> bool;
}

impl Vector2Ext for DVec2 {
    #[inline]
    fn cross(self, rhs: Self) -> f64 {
        self.perp_dot(rhs)
    }

    #[inline]
    fn scalar_cross(s: f64, v: Self) -> Self {
        DVec2::new(-s * v.y, s * v.x)
    }

    #[inline]
    fn is_finite_vec(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Rotation matrix for an orientation in radians.
#[inline]
pub fn rotation(angle: f64) -> Rotation {
    DMat2::from_angle(angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn cross_products_follow_right_hand_rule() {
        let x = Vector2::X;
        let y = Vector2::Y;
        assert_abs_diff_eq!(x.cross(y), 1.0);
        assert_abs_diff_eq!(y.cross(x), -1.0);

        // ω × r for a counter-clockwise spin moves +x toward +y.
        let v = Vector2::scalar_cross(2.0, x);
        assert_abs_diff_eq!(v.x, 0.0);
        assert_abs_diff_eq!(v.y, 2.0);
    }

    #[test]
    fn rotation_matches_angle() {
        let r = rotation(FRAC_PI_2);
        let v = r * Vector2::X;
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.y, 1.0, epsilon = 1e-12);

        let back = r.transpose() * v;
        assert_abs_diff_eq!(back.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(back.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn normalize_and_clamp_come_from_glam() {
        assert_eq!(Vector2::ZERO.normalize_or_zero(), Vector2::ZERO);
        let clamped = Vector2::new(30.0, 40.0).clamp_length_max(5.0);
        assert_abs_diff_eq!(clamped.length(), 5.0, epsilon = 1e-12);
        assert!(!Vector2::new(f64::NAN, 0.0).is_finite_vec());
    }
}
