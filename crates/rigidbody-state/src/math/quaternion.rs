//! Quaternion operations for attitude representation
//!
//! Implements the maps between unit quaternions and exponential coordinates
//! (axis × angle vectors):
//! - Logarithm of a relative rotation: χ = log(q₂⁻¹ ⊗ q₁)
//! - Exponential map: q = exp(χ)
//! - Fixed-order `[w, x, y, z]` arrays for external records

use nalgebra::{Quaternion, Unit};

use crate::{Quat, Vec3};

/// Below this imaginary-part norm the relative rotation uses the small-angle limit
const SMALL_ANGLE_EPS: f64 = 1e-12;

/// Exponential coordinates of `q1 - q2`, i.e. of the relative rotation q₂⁻¹ ⊗ q₁
///
/// With the relative quaternion written as (w, v):
///
/// χ = 2·atan2(‖v‖, w) · v/‖v‖
///
/// The relative quaternion is first flipped into the w ≥ 0 hemisphere, so
/// `q` and `-q` give the same result and the angle stays within [0, π].
///
/// # Arguments
/// * `q1` - Rotation being measured
/// * `q2` - Reference rotation
///
/// # Returns
/// Rotation vector [rad] expressed in the frame of `q2`
pub fn quaternion_difference(q1: &Quat, q2: &Quat) -> Vec3 {
    let delta_q = q2.inverse() * q1;

    let (w, v) = if delta_q.w < 0.0 {
        (-delta_q.w, -delta_q.imag())
    } else {
        (delta_q.w, delta_q.imag())
    };

    let v_norm = v.norm();

    if v_norm < SMALL_ANGLE_EPS {
        // atan2(n, w) / n → 1 / w
        return v * (2.0 / w);
    }

    v * (2.0 * v_norm.atan2(w) / v_norm)
}

/// Exponential map from a rotation vector to a unit quaternion
///
/// Rotation of angle ‖χ‖ about axis χ/‖χ‖. A zero vector maps to identity.
pub fn quaternion_exp(chi: &Vec3) -> Quat {
    let angle = chi.norm();

    if angle == 0.0 {
        return Quat::identity();
    }

    Quat::from_axis_angle(&Unit::new_unchecked(chi / angle), angle)
}

/// Quaternion to `[w, x, y, z]` array
///
/// Bit-exact copy of the four components.
pub fn quaternion_to_array(q: &Quat) -> [f64; 4] {
    [q.w, q.i, q.j, q.k]
}

/// `[w, x, y, z]` array to quaternion
///
/// The components are taken as-is without renormalization, so a round trip
/// through [`quaternion_to_array`] is exact. The caller is responsible for
/// passing a unit quaternion.
pub fn array_to_quaternion(q: &[f64; 4]) -> Quat {
    Quat::new_unchecked(Quaternion::new(q[0], q[1], q[2], q[3]))
}
