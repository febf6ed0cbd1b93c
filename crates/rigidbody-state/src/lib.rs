//! # Rigid Body State
//!
//! Kinematic state of a single rigid body for attitude and navigation estimators.
//!
//! The state keeps attitude in two places: a persistent unit quaternion and a
//! 3-element exponential-coordinate perturbation (chi) stored inside the numeric
//! state vector. Estimators write small rotational corrections into chi and fold
//! them into the quaternion, which avoids both gimbal lock and quaternion drift.
//!
//! ## Modules
//!
//! - [`math`]: Mathematical utilities (skew matrix, quaternion differencing and exponential map)
//! - [`state`]: [`RigidBodyState`], its composition algebra, and external record formats
//! - [`config`]: Fold policy for the chi perturbation

pub mod config;
pub mod math;
pub mod state;

pub use config::FoldPolicy;
pub use state::{PoseRecord, RigidBodyState, RigidTransform, StateError};

// Common type aliases
use nalgebra::{Matrix3, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f64>;

/// Unit quaternion type for rotations
pub type Quat = UnitQuaternion<f64>;

/// Standard gravity [m/s²]
pub const GRAVITY: f64 = 9.80665;

/// Nominal air density [kg/m³]
pub const AIR_DENSITY: f64 = 1.2;

/// Gravity vector in ENU convention: z-up, so gravity points along -z
pub fn gravity_enu() -> Vec3 {
    -GRAVITY * Vec3::z()
}
