//! Mathematical utilities for rigid body state
//!
//! Stateless helpers for SO(3): the hat operator, quaternion differencing
//! into exponential coordinates, the exponential map back to a quaternion,
//! and the fixed-order array form used by external records.

pub mod quaternion;
pub mod rotation;

pub use quaternion::*;
pub use rotation::*;
