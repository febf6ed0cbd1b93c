//! Error types for rigid body state validation

use thiserror::Error;

/// Errors reported by the fallible state constructors and validity checks
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    #[error("Invalid state dimension: expected {expected}, got {got}")]
    InvalidStateDimension { expected: usize, got: usize },
    #[error("State vector element {index} is NaN")]
    NanComponent { index: usize },
    #[error("Orientation is not a unit quaternion (norm {norm})")]
    NonUnitQuaternion { norm: f64 },
}
