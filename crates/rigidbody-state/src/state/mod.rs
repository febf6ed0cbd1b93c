//! Rigid body state and its external record formats
//!
//! - [`RigidBodyState`]: state vector plus orientation, with the chi fold algebra
//! - [`PoseRecord`] / [`RigidTransform`]: fixed-layout records exchanged with other processes

pub mod error;
pub mod records;
pub mod rigid_body;

pub use error::*;
pub use records::*;
pub use rigid_body::*;
