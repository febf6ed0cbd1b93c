//! Rigid body state with error-state attitude
//!
//! The numeric state vector holds five 3-element fields at fixed offsets:
//!
//! ```text
//! [ ω (0..3) | v (3..6) | χ (6..9) | p (9..12) | a (12..15) | augmented states... ]
//! ```
//!
//! where:
//! - ω: angular velocity [rad/s]
//! - v: velocity [m/s]
//! - χ: pending attitude perturbation in exponential coordinates [rad]
//! - p: position [m]
//! - a: acceleration [m/s²]
//!
//! The attitude itself lives in a unit quaternion outside the vector. χ is a
//! scratch slot: it is zero between operations and is folded into the
//! quaternion by [`RigidBodyState::chi_to_quat`].

use std::ops::{AddAssign, SubAssign};

use nalgebra::{DVector, Dyn, VectorView3, VectorViewMut3, U1};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::config::FoldPolicy;
use crate::math::{quaternion_difference, quaternion_exp};
use crate::state::StateError;
use crate::{Quat, Vec3};

/// Read-only view of one 3-element field of the state vector
pub type Block3<'a> = VectorView3<'a, f64, U1, Dyn>;

/// Mutable view of one 3-element field of the state vector
pub type Block3Mut<'a> = VectorViewMut3<'a, f64, U1, Dyn>;

/// Rigid body state: numeric state vector, orientation and time tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRigidBodyState")]
pub struct RigidBodyState {
    /// State vector (see module docs for the layout)
    vec: DVector<f64>,
    /// Orientation (body to world)
    quat: Quat,
    /// Timestamp [µs]
    pub utime: i64,
}

/// Unchecked serialized form of [`RigidBodyState`]
#[derive(Deserialize)]
struct RawRigidBodyState {
    vec: DVector<f64>,
    quat: Quat,
    utime: i64,
}

impl TryFrom<RawRigidBodyState> for RigidBodyState {
    type Error = StateError;

    fn try_from(raw: RawRigidBodyState) -> Result<Self, Self::Error> {
        if raw.vec.len() < Self::BASIC_NUM_STATES {
            return Err(StateError::InvalidStateDimension {
                expected: Self::BASIC_NUM_STATES,
                got: raw.vec.len(),
            });
        }
        Ok(Self {
            vec: raw.vec,
            quat: raw.quat,
            utime: raw.utime,
        })
    }
}

impl Default for RigidBodyState {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBodyState {
    pub const ANGULAR_VELOCITY_IND: usize = 0;
    pub const VELOCITY_IND: usize = 3;
    pub const CHI_IND: usize = 6;
    pub const POSITION_IND: usize = 9;
    pub const ACCELERATION_IND: usize = 12;
    pub const BASIC_NUM_STATES: usize = 15;

    /// Zero state with identity orientation
    pub fn new() -> Self {
        Self::with_dimension(Self::BASIC_NUM_STATES)
    }

    /// Zero state with `state_dim` elements
    ///
    /// Elements past [`Self::BASIC_NUM_STATES`] are augmented states owned by
    /// the estimator. They take part in composition and NaN checks like the
    /// basic fields.
    ///
    /// # Panics
    /// If `state_dim` is smaller than [`Self::BASIC_NUM_STATES`].
    pub fn with_dimension(state_dim: usize) -> Self {
        assert!(
            state_dim >= Self::BASIC_NUM_STATES,
            "state dimension {} is smaller than the basic {} states",
            state_dim,
            Self::BASIC_NUM_STATES
        );
        Self {
            vec: DVector::zeros(state_dim),
            quat: Quat::identity(),
            utime: 0,
        }
    }

    /// State from a raw vector whose χ is folded into an identity orientation
    ///
    /// # Panics
    /// If `vec` does not have exactly [`Self::BASIC_NUM_STATES`] elements.
    pub fn from_vector(vec: DVector<f64>) -> Self {
        assert_eq!(vec.len(), Self::BASIC_NUM_STATES);
        let mut state = Self {
            vec,
            quat: Quat::identity(),
            utime: 0,
        };
        state.chi_to_quat();
        state
    }

    /// Fallible version of [`Self::from_vector`]
    pub fn try_from_vector(vec: DVector<f64>) -> Result<Self, StateError> {
        if vec.len() != Self::BASIC_NUM_STATES {
            return Err(StateError::InvalidStateDimension {
                expected: Self::BASIC_NUM_STATES,
                got: vec.len(),
            });
        }
        Ok(Self::from_vector(vec))
    }

    /// State from a raw vector and an orientation
    ///
    /// χ in `vec` is assumed to be already folded and is kept as given.
    ///
    /// # Panics
    /// If `vec` does not have exactly [`Self::BASIC_NUM_STATES`] elements.
    pub fn from_parts(vec: DVector<f64>, quat: Quat) -> Self {
        assert_eq!(vec.len(), Self::BASIC_NUM_STATES);
        Self { vec, quat, utime: 0 }
    }

    /// Number of elements in the state vector
    pub fn dim(&self) -> usize {
        self.vec.len()
    }

    pub fn vector(&self) -> &DVector<f64> {
        &self.vec
    }

    pub fn vector_mut(&mut self) -> &mut DVector<f64> {
        &mut self.vec
    }

    pub fn angular_velocity(&self) -> Block3<'_> {
        self.vec.fixed_rows::<3>(Self::ANGULAR_VELOCITY_IND)
    }

    pub fn angular_velocity_mut(&mut self) -> Block3Mut<'_> {
        self.vec.fixed_rows_mut::<3>(Self::ANGULAR_VELOCITY_IND)
    }

    pub fn velocity(&self) -> Block3<'_> {
        self.vec.fixed_rows::<3>(Self::VELOCITY_IND)
    }

    pub fn velocity_mut(&mut self) -> Block3Mut<'_> {
        self.vec.fixed_rows_mut::<3>(Self::VELOCITY_IND)
    }

    pub fn chi(&self) -> Block3<'_> {
        self.vec.fixed_rows::<3>(Self::CHI_IND)
    }

    pub fn chi_mut(&mut self) -> Block3Mut<'_> {
        self.vec.fixed_rows_mut::<3>(Self::CHI_IND)
    }

    pub fn position(&self) -> Block3<'_> {
        self.vec.fixed_rows::<3>(Self::POSITION_IND)
    }

    pub fn position_mut(&mut self) -> Block3Mut<'_> {
        self.vec.fixed_rows_mut::<3>(Self::POSITION_IND)
    }

    pub fn acceleration(&self) -> Block3<'_> {
        self.vec.fixed_rows::<3>(Self::ACCELERATION_IND)
    }

    pub fn acceleration_mut(&mut self) -> Block3Mut<'_> {
        self.vec.fixed_rows_mut::<3>(Self::ACCELERATION_IND)
    }

    pub fn orientation(&self) -> &Quat {
        &self.quat
    }

    pub fn orientation_mut(&mut self) -> &mut Quat {
        &mut self.quat
    }

    /// Euler angles (roll, pitch, yaw) of the orientation, Z-Y-X intrinsic order
    ///
    /// Reads the quaternion only; a pending χ is ignored.
    pub fn euler_angles(&self) -> Vec3 {
        let (roll, pitch, yaw) = self.quat.euler_angles();
        Vec3::new(roll, pitch, yaw)
    }

    /// Set the orientation to Rz(yaw) · Ry(pitch) · Rx(roll)
    ///
    /// # Arguments
    /// * `eulers` - (roll, pitch, yaw) [rad]
    pub fn set_orientation_from_euler_angles(&mut self, eulers: &Vec3) {
        self.quat = Quat::from_axis_angle(&Vec3::z_axis(), eulers.z)
            * Quat::from_axis_angle(&Vec3::y_axis(), eulers.y)
            * Quat::from_axis_angle(&Vec3::x_axis(), eulers.x);
    }

    /// Fold χ into the orientation with the default [`FoldPolicy`]
    ///
    /// q ← q ⊗ exp(χ), χ ← 0, when ‖χ‖ exceeds the tolerance.
    pub fn chi_to_quat(&mut self) {
        self.chi_to_quat_with(&FoldPolicy::default());
    }

    /// Fold χ into the orientation (right-multiplied, body frame)
    pub fn chi_to_quat_with(&mut self, policy: &FoldPolicy) {
        let chi = self.chi().into_owned();
        let chi_norm = chi.norm();

        if chi_norm > policy.tolerance {
            self.quat *= quaternion_exp(&chi);
            self.quat.renormalize();
            self.chi_mut().fill(0.0);
            trace!(chi_norm, "folded chi into orientation");
        } else if policy.clear_negligible {
            self.chi_mut().fill(0.0);
        }
    }

    /// Move the whole orientation into χ
    ///
    /// χ ← log(q), q ← identity
    pub fn quat_to_chi(&mut self) {
        let chi = quaternion_difference(&self.quat, &Quat::identity());
        self.chi_mut().copy_from(&chi);
        self.quat = Quat::identity();
    }

    /// Add a state on the right (postmultiplies orientation)
    ///
    /// ```text
    /// x ← x + x_other
    /// q ← q ⊗ exp(χ) ⊗ q_other
    /// ```
    ///
    /// `utime` is left unchanged.
    ///
    /// # Panics
    /// If the two states have different dimensions.
    pub fn add_state(&mut self, state_to_add: &RigidBodyState) {
        assert_eq!(self.dim(), state_to_add.dim());

        self.vec += &state_to_add.vec;
        self.chi_to_quat();
        self.quat *= state_to_add.quat;
        self.quat.renormalize();
    }

    /// Subtract a state (premultiplies the inverse of its orientation)
    ///
    /// ```text
    /// x ← x - x_other
    /// q ← q_other⁻¹ ⊗ q
    /// ```
    ///
    /// Unlike [`Self::add_state`], χ is not folded, and the orientation is
    /// composed on the left. The result is this state expressed in the frame
    /// of `state_to_subtract`.
    ///
    /// # Panics
    /// If the two states have different dimensions.
    pub fn subtract_state(&mut self, state_to_subtract: &RigidBodyState) {
        assert_eq!(self.dim(), state_to_subtract.dim());

        self.vec -= &state_to_subtract.vec;
        self.quat = state_to_subtract.quat.inverse() * self.quat;
        self.quat.renormalize();
    }

    /// True if any element of the state vector is NaN
    ///
    /// The orientation is not checked.
    pub fn has_nan(&self) -> bool {
        self.vec.iter().any(|x| x.is_nan())
    }

    /// Report the first NaN element of the state vector
    pub fn validate(&self) -> Result<(), StateError> {
        match self.vec.iter().position(|x| x.is_nan()) {
            Some(index) => {
                warn!(index, utime = self.utime, "rigid body state contains NaN");
                Err(StateError::NanComponent { index })
            }
            None => Ok(()),
        }
    }
}

impl AddAssign<&RigidBodyState> for RigidBodyState {
    fn add_assign(&mut self, rhs: &RigidBodyState) {
        self.add_state(rhs);
    }
}

impl SubAssign<&RigidBodyState> for RigidBodyState {
    fn sub_assign(&mut self, rhs: &RigidBodyState) {
        self.subtract_state(rhs);
    }
}
