//! External record formats
//!
//! Fixed-layout records shared with producers and consumers outside this
//! crate. Quaternions are stored as `[w, x, y, z]`; all quantities are SI.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::math::{array_to_quaternion, quaternion_to_array};
use crate::state::{Block3, RigidBodyState, StateError};

/// Allowed deviation of a record quaternion's norm from 1
const UNIT_NORM_TOLERANCE: f64 = 1e-6;

/// Full rigid body pose record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseRecord {
    /// Timestamp [µs]
    pub utime: i64,
    /// Position [m]
    pub position: [f64; 3],
    /// Velocity [m/s]
    pub velocity: [f64; 3],
    /// Orientation as `[w, x, y, z]`
    pub orientation: [f64; 4],
    /// Angular velocity [rad/s]
    pub rotation_rate: [f64; 3],
    /// Acceleration [m/s²]
    pub acceleration: [f64; 3],
}

impl Default for PoseRecord {
    fn default() -> Self {
        Self {
            utime: 0,
            position: [0.0; 3],
            velocity: [0.0; 3],
            orientation: [1.0, 0.0, 0.0, 0.0],
            rotation_rate: [0.0; 3],
            acceleration: [0.0; 3],
        }
    }
}

/// Rigid transform record (translation + rotation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    /// Translation [m]
    pub translation: [f64; 3],
    /// Rotation as `[w, x, y, z]`
    pub rotation_quaternion: [f64; 4],
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation_quaternion: [1.0, 0.0, 0.0, 0.0],
        }
    }
}

fn to_array3(block: Block3<'_>) -> [f64; 3] {
    [block[0], block[1], block[2]]
}

impl From<&PoseRecord> for RigidBodyState {
    /// Copies the kinematic fields verbatim; χ is zero
    fn from(pose: &PoseRecord) -> Self {
        let mut state = RigidBodyState::new();

        state.velocity_mut().copy_from_slice(&pose.velocity);
        state.angular_velocity_mut().copy_from_slice(&pose.rotation_rate);
        state.position_mut().copy_from_slice(&pose.position);
        state.acceleration_mut().copy_from_slice(&pose.acceleration);
        state.chi_mut().fill(0.0);

        *state.orientation_mut() = array_to_quaternion(&pose.orientation);
        state.utime = pose.utime;

        state
    }
}

impl RigidBodyState {
    /// State from a pose record whose orientation must be a unit quaternion
    pub fn try_from_pose(pose: &PoseRecord) -> Result<Self, StateError> {
        let norm = pose.orientation.iter().map(|c| c * c).sum::<f64>().sqrt();

        // NaN norms fail this check too
        if !((norm - 1.0).abs() <= UNIT_NORM_TOLERANCE) {
            debug!(norm, utime = pose.utime, "rejecting pose record with non-unit orientation");
            return Err(StateError::NonUnitQuaternion { norm });
        }

        Ok(Self::from(pose))
    }

    /// Write every pose field into `pose`
    ///
    /// Pending χ is not exported; fold it first with [`Self::chi_to_quat`].
    pub fn write_pose(&self, pose: &mut PoseRecord) {
        pose.rotation_rate = to_array3(self.angular_velocity());
        pose.velocity = to_array3(self.velocity());
        pose.position = to_array3(self.position());
        pose.acceleration = to_array3(self.acceleration());
        pose.orientation = quaternion_to_array(self.orientation());
        pose.utime = self.utime;
    }

    /// Export to a new pose record
    pub fn to_pose(&self) -> PoseRecord {
        let mut pose = PoseRecord::default();
        self.write_pose(&mut pose);
        pose
    }

    /// Project position and orientation onto a rigid transform
    pub fn to_rigid_transform(&self) -> RigidTransform {
        RigidTransform {
            translation: to_array3(self.position()),
            rotation_quaternion: quaternion_to_array(self.orientation()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Quat, Vec3};
    use approx::assert_relative_eq;

    fn sample_pose() -> PoseRecord {
        let q = Quat::from_euler_angles(0.3, -0.1, 1.2);
        PoseRecord {
            utime: 1_700_000_000_123_456,
            position: [10.1, -3.3, 0.7],
            velocity: [0.1, 0.2, 0.3],
            orientation: quaternion_to_array(&q),
            rotation_rate: [-0.01, 0.02, 0.5],
            acceleration: [0.0, 0.0, -9.80665],
        }
    }

    #[test]
    fn test_from_pose_copies_fields() {
        let pose = sample_pose();

        let state = RigidBodyState::from(&pose);

        assert_eq!(state.position().into_owned(), Vec3::from(pose.position));
        assert_eq!(state.velocity().into_owned(), Vec3::from(pose.velocity));
        assert_eq!(state.angular_velocity().into_owned(), Vec3::from(pose.rotation_rate));
        assert_eq!(state.acceleration().into_owned(), Vec3::from(pose.acceleration));
        assert_eq!(state.chi().into_owned(), Vec3::zeros());
        assert_eq!(state.utime, pose.utime);
    }

    #[test]
    fn test_pose_round_trip() {
        let pose = sample_pose();

        let back = RigidBodyState::from(&pose).to_pose();

        assert_eq!(back.utime, pose.utime);
        assert_eq!(back.position, pose.position);
        assert_eq!(back.velocity, pose.velocity);
        assert_eq!(back.rotation_rate, pose.rotation_rate);
        assert_eq!(back.acceleration, pose.acceleration);
        for (a, b) in back.orientation.iter().zip(pose.orientation.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_write_pose_overwrites_all_fields() {
        let mut pose = sample_pose();
        let state = RigidBodyState::new();

        state.write_pose(&mut pose);

        assert_eq!(pose, PoseRecord::default());
    }

    #[test]
    fn test_try_from_pose_accepts_unit_orientation() {
        let pose = sample_pose();

        let state = RigidBodyState::try_from_pose(&pose).unwrap();

        assert_eq!(state, RigidBodyState::from(&pose));
    }

    #[test]
    fn test_try_from_pose_rejects_non_unit_orientation() {
        let mut pose = sample_pose();
        pose.orientation = [2.0, 0.0, 0.0, 0.0];

        let err = RigidBodyState::try_from_pose(&pose).unwrap_err();

        assert_eq!(err, StateError::NonUnitQuaternion { norm: 2.0 });
    }

    #[test]
    fn test_try_from_pose_rejects_nan_orientation() {
        let mut pose = sample_pose();
        pose.orientation[1] = f64::NAN;

        assert!(matches!(
            RigidBodyState::try_from_pose(&pose),
            Err(StateError::NonUnitQuaternion { .. })
        ));
    }

    #[test]
    fn test_rigid_transform_projection() {
        let mut state = RigidBodyState::new();
        state.position_mut().copy_from(&Vec3::new(1.0, 2.0, 3.0));
        state.velocity_mut().copy_from(&Vec3::new(9.0, 9.0, 9.0));
        state.set_orientation_from_euler_angles(&Vec3::new(0.0, 0.0, 0.5));

        let trans = state.to_rigid_transform();

        assert_eq!(trans.translation, [1.0, 2.0, 3.0]);
        assert_eq!(trans.rotation_quaternion, quaternion_to_array(state.orientation()));
    }

    #[test]
    fn test_pose_record_serde_field_names() {
        let json = serde_json::to_value(PoseRecord::default()).unwrap();

        for field in [
            "utime",
            "position",
            "velocity",
            "orientation",
            "rotation_rate",
            "acceleration",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(json["orientation"], serde_json::json!([1.0, 0.0, 0.0, 0.0]));
    }
}
