use crate::{DriverPose_t, ETrackingResult, HmdQuaternion_t};
use glam::{DQuat, DVec3};

impl HmdQuaternion_t {
    pub const IDENTITY: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}

impl From<DQuat> for HmdQuaternion_t {
    fn from(q: DQuat) -> Self {
        Self {
            w: q.w,
            x: q.x,
            y: q.y,
            z: q.z,
        }
    }
}

impl From<HmdQuaternion_t> for DQuat {
    fn from(q: HmdQuaternion_t) -> Self {
        DQuat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

/// Builds a running, connected pose at `position`/`orientation`.
///
/// World/driver and driver/head transforms are identity. Velocities and accelerations are zeroed
/// since trackers don't reliably provide them.
pub fn tracked_pose(position: DVec3, orientation: DQuat) -> DriverPose_t {
    DriverPose_t {
        poseTimeOffset: 0.0,
        qWorldFromDriverRotation: HmdQuaternion_t::IDENTITY,
        vecWorldFromDriverTranslation: DVec3::ZERO.to_array(),
        qDriverFromHeadRotation: HmdQuaternion_t::IDENTITY,
        vecDriverFromHeadTranslation: DVec3::ZERO.to_array(),
        vecPosition: position.to_array(),
        vecVelocity: DVec3::ZERO.to_array(),
        vecAcceleration: DVec3::ZERO.to_array(),
        qRotation: orientation.into(),
        vecAngularVelocity: DVec3::ZERO.to_array(),
        vecAngularAcceleration: DVec3::ZERO.to_array(),
        result: ETrackingResult::Running_OK,
        poseIsValid: true,
        willDriftInYaw: false,
        shouldApplyHeadModel: false,
        deviceIsConnected: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quaternion_component_order() {
        let q = DQuat::from_xyzw(0.1, 0.2, 0.3, 0.9);
        let hmd = HmdQuaternion_t::from(q);
        assert_eq!((hmd.w, hmd.x, hmd.y, hmd.z), (0.9, 0.1, 0.2, 0.3));
        assert_eq!(DQuat::from(hmd), q);
    }

    #[test]
    fn tracked_pose_is_running() {
        let pose = tracked_pose(DVec3::new(1.0, 2.0, 3.0), DQuat::IDENTITY);
        assert_eq!(pose.vecPosition, [1.0, 2.0, 3.0]);
        assert_eq!(pose.qRotation, HmdQuaternion_t::IDENTITY);
        assert_eq!(pose.qWorldFromDriverRotation, HmdQuaternion_t::IDENTITY);
        assert_eq!(pose.vecVelocity, [0.0; 3]);
        assert_eq!(pose.result, ETrackingResult::Running_OK);
        assert!(pose.poseIsValid && pose.deviceIsConnected);
    }
}
