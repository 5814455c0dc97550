//! Report handlers run on the tracking client's delivery thread.

use super::controller::{AnalogChannel, ControllerShared};
use super::paths::Component;
use crate::tracy_span;

use log::trace;
use openvr as vr;
use osvr::{AnalogReport, ButtonReport, ButtonState, PoseReport, TimeValue};

/// Maps a client button sensor onto a host button.
///
/// Sensors 0-7 and 32-36 carry over directly, 8-12 land on the axis buttons (32-36). Anything
/// else has no host counterpart.
pub fn button_id_for_sensor(sensor: i32) -> Option<vr::EVRButtonId> {
    let id = match sensor {
        0..=7 | 32..=36 => sensor,
        8..=12 => sensor + 24,
        _ => return None,
    };
    vr::EVRButtonId::try_from(id as u32).ok()
}

impl ControllerShared {
    pub(super) fn on_pose(&self, _time: &TimeValue, report: &PoseReport) {
        tracy_span!("OsvrController::on_pose");
        if !self.is_active() {
            return;
        }

        // Timestamps aren't propagated; the report is treated as current.
        let pose = vr::tracked_pose(report.pose.translation, report.pose.rotation);
        *self.pose.lock().unwrap() = pose;

        self.host.TrackedDevicePoseUpdated(
            self.object_id(),
            &pose,
            std::mem::size_of::<vr::DriverPose_t>() as u32,
        );
    }

    pub(super) fn on_button(&self, _time: &TimeValue, report: &ButtonReport) {
        tracy_span!("OsvrController::on_button");
        if !self.is_active() {
            return;
        }

        let Some(button) = button_id_for_sensor(report.sensor) else {
            trace!("{}: dropping unmapped button sensor {}", self.name, report.sensor);
            return;
        };

        match report.state {
            ButtonState::Pressed => {
                self.host
                    .TrackedDeviceButtonPressed(self.object_id(), button, 0.0)
            }
            ButtonState::NotPressed => {
                self.host
                    .TrackedDeviceButtonUnpressed(self.object_id(), button, 0.0)
            }
        }
    }

    pub(super) fn on_trigger(&self, _time: &TimeValue, report: &AnalogReport) {
        self.on_axis(AnalogChannel::Trigger, Component::X, report);
    }

    pub(super) fn on_joystick_x(&self, joystick: u32, _time: &TimeValue, report: &AnalogReport) {
        self.on_axis(AnalogChannel::Joystick(joystick), Component::X, report);
    }

    pub(super) fn on_joystick_y(&self, joystick: u32, _time: &TimeValue, report: &AnalogReport) {
        self.on_axis(AnalogChannel::Joystick(joystick), Component::Y, report);
    }

    fn on_axis(&self, channel: AnalogChannel, component: Component, report: &AnalogReport) {
        tracy_span!("OsvrController::on_axis");
        if !self.is_active() {
            return;
        }

        let state = {
            let mut channels = self.channels.lock().unwrap();
            let Some(state) = channels.get_mut(&channel) else {
                trace!("{}: {channel:?} is not wired, dropping report", self.name);
                return;
            };
            match component {
                Component::X => state.x = report.state,
                Component::Y => state.y = report.state,
            }
            *state
        };

        let axis = vr::VRControllerAxis_t {
            x: state.x as f32,
            y: state.y as f32,
        };
        self.host
            .TrackedDeviceAxisUpdated(self.object_id(), channel.axis(), &axis);
    }
}

#[cfg(test)]
mod tests {
    use super::button_id_for_sensor;
    use openvr::EVRButtonId;

    #[test]
    fn passthrough_sensors() {
        assert_eq!(button_id_for_sensor(0), Some(EVRButtonId::System));
        assert_eq!(button_id_for_sensor(3), Some(EVRButtonId::DPad_Left));
        assert_eq!(button_id_for_sensor(7), Some(EVRButtonId::A));
        assert_eq!(button_id_for_sensor(33), Some(EVRButtonId::SteamVR_Trigger));
        assert_eq!(button_id_for_sensor(36), Some(EVRButtonId::Axis4));
    }

    #[test]
    fn shifted_sensors() {
        assert_eq!(button_id_for_sensor(8), Some(EVRButtonId::Axis0));
        assert_eq!(button_id_for_sensor(10), Some(EVRButtonId::Axis2));
        assert_eq!(button_id_for_sensor(12), Some(EVRButtonId::Axis4));
    }

    #[test]
    fn unmapped_sensors() {
        for sensor in [-1, 13, 20, 31, 37, 64] {
            assert_eq!(button_id_for_sensor(sensor), None, "sensor {sensor}");
        }
    }
}
