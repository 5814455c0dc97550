use super::OsvrController;

use log::{trace, warn};
use openvr as vr;
use std::ffi::CString;

impl OsvrController {
    /// Publishes the controller's static metadata to the host property store.
    ///
    /// Failed writes are not fatal; the host just won't know that property.
    pub fn configure_properties(&self) {
        let props = &*self.properties;
        let container = props.TrackedDeviceToPropertyContainer(self.object_id());
        if container == vr::k_ulInvalidPropertyContainer {
            warn!("{}: no property container for device {}", self.id(), self.object_id());
            return;
        }
        let check = |prop: vr::ETrackedDeviceProperty, err: vr::ETrackedPropertyError| {
            if err != vr::ETrackedPropertyError::Success {
                trace!("{}: couldn't set {prop:?}: {err:?}", self.id());
            }
        };

        let prop = vr::ETrackedDeviceProperty::DeviceClass_Int32;
        check(
            prop,
            props.SetInt32Property(container, prop, vr::ETrackedDeviceClass::Controller as i32),
        );

        for axis in 0..vr::k_unControllerStateAxisCount {
            let Some(prop) = vr::ETrackedDeviceProperty::axis_type(axis) else {
                continue;
            };
            check(
                prop,
                props.SetInt32Property(container, prop, self.axis_type(axis) as i32),
            );
        }

        let prop = vr::ETrackedDeviceProperty::SupportedButtons_Uint64;
        check(
            prop,
            props.SetUint64Property(container, prop, self.settings().button_count() as u64),
        );

        let strings = [
            (
                vr::ETrackedDeviceProperty::ModelNumber_String,
                self.settings().model_number.as_str(),
            ),
            (vr::ETrackedDeviceProperty::SerialNumber_String, self.id()),
            (
                vr::ETrackedDeviceProperty::RenderModelName_String,
                self.settings().render_model_name.as_str(),
            ),
        ];
        for (prop, value) in strings {
            let Ok(value) = CString::new(value) else {
                warn!("{}: {prop:?} contains a nul byte, skipping", self.id());
                continue;
            };
            check(prop, props.SetStringProperty(container, prop, &value));
        }
    }
}
