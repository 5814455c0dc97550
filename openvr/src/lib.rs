//! Driver-side subset of the OpenVR ABI.
//!
//! Only the types and interfaces a tracked controller driver touches are declared here. Value
//! types keep their `#[repr(C)]` layout so they can be handed to a host as-is; interfaces are
//! plain traits, implemented by whatever binding talks to the host process.
#![allow(
    non_camel_case_types,
    non_snake_case,
    non_upper_case_globals,
    clippy::upper_case_acronyms
)]

mod convert;

use std::ffi::CStr;

pub use convert::tracked_pose;

pub type TrackedDeviceIndex_t = u32;
pub type PropertyContainerHandle_t = u64;

pub const k_unTrackedDeviceIndexInvalid: TrackedDeviceIndex_t = 0xFFFFFFFF;
pub const k_ulInvalidPropertyContainer: PropertyContainerHandle_t = 0;
pub const k_unControllerStateAxisCount: u32 = 5;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct HmdQuaternion_t {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, derive_more::TryFrom)]
#[try_from(repr)]
pub enum ETrackingResult {
    #[default]
    Uninitialized = 1,
    Calibrating_InProgress = 100,
    Calibrating_OutOfRange = 101,
    Running_OK = 200,
    Running_OutOfRange = 201,
    Fallback_RotationOnly = 300,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct DriverPose_t {
    pub poseTimeOffset: f64,
    pub qWorldFromDriverRotation: HmdQuaternion_t,
    pub vecWorldFromDriverTranslation: [f64; 3],
    pub qDriverFromHeadRotation: HmdQuaternion_t,
    pub vecDriverFromHeadTranslation: [f64; 3],
    pub vecPosition: [f64; 3],
    pub vecVelocity: [f64; 3],
    pub vecAcceleration: [f64; 3],
    pub qRotation: HmdQuaternion_t,
    pub vecAngularVelocity: [f64; 3],
    pub vecAngularAcceleration: [f64; 3],
    pub result: ETrackingResult,
    pub poseIsValid: bool,
    pub willDriftInYaw: bool,
    pub shouldApplyHeadModel: bool,
    pub deviceIsConnected: bool,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct VRControllerAxis_t {
    pub x: f32,
    pub y: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct VRControllerState_t {
    pub unPacketNum: u32,
    pub ulButtonPressed: u64,
    pub ulButtonTouched: u64,
    pub rAxis: [VRControllerAxis_t; k_unControllerStateAxisCount as usize],
}

#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, derive_more::TryFrom)]
#[try_from(repr)]
pub enum EVRButtonId {
    System = 0,
    ApplicationMenu = 1,
    Grip = 2,
    DPad_Left = 3,
    DPad_Up = 4,
    DPad_Right = 5,
    DPad_Down = 6,
    A = 7,
    ProximitySensor = 31,
    Axis0 = 32,
    Axis1 = 33,
    Axis2 = 34,
    Axis3 = 35,
    Axis4 = 36,
    Max = 64,
}

impl EVRButtonId {
    pub const SteamVR_Touchpad: Self = Self::Axis0;
    pub const SteamVR_Trigger: Self = Self::Axis1;
}

#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, derive_more::TryFrom)]
#[try_from(repr)]
pub enum EVRControllerAxisType {
    #[default]
    None = 0,
    TrackPad = 1,
    Joystick = 2,
    Trigger = 3,
}

#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, derive_more::TryFrom)]
#[try_from(repr)]
pub enum ETrackedDeviceClass {
    Invalid = 0,
    HMD = 1,
    Controller = 2,
    GenericTracker = 3,
    TrackingReference = 4,
    DisplayRedirect = 5,
}

#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, derive_more::TryFrom)]
#[try_from(repr)]
pub enum ETrackedDeviceProperty {
    Invalid = 0,
    TrackingSystemName_String = 1000,
    ModelNumber_String = 1001,
    SerialNumber_String = 1002,
    RenderModelName_String = 1003,
    WillDriftInYaw_Bool = 1004,
    ManufacturerName_String = 1005,
    DeviceIsWireless_Bool = 1010,
    DeviceClass_Int32 = 1029,
    AttachedDeviceId_String = 3000,
    SupportedButtons_Uint64 = 3001,
    Axis0Type_Int32 = 3002,
    Axis1Type_Int32 = 3003,
    Axis2Type_Int32 = 3004,
    Axis3Type_Int32 = 3005,
    Axis4Type_Int32 = 3006,
}

impl ETrackedDeviceProperty {
    /// The `Axis<N>Type_Int32` property for controller axis `axis`.
    pub fn axis_type(axis: u32) -> Option<Self> {
        if axis >= k_unControllerStateAxisCount {
            return None;
        }
        Self::try_from(Self::Axis0Type_Int32 as i32 + axis as i32).ok()
    }
}

#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, derive_more::TryFrom)]
#[try_from(repr)]
pub enum ETrackedPropertyError {
    Success = 0,
    WrongDataType = 1,
    WrongDeviceClass = 2,
    BufferTooSmall = 3,
    UnknownProperty = 4,
    InvalidDevice = 5,
    CouldNotContactServer = 6,
    ValueNotProvidedByDevice = 7,
    StringExceedsMaximumLength = 8,
    NotYetAvailable = 9,
    PermissionDenied = 10,
    InvalidOperation = 11,
    CannotWriteToWildcards = 12,
    IPCReadFailure = 13,
    OutOfMemory = 14,
    InvalidContainer = 15,
}

#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, derive_more::TryFrom)]
#[try_from(repr)]
pub enum EVRInitError {
    None = 0,
    Unknown = 1,
    Init_InterfaceNotFound = 105,
    Driver_Failed = 200,
    Driver_Unknown = 201,
    Driver_HmdUnknown = 202,
    Driver_NotLoaded = 203,
}

/// Calls a driver makes into the host to report device input.
pub trait IVRServerDriverHost: Send + Sync {
    fn TrackedDevicePoseUpdated(
        &self,
        which_device: TrackedDeviceIndex_t,
        new_pose: &DriverPose_t,
        pose_struct_size: u32,
    );
    fn TrackedDeviceButtonPressed(
        &self,
        which_device: TrackedDeviceIndex_t,
        button_id: EVRButtonId,
        time_offset: f64,
    );
    fn TrackedDeviceButtonUnpressed(
        &self,
        which_device: TrackedDeviceIndex_t,
        button_id: EVRButtonId,
        time_offset: f64,
    );
    fn TrackedDeviceAxisUpdated(
        &self,
        which_device: TrackedDeviceIndex_t,
        axis: u32,
        axis_state: &VRControllerAxis_t,
    );
}

/// Host-owned property store.
pub trait IVRProperties: Send + Sync {
    fn TrackedDeviceToPropertyContainer(
        &self,
        device: TrackedDeviceIndex_t,
    ) -> PropertyContainerHandle_t;
    fn SetInt32Property(
        &self,
        container: PropertyContainerHandle_t,
        prop: ETrackedDeviceProperty,
        new_value: i32,
    ) -> ETrackedPropertyError;
    fn SetUint64Property(
        &self,
        container: PropertyContainerHandle_t,
        prop: ETrackedDeviceProperty,
        new_value: u64,
    ) -> ETrackedPropertyError;
    fn SetStringProperty(
        &self,
        container: PropertyContainerHandle_t,
        prop: ETrackedDeviceProperty,
        new_value: &CStr,
    ) -> ETrackedPropertyError;
}

/// Entry points the host calls on every device a driver adds.
pub trait ITrackedDeviceServerDriver: Send + Sync {
    fn Activate(&self, object_id: TrackedDeviceIndex_t) -> EVRInitError;
    fn Deactivate(&self);
    fn EnterStandby(&self);
}

/// Legacy controller component.
pub trait IVRControllerComponent: Send + Sync {
    fn GetControllerState(&self) -> VRControllerState_t;
    fn TriggerHapticPulse(&self, axis_id: u32, duration_micros: u16) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_type_properties_are_contiguous() {
        assert_eq!(
            ETrackedDeviceProperty::axis_type(0),
            Some(ETrackedDeviceProperty::Axis0Type_Int32)
        );
        assert_eq!(
            ETrackedDeviceProperty::axis_type(4),
            Some(ETrackedDeviceProperty::Axis4Type_Int32)
        );
        assert_eq!(ETrackedDeviceProperty::axis_type(5), None);
    }

    #[test]
    fn button_ids_from_raw() {
        assert_eq!(
            EVRButtonId::try_from(33u32).ok(),
            Some(EVRButtonId::SteamVR_Trigger)
        );
        assert!(EVRButtonId::try_from(8u32).is_err());
    }
}
