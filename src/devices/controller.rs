use super::paths::{Component, ControllerRole, DevicePaths};
use crate::settings::DriverSettings;

use log::{debug, info, warn};
use openvr as vr;
use osvr::{Callback, ClientContext, ClientInterface};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Instant;

/// A logical analog input, keyed by what it is rather than by where it was found.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnalogChannel {
    Trigger,
    Joystick(u32),
}

impl AnalogChannel {
    /// Axis 0 is left for a touchpad, which is never populated.
    pub fn axis(self) -> u32 {
        match self {
            AnalogChannel::Trigger => 1,
            AnalogChannel::Joystick(n) => 2 + n,
        }
    }

    pub fn axis_type(self) -> vr::EVRControllerAxisType {
        match self {
            AnalogChannel::Trigger => vr::EVRControllerAxisType::Trigger,
            AnalogChannel::Joystick(_) => vr::EVRControllerAxisType::Joystick,
        }
    }
}

/// Last values reported on a channel.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub(super) struct ChannelState {
    pub x: f64,
    pub y: f64,
}

/// State touched by the tracking client's callbacks.
pub(super) struct ControllerShared {
    pub name: String,
    pub host: Arc<dyn vr::IVRServerDriverHost>,
    pub object_id: AtomicU32,
    pub active: AtomicBool,
    pub pose: Mutex<vr::DriverPose_t>,
    pub channels: Mutex<BTreeMap<AnalogChannel, ChannelState>>,
}

impl ControllerShared {
    pub fn object_id(&self) -> vr::TrackedDeviceIndex_t {
        self.object_id.load(Ordering::Relaxed)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

#[derive(Default)]
struct Interfaces {
    tracker: Option<Box<dyn ClientInterface>>,
    buttons: Vec<Box<dyn ClientInterface>>,
    analogs: Vec<Box<dyn ClientInterface>>,
}

impl Interfaces {
    fn free(&mut self) {
        let all = self
            .tracker
            .iter_mut()
            .chain(self.buttons.iter_mut())
            .chain(self.analogs.iter_mut());
        for iface in all {
            iface.free();
        }

        self.tracker = None;
        self.buttons.clear();
        self.analogs.clear();
    }
}

pub struct OsvrController {
    index: u32,
    paths: DevicePaths,
    settings: DriverSettings,
    context: Arc<dyn ClientContext>,
    pub(super) properties: Arc<dyn vr::IVRProperties>,
    pub(super) shared: Arc<ControllerShared>,
    interfaces: Mutex<Interfaces>,
}

impl OsvrController {
    pub fn new(
        context: Arc<dyn ClientContext>,
        host: Arc<dyn vr::IVRServerDriverHost>,
        properties: Arc<dyn vr::IVRProperties>,
        index: u32,
        settings: &DriverSettings,
    ) -> Self {
        let name = format!("OSVRController{index}");
        Self {
            index,
            paths: DevicePaths::new(ControllerRole::from(index)),
            settings: settings.clone(),
            context,
            properties,
            shared: Arc::new(ControllerShared {
                name,
                host,
                object_id: AtomicU32::new(vr::k_unTrackedDeviceIndexInvalid),
                active: AtomicBool::new(false),
                pose: Mutex::new(vr::DriverPose_t::default()),
                channels: Mutex::new(BTreeMap::new()),
            }),
            interfaces: Mutex::new(Interfaces::default()),
        }
    }

    /// Device id handed to the host. Doubles as the serial number.
    pub fn id(&self) -> &str {
        &self.shared.name
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn role(&self) -> ControllerRole {
        ControllerRole::from(self.index)
    }

    pub fn paths(&self) -> &DevicePaths {
        &self.paths
    }

    pub(super) fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    pub fn object_id(&self) -> vr::TrackedDeviceIndex_t {
        self.shared.object_id()
    }

    pub fn is_active(&self) -> bool {
        self.shared.is_active()
    }

    /// The last pose forwarded to the host.
    pub fn pose(&self) -> vr::DriverPose_t {
        *self.shared.pose.lock().unwrap()
    }

    pub fn axis_count(&self) -> u32 {
        self.shared.channels.lock().unwrap().len() as u32
    }

    pub fn axis_type(&self, axis: u32) -> vr::EVRControllerAxisType {
        self.shared
            .channels
            .lock()
            .unwrap()
            .keys()
            .find(|channel| channel.axis() == axis)
            .map(|channel| channel.axis_type())
            .unwrap_or_default()
    }

    pub fn activate(&self, object_id: vr::TrackedDeviceIndex_t) -> vr::EVRInitError {
        self.shared.active.store(false, Ordering::Release);
        self.shared.object_id.store(object_id, Ordering::Relaxed);
        self.free_interfaces();

        info!("{}: waiting for the context to fully start up...", self.id());
        let timeout = self.settings.startup_timeout();
        let start = Instant::now();
        while !self.context.check_status() {
            self.context.update();
            if start.elapsed() > timeout {
                warn!("{}: context startup timed out!", self.id());
                return vr::EVRInitError::Driver_Failed;
            }
            std::thread::yield_now();
        }

        self.shared.active.store(true, Ordering::Release);
        let mut interfaces = self.interfaces.lock().unwrap();

        if let Some(path) = &self.paths.tracker {
            interfaces.tracker = self.subscribe(path, |shared| {
                Callback::pose(move |time, report| {
                    if let Some(shared) = shared.upgrade() {
                        shared.on_pose(time, report);
                    }
                })
            });
        }

        for button in 0..self.settings.button_count() {
            let iface = self.subscribe(&self.paths.button(button), |shared| {
                Callback::button(move |time, report| {
                    if let Some(shared) = shared.upgrade() {
                        shared.on_button(time, report);
                    }
                })
            });
            interfaces.buttons.extend(iface);
        }

        // Channels are wired before their callbacks can fire.
        // TODO: touchpad on axis 0 once the client exposes a path for it
        self.add_channel(AnalogChannel::Trigger);
        let trigger = self.subscribe(&self.paths.trigger(), |shared| {
            Callback::analog(move |time, report| {
                if let Some(shared) = shared.upgrade() {
                    shared.on_trigger(time, report);
                }
            })
        });
        match trigger {
            Some(iface) => interfaces.analogs.push(iface),
            None => self.remove_channel(AnalogChannel::Trigger),
        }

        for joystick in 0..self.settings.joystick_count() {
            self.add_channel(AnalogChannel::Joystick(joystick));
            let x = self.subscribe(&self.paths.joystick(joystick, Component::X), |shared| {
                Callback::analog(move |time, report| {
                    if let Some(shared) = shared.upgrade() {
                        shared.on_joystick_x(joystick, time, report);
                    }
                })
            });
            let y = self.subscribe(&self.paths.joystick(joystick, Component::Y), |shared| {
                Callback::analog(move |time, report| {
                    if let Some(shared) = shared.upgrade() {
                        shared.on_joystick_y(joystick, time, report);
                    }
                })
            });

            if x.is_none() && y.is_none() {
                self.remove_channel(AnalogChannel::Joystick(joystick));
            }
            interfaces.analogs.extend(x.into_iter().chain(y));
        }

        let subscribed = interfaces.tracker.is_some() as usize
            + interfaces.buttons.len()
            + interfaces.analogs.len();
        drop(interfaces);

        self.configure_properties();

        info!(
            "{}: activated as device {object_id} ({subscribed} interfaces, {} axes)",
            self.id(),
            self.axis_count()
        );
        vr::EVRInitError::None
    }

    pub fn deactivate(&self) {
        self.shared.active.store(false, Ordering::Release);
        self.free_interfaces();
        debug!("{}: deactivated", self.id());
    }

    pub fn controller_state(&self) -> vr::VRControllerState_t {
        crate::warn_unimplemented!("GetControllerState");
        vr::VRControllerState_t::default()
    }

    pub fn trigger_haptic_pulse(&self, _axis_id: u32, _duration_micros: u16) -> bool {
        crate::warn_unimplemented!("TriggerHapticPulse");
        false
    }

    fn subscribe(
        &self,
        path: &str,
        make_callback: impl FnOnce(Weak<ControllerShared>) -> Callback,
    ) -> Option<Box<dyn ClientInterface>> {
        let Some(mut iface) = self.context.get_interface(path) else {
            debug!("{}: no interface at {path}", self.id());
            return None;
        };

        iface.register_callback(make_callback(Arc::downgrade(&self.shared)));
        Some(iface)
    }

    fn add_channel(&self, channel: AnalogChannel) {
        self.shared
            .channels
            .lock()
            .unwrap()
            .insert(channel, ChannelState::default());
    }

    fn remove_channel(&self, channel: AnalogChannel) {
        self.shared.channels.lock().unwrap().remove(&channel);
    }

    fn free_interfaces(&self) {
        self.interfaces.lock().unwrap().free();
        self.shared.channels.lock().unwrap().clear();
    }
}

impl Drop for OsvrController {
    fn drop(&mut self) {
        self.shared.active.store(false, Ordering::Release);
        self.free_interfaces();
    }
}

impl vr::ITrackedDeviceServerDriver for OsvrController {
    fn Activate(&self, object_id: vr::TrackedDeviceIndex_t) -> vr::EVRInitError {
        self.activate(object_id)
    }

    fn Deactivate(&self) {
        self.deactivate()
    }

    fn EnterStandby(&self) {
        debug!("{}: entering standby", self.id());
    }
}

impl vr::IVRControllerComponent for OsvrController {
    fn GetControllerState(&self) -> vr::VRControllerState_t {
        self.controller_state()
    }

    fn TriggerHapticPulse(&self, axis_id: u32, duration_micros: u16) -> bool {
        self.trigger_haptic_pulse(axis_id, duration_micros)
    }
}
