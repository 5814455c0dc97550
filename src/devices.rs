mod callbacks;
mod controller;
pub mod paths;
mod properties;


pub use callbacks::button_id_for_sensor;
pub use controller::{AnalogChannel, OsvrController};

use crate::settings::DriverSettings;

use log::{info, warn};
use openvr as vr;
use osvr::ClientContext;
use std::sync::Arc;

/// Every controller the driver exposes, in the order they are handed to the host.
#[derive(derive_more::Deref)]
pub struct ControllerList {
    #[deref]
    controllers: Vec<OsvrController>,
}

impl ControllerList {
    pub fn new(
        context: Arc<dyn ClientContext>,
        host: Arc<dyn vr::IVRServerDriverHost>,
        properties: Arc<dyn vr::IVRProperties>,
        settings: &DriverSettings,
    ) -> Self {
        crate::init_logging();
        let mut controllers: Vec<OsvrController> = Vec::with_capacity(settings.controllers.len());
        for &index in &settings.controllers {
            if controllers.iter().any(|c| c.index() == index) {
                warn!("controller {index} is listed more than once, ignoring duplicate");
                continue;
            }
            controllers.push(OsvrController::new(
                context.clone(),
                host.clone(),
                properties.clone(),
                index,
                settings,
            ));
        }

        info!("created {} controller(s)", controllers.len());
        Self { controllers }
    }

    pub fn controller(&self, index: u32) -> Option<&OsvrController> {
        self.controllers.iter().find(|c| c.index() == index)
    }

    /// Looks up an active controller by the object id the host gave it.
    pub fn by_object_id(&self, object_id: vr::TrackedDeviceIndex_t) -> Option<&OsvrController> {
        if object_id == vr::k_unTrackedDeviceIndexInvalid {
            return None;
        }
        self.controllers
            .iter()
            .find(|c| c.is_active() && c.object_id() == object_id)
    }

    /// Activates every controller with consecutive object ids starting at `first_object_id`.
    ///
    /// All controllers are attempted; the first failure is returned.
    pub fn activate_all(&self, first_object_id: vr::TrackedDeviceIndex_t) -> vr::EVRInitError {
        let mut result = vr::EVRInitError::None;
        for (object_id, controller) in (first_object_id..).zip(&self.controllers) {
            let err = controller.activate(object_id);
            if err != vr::EVRInitError::None && result == vr::EVRInitError::None {
                result = err;
            }
        }
        result
    }

    pub fn deactivate_all(&self) {
        for controller in &self.controllers {
            controller.deactivate();
        }
    }
}
