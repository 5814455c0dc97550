use log::{info, warn};
use openvr as vr;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Joysticks live on axes 2.., so at most this many fit in a controller state.
pub const MAX_JOYSTICKS: u32 = vr::k_unControllerStateAxisCount - 2;
/// Highest button path index the legacy button mask can represent.
pub const MAX_BUTTONS: u32 = vr::EVRButtonId::Max as u32;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    /// Controller indices to expose. 0 is the left hand, 1 the right, anything else is generic.
    pub controllers: Vec<u32>,
    pub startup_timeout_ms: u64,
    pub button_count: u32,
    pub joystick_count: u32,
    pub model_number: String,
    pub render_model_name: String,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            controllers: vec![0, 1],
            startup_timeout_ms: 5000,
            button_count: MAX_BUTTONS,
            joystick_count: 2,
            model_number: "OSVR Controller".to_owned(),
            render_model_name: String::new(),
        }
    }
}

#[derive(Debug, derive_more::From)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "couldn't read driver settings: {e}"),
            Self::Parse(e) => write!(f, "invalid driver settings: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl DriverSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Like [`DriverSettings::load`], but a missing or broken file only costs a warning.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                info!("loaded driver settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!("{e} ({}), using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }

    pub fn button_count(&self) -> u32 {
        self.button_count.min(MAX_BUTTONS)
    }

    pub fn joystick_count(&self) -> u32 {
        self.joystick_count.min(MAX_JOYSTICKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = DriverSettings::default();
        assert_eq!(settings.controllers, [0, 1]);
        assert_eq!(settings.startup_timeout(), Duration::from_secs(5));
        assert_eq!(settings.model_number, "OSVR Controller");
        assert_eq!(settings.render_model_name, "");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings = DriverSettings::from_json(r#"{ "controllers": [2], "joystick_count": 9 }"#)
            .unwrap();
        assert_eq!(settings.controllers, [2]);
        assert_eq!(settings.joystick_count(), MAX_JOYSTICKS);
        assert_eq!(settings.startup_timeout_ms, 5000);
        assert_eq!(settings.button_count(), MAX_BUTTONS);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = DriverSettings::from_json("{ controllers: ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().starts_with("invalid driver settings"));
    }

    #[test]
    fn missing_file_falls_back() {
        let settings = DriverSettings::load_or_default("/nonexistent/driver_osvr.json");
        assert_eq!(settings, DriverSettings::default());
    }
}
