//! The slice of an OSVR-style tracking client that device drivers consume.
//!
//! A [`ClientContext`] hands out [`ClientInterface`]s by path (`/me/hands/left`,
//! `/controller/left/trigger`, ...). Each interface delivers reports to the callbacks registered
//! on it, on whatever thread the client uses for delivery.

use glam::{DQuat, DVec3};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct TimeValue {
    pub seconds: i64,
    pub microseconds: i32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pose3 {
    pub translation: DVec3,
    pub rotation: DQuat,
}

impl Default for Pose3 {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct PoseReport {
    pub sensor: i32,
    pub pose: Pose3,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ButtonState {
    NotPressed,
    Pressed,
}

impl From<bool> for ButtonState {
    fn from(pressed: bool) -> Self {
        if pressed {
            Self::Pressed
        } else {
            Self::NotPressed
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ButtonReport {
    pub sensor: i32,
    pub state: ButtonState,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct AnalogReport {
    pub sensor: i32,
    pub state: f64,
}

pub type PoseCallback = Box<dyn Fn(&TimeValue, &PoseReport) + Send + Sync>;
pub type ButtonCallback = Box<dyn Fn(&TimeValue, &ButtonReport) + Send + Sync>;
pub type AnalogCallback = Box<dyn Fn(&TimeValue, &AnalogReport) + Send + Sync>;

/// A typed report handler. Interfaces only deliver reports matching the handler's kind.
pub enum Callback {
    Pose(PoseCallback),
    Button(ButtonCallback),
    Analog(AnalogCallback),
}

impl Callback {
    pub fn pose(f: impl Fn(&TimeValue, &PoseReport) + Send + Sync + 'static) -> Self {
        Self::Pose(Box::new(f))
    }

    pub fn button(f: impl Fn(&TimeValue, &ButtonReport) + Send + Sync + 'static) -> Self {
        Self::Button(Box::new(f))
    }

    pub fn analog(f: impl Fn(&TimeValue, &AnalogReport) + Send + Sync + 'static) -> Self {
        Self::Analog(Box::new(f))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pose(_) => "pose",
            Self::Button(_) => "button",
            Self::Analog(_) => "analog",
        }
    }
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Callback::{}", self.kind())
    }
}

pub trait ClientContext: Send + Sync {
    /// Whether the context has finished starting up.
    fn check_status(&self) -> bool;
    /// Pumps the client, delivering any pending reports.
    fn update(&self);
    /// Looks up the interface at `path`. `None` if nothing in the client's path tree resolves it.
    fn get_interface(&self, path: &str) -> Option<Box<dyn ClientInterface>>;
}

pub trait ClientInterface: Send {
    fn path(&self) -> &str;
    fn register_callback(&mut self, callback: Callback);
    /// Deregisters every callback and releases the interface. Idempotent.
    fn free(&mut self);
}
