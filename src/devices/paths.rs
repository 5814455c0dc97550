//! Interface paths in the tracking client's namespace for each controller index.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControllerRole {
    LeftHand,
    RightHand,
    Generic(u32),
}

impl From<u32> for ControllerRole {
    fn from(index: u32) -> Self {
        match index {
            0 => ControllerRole::LeftHand,
            1 => ControllerRole::RightHand,
            n => ControllerRole::Generic(n),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Component {
    X,
    Y,
}

impl Component {
    fn suffix(self) -> &'static str {
        match self {
            Component::X => "x",
            Component::Y => "y",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePaths {
    /// Only hands have a tracker.
    pub tracker: Option<String>,
    root: String,
}

impl DevicePaths {
    pub fn new(role: ControllerRole) -> Self {
        match role {
            ControllerRole::LeftHand => Self {
                tracker: Some("/me/hands/left".to_owned()),
                root: "/controller/left/".to_owned(),
            },
            ControllerRole::RightHand => Self {
                tracker: Some("/me/hands/right".to_owned()),
                root: "/controller/right/".to_owned(),
            },
            ControllerRole::Generic(n) => Self {
                tracker: None,
                root: format!("/controller{n}/"),
            },
        }
    }

    pub fn button(&self, button: u32) -> String {
        format!("{}{button}", self.root)
    }

    pub fn trigger(&self) -> String {
        format!("{}trigger", self.root)
    }

    /// The first joystick is `joystick/x`; later ones are numbered, e.g. `joystick1/x`.
    pub fn joystick(&self, joystick: u32, component: Component) -> String {
        let suffix = component.suffix();
        match joystick {
            0 => format!("{}joystick/{suffix}", self.root),
            n => format!("{}joystick{n}/{suffix}", self.root),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_paths() {
        let left = DevicePaths::new(0.into());
        assert_eq!(left.tracker.as_deref(), Some("/me/hands/left"));
        assert_eq!(left.button(3), "/controller/left/3");
        assert_eq!(left.trigger(), "/controller/left/trigger");
        assert_eq!(left.joystick(0, Component::X), "/controller/left/joystick/x");
        assert_eq!(left.joystick(1, Component::Y), "/controller/left/joystick1/y");

        let right = DevicePaths::new(1.into());
        assert_eq!(right.tracker.as_deref(), Some("/me/hands/right"));
        assert_eq!(right.trigger(), "/controller/right/trigger");
    }

    #[test]
    fn generic_controllers_have_no_tracker() {
        let paths = DevicePaths::new(ControllerRole::from(4));
        assert_eq!(paths.tracker, None);
        assert_eq!(paths.button(0), "/controller4/0");
        assert_eq!(paths.trigger(), "/controller4/trigger");
        assert_eq!(paths.joystick(0, Component::Y), "/controller4/joystick/y");
    }
}
