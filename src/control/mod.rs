//! Control core for the robot hand
//!
//! Turns configured bindings and live input into the three actuator values:
//!
//! 1. [`binding`] - Binding strings (`"axis4+"`, `"hat0left"`, `"button6"`) to descriptors
//! 2. [`sampler`] - Descriptor + gamepad snapshot to a normalized magnitude
//! 3. [`accumulator`] - Per-tick saturating update of grab, flex and turn
//!
//! # Data flow
//!
//! ```text
//! config strings ──► BindingDescriptor ─┐
//!                                       ├──► sample() ──► ActuatorState::tick() ──► frame
//! gamepad poller ──► DeviceSnapshot ────┘                        ▲
//! egui input ─────► KeyboardSnapshot ────────────────────────────┘
//! ```
//!
//! Descriptors are resolved once at startup. Sampling and accumulation run once
//! per tick in the control session task and never block.

pub mod accumulator;
pub mod binding;
pub mod bindings;
pub mod error;
pub mod sampler;

use std::fmt;

pub use accumulator::{ActuatorState, Channel, InputSource, KeyboardSnapshot};
pub use binding::{parse_binding, AxisDirection, BindingDescriptor, HatDirection};
pub use bindings::{resolve_key, ActionBinding, ControlBindings};
pub use error::ControlError;
pub use sampler::{sample, DeviceSnapshot, HatState};

/// One of the six configurable hand actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Grab,
    Release,
    FlexForward,
    FlexBackward,
    TurnLeft,
    TurnRight,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Grab,
        Action::Release,
        Action::FlexForward,
        Action::FlexBackward,
        Action::TurnLeft,
        Action::TurnRight,
    ];

    /// Key used for this action in the `[keyboard]` and `[joystick]` config sections
    pub fn config_name(self) -> &'static str {
        match self {
            Action::Grab => "Grab",
            Action::Release => "Release",
            Action::FlexForward => "Flex_Forward",
            Action::FlexBackward => "Flex_Backward",
            Action::TurnLeft => "Turn_Left",
            Action::TurnRight => "Turn_Right",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Action::Grab => 0,
            Action::Release => 1,
            Action::FlexForward => 2,
            Action::FlexBackward => 3,
            Action::TurnLeft => 4,
            Action::TurnRight => 5,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}
