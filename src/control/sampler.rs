//! Input sampler
//!
//! Reads one [`BindingDescriptor`] against a per-tick [`DeviceSnapshot`] and
//! returns how strongly that input is engaged, from 0.0 (idle) to 1.0 (fully
//! engaged). Missing gamepads and out-of-range indices read as 0.0: controllers
//! legitimately expose fewer inputs than a config may name.

use super::binding::{AxisDirection, BindingDescriptor, HatDirection};

/// One hat switch, each coordinate in {-1, 0, 1}
///
/// `x` is positive to the right, `y` is positive upwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HatState {
    pub x: i8,
    pub y: i8,
}

impl HatState {
    pub fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }
}

/// Raw gamepad state for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceSnapshot {
    pub present: bool,
    /// Axis values in -1..1
    pub axes: Vec<f32>,
    pub hats: Vec<HatState>,
    pub buttons: Vec<bool>,
}

impl DeviceSnapshot {
    /// Snapshot for a tick with no gamepad attached
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Samples `descriptor` against `snapshot`, returning a magnitude in 0..1
pub fn sample(descriptor: &BindingDescriptor, snapshot: &DeviceSnapshot) -> f32 {
    if !snapshot.present {
        return 0.0;
    }

    match *descriptor {
        BindingDescriptor::Axis { index, direction } => {
            let Some(&raw) = snapshot.axes.get(index) else {
                return 0.0;
            };
            let raw = raw.clamp(-1.0, 1.0);
            match direction {
                AxisDirection::Full => 0.5 * raw + 0.5,
                AxisDirection::Positive => raw.max(0.0),
                AxisDirection::Negative => (-raw).max(0.0),
            }
        }
        BindingDescriptor::Hat { index, direction } => {
            let Some(hat) = snapshot.hats.get(index) else {
                return 0.0;
            };
            let engaged = match direction {
                HatDirection::Up => hat.y == 1,
                HatDirection::Down => hat.y == -1,
                HatDirection::Right => hat.x == 1,
                HatDirection::Left => hat.x == -1,
            };
            if engaged {
                1.0
            } else {
                0.0
            }
        }
        BindingDescriptor::Button { index } => match snapshot.buttons.get(index) {
            Some(true) => 1.0,
            _ => 0.0,
        },
    }
}
