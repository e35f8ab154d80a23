use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use tracing::{debug, error, info, warn};

use crate::control::{DeviceSnapshot, HatState};

// Linux XInput axis order: left X, left Y, left trigger, right X, right Y, right trigger
const AXIS_COUNT: usize = 6;

// Linux XInput button order, as exposed by the xpad driver
const BUTTON_LAYOUT: [Button; 11] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::Select,
    Button::Start,
    Button::Mode,
    Button::LeftThumb,
    Button::RightThumb,
];

#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    #[error("Failed to initialize gamepad support: {0}")]
    InitializationError(String),
}

/// Read access to a single gamepad's current state
pub trait PadState {
    /// Stick position in -1..1, y positive upwards
    fn axis(&self, axis: Axis) -> f32;

    fn is_pressed(&self, button: Button) -> bool;

    /// Analog trigger travel in 0..1
    fn trigger(&self, button: Button) -> f32;
}

impl PadState for Gamepad<'_> {
    fn axis(&self, axis: Axis) -> f32 {
        self.value(axis)
    }

    fn is_pressed(&self, button: Button) -> bool {
        Gamepad::is_pressed(self, button)
    }

    fn trigger(&self, button: Button) -> f32 {
        self.button_data(button).map_or(0.0, |data| data.value())
    }
}

/// Builds a snapshot in the layout the default bindings assume
///
/// Stick Y axes are flipped so down is positive, and triggers are spread over
/// -1 (released) to 1 (fully pressed). The D-pad is reported as hat 0.
pub fn snapshot_from(pad: &impl PadState) -> DeviceSnapshot {
    let trigger_axis = |button| pad.trigger(button).clamp(0.0, 1.0) * 2.0 - 1.0;

    let mut axes = Vec::with_capacity(AXIS_COUNT);
    axes.push(pad.axis(Axis::LeftStickX));
    axes.push(-pad.axis(Axis::LeftStickY));
    axes.push(trigger_axis(Button::LeftTrigger2));
    axes.push(pad.axis(Axis::RightStickX));
    axes.push(-pad.axis(Axis::RightStickY));
    axes.push(trigger_axis(Button::RightTrigger2));

    let direction = |positive, negative| {
        i8::from(pad.is_pressed(positive)) - i8::from(pad.is_pressed(negative))
    };
    let dpad = HatState::new(
        direction(Button::DPadRight, Button::DPadLeft),
        direction(Button::DPadUp, Button::DPadDown),
    );

    DeviceSnapshot {
        present: true,
        axes,
        hats: vec![dpad],
        buttons: BUTTON_LAYOUT
            .iter()
            .map(|&button| pad.is_pressed(button))
            .collect(),
    }
}

/// Per-tick gamepad reader
///
/// Always reads the first connected gamepad. Attach and detach are picked up
/// on the next poll.
pub struct GamepadPoller {
    gilrs: Gilrs,

    // Gamepad used for the last snapshot, for change logging
    active_gamepad: Option<GamepadId>,
}

impl GamepadPoller {
    pub fn create() -> Result<Self, PollerError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(PollerError::InitializationError(e.to_string()));
            }
        };

        let gamepads: Vec<(GamepadId, Gamepad<'_>)> = gilrs.gamepads().collect();
        if gamepads.is_empty() {
            warn!("No gamepad connected, keyboard control only until one is attached");
        } else {
            info!("Found {} gamepads:", gamepads.len());
            for (idx, (id, gamepad)) in gamepads.iter().enumerate() {
                info!("  [{}] ID: {}, Name: {}", idx, id, gamepad.name());
            }
        }

        Ok(Self {
            gilrs,
            active_gamepad: None,
        })
    }

    /// Drains pending gamepad events and snapshots the first connected gamepad
    pub fn poll(&mut self) -> DeviceSnapshot {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => info!("Gamepad {} connected", id),
                EventType::Disconnected => warn!("Gamepad {} disconnected", id),
                _ => {}
            }
        }

        let Some((id, gamepad)) = self.gilrs.gamepads().next() else {
            if let Some(previous) = self.active_gamepad.take() {
                info!("Gamepad {} gone, keyboard control only", previous);
            }
            return DeviceSnapshot::absent();
        };

        if self.active_gamepad != Some(id) {
            info!("Using gamepad {} ({})", gamepad.name(), id);
            self.active_gamepad = Some(id);
        }

        let snapshot = snapshot_from(&gamepad);
        debug!("Gamepad snapshot: {:?}", snapshot);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakePad {
        axes: HashMap<Axis, f32>,
        pressed: Vec<Button>,
        triggers: HashMap<Button, f32>,
    }

    impl PadState for FakePad {
        fn axis(&self, axis: Axis) -> f32 {
            self.axes.get(&axis).copied().unwrap_or(0.0)
        }

        fn is_pressed(&self, button: Button) -> bool {
            self.pressed.contains(&button)
        }

        fn trigger(&self, button: Button) -> f32 {
            self.triggers.get(&button).copied().unwrap_or(0.0)
        }
    }

    #[test]
    fn idle_pad_rests_triggers_at_minus_one() {
        let snapshot = snapshot_from(&FakePad::default());
        assert!(snapshot.present);
        assert_eq!(snapshot.axes, vec![0.0, 0.0, -1.0, 0.0, 0.0, -1.0]);
        assert_eq!(snapshot.hats, vec![HatState::default()]);
        assert_eq!(snapshot.buttons, vec![false; 11]);
    }

    #[test]
    fn stick_y_is_down_positive() {
        let mut pad = FakePad::default();
        pad.axes.insert(Axis::RightStickY, -0.75);
        pad.axes.insert(Axis::LeftStickY, 0.5);
        pad.axes.insert(Axis::LeftStickX, 0.25);

        let snapshot = snapshot_from(&pad);
        assert_eq!(snapshot.axes[4], 0.75);
        assert_eq!(snapshot.axes[1], -0.5);
        assert_eq!(snapshot.axes[0], 0.25);
    }

    #[test]
    fn triggers_span_full_axis() {
        let mut pad = FakePad::default();
        pad.triggers.insert(Button::RightTrigger2, 1.0);
        pad.triggers.insert(Button::LeftTrigger2, 0.5);

        let snapshot = snapshot_from(&pad);
        assert_eq!(snapshot.axes[5], 1.0);
        assert_eq!(snapshot.axes[2], 0.0);
    }

    #[test]
    fn dpad_becomes_hat_zero() {
        let pad = FakePad {
            pressed: vec![Button::DPadLeft, Button::DPadUp],
            ..Default::default()
        };
        assert_eq!(snapshot_from(&pad).hats[0], HatState::new(-1, 1));

        let pad = FakePad {
            pressed: vec![Button::DPadRight, Button::DPadDown],
            ..Default::default()
        };
        assert_eq!(snapshot_from(&pad).hats[0], HatState::new(1, -1));
    }

    #[test]
    fn buttons_follow_xinput_order() {
        let pad = FakePad {
            pressed: vec![Button::South, Button::Select, Button::RightThumb],
            ..Default::default()
        };
        let buttons = snapshot_from(&pad).buttons;
        assert!(buttons[0]);
        assert!(buttons[6]);
        assert!(buttons[10]);
        assert_eq!(buttons.iter().filter(|&&b| b).count(), 3);
    }
}
