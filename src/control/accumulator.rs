//! Control accumulator
//!
//! Holds the three actuator values and moves them once per tick. For each
//! channel the gamepad governs when it is present and its signed input clears
//! the deadzone; otherwise the keyboard governs. Exactly one source moves a
//! channel per tick, and channels are decided independently, so grab can follow
//! the keyboard while turn follows the stick.

use std::collections::HashSet;

use egui::Key;
use tracing::debug;

use super::bindings::ControlBindings;
use super::sampler::{sample, DeviceSnapshot};
use super::Action;

/// Units a channel moves per tick at full input
///
/// 0 to 255 takes 43 ticks, about 1.4 s at 30 Hz.
pub const STEP: i32 = 6;

/// Minimum absolute analog input for the gamepad to take a channel over
pub const ANALOG_DEADZONE: f32 = 0.15;

/// Value of every channel at startup
pub const INITIAL_VALUE: u8 = 127;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Grab,
    Flex,
    Turn,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Grab, Channel::Flex, Channel::Turn];

    /// The (increasing, decreasing) actions driving this channel
    pub fn actions(self) -> (Action, Action) {
        match self {
            Channel::Grab => (Action::Grab, Action::Release),
            Channel::Flex => (Action::FlexForward, Action::FlexBackward),
            Channel::Turn => (Action::TurnRight, Action::TurnLeft),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Channel::Grab => "Grab",
            Channel::Flex => "Flex",
            Channel::Turn => "Turn",
        }
    }
}

/// Which input moved a channel during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Keyboard,
    Analog,
}

/// Keys held down during a tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardSnapshot {
    pressed: HashSet<Key>,
}

impl KeyboardSnapshot {
    pub fn new(pressed: HashSet<Key>) -> Self {
        Self { pressed }
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}

impl FromIterator<Key> for KeyboardSnapshot {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Grab, flex and turn, each 0..=255
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorState {
    pub grab: u8,
    pub flex: u8,
    pub turn: u8,
}

impl Default for ActuatorState {
    fn default() -> Self {
        Self {
            grab: INITIAL_VALUE,
            flex: INITIAL_VALUE,
            turn: INITIAL_VALUE,
        }
    }
}

impl ActuatorState {
    pub fn get(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Grab => self.grab,
            Channel::Flex => self.flex,
            Channel::Turn => self.turn,
        }
    }

    fn slot_mut(&mut self, channel: Channel) -> &mut u8 {
        match channel {
            Channel::Grab => &mut self.grab,
            Channel::Flex => &mut self.flex,
            Channel::Turn => &mut self.turn,
        }
    }

    /// Channel value as a percentage of full travel
    pub fn percent(&self, channel: Channel) -> f32 {
        100.0 * f32::from(self.get(channel)) / 255.0
    }

    /// Advances every channel by one tick
    ///
    /// Returns the source that moved each channel, in [`Channel::ALL`] order.
    pub fn tick(
        &mut self,
        keyboard: &KeyboardSnapshot,
        device: &DeviceSnapshot,
        bindings: &ControlBindings,
    ) -> [InputSource; 3] {
        Channel::ALL.map(|channel| {
            let (increase, decrease) = channel.actions();
            let increase = bindings.get(increase);
            let decrease = bindings.get(decrease);

            let signed = if device.present {
                sample(&increase.descriptor, device) - sample(&decrease.descriptor, device)
            } else {
                0.0
            };

            let slot = self.slot_mut(channel);
            if device.present && signed.abs() >= ANALOG_DEADZONE {
                *slot = step_analog(*slot, signed);
                debug!("{:?} analog {:.3} -> {}", channel, signed, *slot);
                InputSource::Analog
            } else {
                let direction =
                    i32::from(keyboard.is_down(increase.key)) - i32::from(keyboard.is_down(decrease.key));
                *slot = step_keyboard(*slot, direction);
                InputSource::Keyboard
            }
        })
    }
}

/// Applies an analog input; the scaled step truncates toward zero
///
/// Only the step is truncated, not the sum: `10` moved by `-0.6` lands on 7
/// (`10 + trunc(-3.6)`), where flooring `10 - 3.6` would give 6. The two differ
/// by one unit for negative fractional steps only.
pub fn step_analog(value: u8, signed: f32) -> u8 {
    let delta = (STEP as f32 * signed).trunc() as i32;
    saturate(i32::from(value) + delta)
}

/// Applies a keyboard direction of -1, 0 or 1
pub fn step_keyboard(value: u8, direction: i32) -> u8 {
    saturate(i32::from(value) + STEP * direction)
}

fn saturate(value: i32) -> u8 {
    value.clamp(0, i32::from(u8::MAX)) as u8
}
