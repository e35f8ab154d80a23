//! Gamepad input via gilrs
//!
//! [`GamepadPoller`] is polled once per tick by the control session and turns the
//! first connected gamepad into a [`DeviceSnapshot`](crate::control::DeviceSnapshot).
//! No gamepad, or gilrs failing to start, simply means keyboard-only control.

pub mod gamepad;

pub use gamepad::{snapshot_from, GamepadPoller, PadState, PollerError};
