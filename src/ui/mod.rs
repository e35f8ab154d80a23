//! # Robot Hand Control window
//!
//! Shows the actuator percentages and the hand's latest status line. The
//! control loop itself runs in a [`ControlSession`](crate::session::ControlSession)
//! task; the window only publishes the keys held down and draws what the
//! session reports back. Minimizing or hiding the window does not pause the
//! hand.

pub mod hud;

use eframe::egui;

use crate::control::KeyboardSnapshot;
use crate::session::{tick_interval, SessionHandle};

pub const WINDOW_TITLE: &str = "Robot Hand Control";
pub const WINDOW_SIZE: [f32; 2] = [900.0, 600.0];

pub struct HandControlUI {
    session: SessionHandle,
}

impl HandControlUI {
    pub fn new(cc: &eframe::CreationContext<'_>, session: SessionHandle) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self { session }
    }
}

/// Keys held down, or none while the window is unfocused
fn keyboard_snapshot(input: &egui::InputState) -> KeyboardSnapshot {
    if !input.focused {
        return KeyboardSnapshot::default();
    }
    input.keys_down.iter().copied().collect()
}

impl eframe::App for HandControlUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.set_keyboard(ctx.input(keyboard_snapshot));

        hud::render(ctx, &self.session.state(), &self.session.status());

        ctx.request_repaint_after(tick_interval());
    }
}
