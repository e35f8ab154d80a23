//! Heads-up display: actuator percentages and the hand's latest status line

use eframe::egui::{self, Color32, RichText};

use crate::control::{ActuatorState, Channel};
use crate::serial::link::HandStatus;

pub const BACKGROUND: Color32 = Color32::BLACK;
pub const TEXT: Color32 = Color32::WHITE;
pub const TEXT_SIZE: f32 = 24.0;

/// `Grab: 50%` style line for one channel
pub fn channel_line(state: &ActuatorState, channel: Channel) -> String {
    format!("{}: {:.0}%", channel.label(), state.percent(channel))
}

pub fn status_line(status: &HandStatus) -> String {
    format!(
        "[{}] {}",
        status.received_at.format("%H:%M:%S"),
        status.text
    )
}

fn hud_text(text: String) -> RichText {
    RichText::new(text).size(TEXT_SIZE).color(TEXT)
}

fn hud_frame() -> egui::Frame {
    egui::Frame::default().fill(BACKGROUND)
}

pub fn render(ctx: &egui::Context, state: &ActuatorState, status: &HandStatus) {
    egui::TopBottomPanel::bottom("status_panel")
        .frame(hud_frame())
        .show_separator_line(false)
        .show(ctx, |ui| {
            ui.label(hud_text(status_line(status)));
        });

    egui::CentralPanel::default().frame(hud_frame()).show(ctx, |ui| {
        ui.add_space(10.0);
        for channel in Channel::ALL {
            ui.label(hud_text(channel_line(state, channel)));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn channel_lines_show_rounded_percentages() {
        let state = ActuatorState {
            grab: 255,
            flex: 0,
            turn: 127,
        };
        assert_eq!(channel_line(&state, Channel::Grab), "Grab: 100%");
        assert_eq!(channel_line(&state, Channel::Flex), "Flex: 0%");
        assert_eq!(channel_line(&state, Channel::Turn), "Turn: 50%");
    }

    #[test]
    fn status_line_carries_arrival_time() {
        let status = HandStatus {
            text: "Robot hand ready".to_string(),
            received_at: Local.with_ymd_and_hms(2024, 5, 22, 14, 3, 9).unwrap(),
        };
        assert_eq!(status_line(&status), "[14:03:09] Robot hand ready");
    }
}
