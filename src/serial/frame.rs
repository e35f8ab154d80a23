use crate::control::{ActuatorState, Channel};

/// Tag byte announcing each channel's value to the hand firmware
pub const fn channel_tag(channel: Channel) -> u8 {
    match channel {
        Channel::Grab => 0x19,
        Channel::Flex => 0x16,
        Channel::Turn => 0x17,
    }
}

/// Outgoing frame: tag/value pairs for grab, flex and turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorFrame([u8; 6]);

impl ActuatorFrame {
    pub const LEN: usize = 6;

    pub fn encode(state: &ActuatorState) -> Self {
        Self([
            channel_tag(Channel::Grab),
            state.grab,
            channel_tag(Channel::Flex),
            state.flex,
            channel_tag(Channel::Turn),
            state.turn,
        ])
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}
