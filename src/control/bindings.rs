//! Resolution of the configured controls into keys and descriptors

use egui::Key;
use tracing::{debug, error, info};

use super::binding::{parse_binding, BindingDescriptor};
use super::error::ControlError;
use super::Action;
use crate::config::HandConfig;

/// Keyboard key and joystick descriptor bound to one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionBinding {
    pub key: Key,
    pub descriptor: BindingDescriptor,
}

/// Resolved bindings for all six actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlBindings {
    bindings: [ActionBinding; 6],
}

impl ControlBindings {
    /// Resolves every action of `config`
    ///
    /// Each malformed entry is logged; the first one is returned.
    pub fn from_config(config: &HandConfig) -> Result<Self, ControlError> {
        let bindings = resolve_all(config).map_err(|errors| {
            for e in &errors {
                error!("{}", e);
            }
            errors
                .into_iter()
                .next()
                .unwrap_or(ControlError::InvalidBinding { action: None })
        })?;

        for (action, binding) in Action::ALL.iter().zip(&bindings) {
            debug!(
                "{} bound to key {:?} and {}",
                action, binding.key, binding.descriptor
            );
        }
        info!("Resolved bindings for {} actions", bindings.len());
        Ok(Self { bindings })
    }

    pub fn get(&self, action: Action) -> &ActionBinding {
        &self.bindings[action.index()]
    }
}

/// Attempts all six actions, collecting every failure in [`Action::ALL`] order
fn resolve_all(config: &HandConfig) -> Result<[ActionBinding; 6], Vec<ControlError>> {
    let mut resolved = Vec::with_capacity(Action::ALL.len());
    let mut errors = Vec::new();

    for action in Action::ALL {
        match resolve_action(
            action,
            config.keyboard.get(action),
            config.joystick.get(action),
        ) {
            Ok(binding) => resolved.push(binding),
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    resolved
        .try_into()
        .map_err(|_| vec![ControlError::InvalidBinding { action: None }])
}

fn resolve_action(
    action: Action,
    key_name: &str,
    binding: &str,
) -> Result<ActionBinding, ControlError> {
    let key = resolve_key(key_name).ok_or_else(|| ControlError::InvalidKey {
        action: action.to_string(),
        key: key_name.to_string(),
    })?;
    let descriptor = parse_binding(binding, Some(action.config_name()))?;
    Ok(ActionBinding { key, descriptor })
}

/// Looks up a keyboard key by its config name
///
/// Names are case-insensitive. Besides egui's own key names, the short forms
/// `up`, `down`, `left`, `right`, `return`, `esc` and `space` are accepted.
pub fn resolve_key(name: &str) -> Option<Key> {
    let name = name.trim();
    let alias = match name.to_ascii_lowercase().as_str() {
        "up" => Some(Key::ArrowUp),
        "down" => Some(Key::ArrowDown),
        "left" => Some(Key::ArrowLeft),
        "right" => Some(Key::ArrowRight),
        "return" | "enter" => Some(Key::Enter),
        "esc" | "escape" => Some(Key::Escape),
        "space" => Some(Key::Space),
        "backspace" => Some(Key::Backspace),
        "tab" => Some(Key::Tab),
        _ => None,
    };
    if alias.is_some() {
        return alias;
    }

    Key::from_name(name).or_else(|| {
        let mut chars = name.chars();
        let first = chars.next()?;
        let capitalized: String = first.to_uppercase().chain(chars).collect();
        Key::from_name(&capitalized)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::binding::AxisDirection;

    #[test]
    fn resolves_letters_case_insensitively() {
        assert_eq!(resolve_key("x"), Some(Key::X));
        assert_eq!(resolve_key("X"), Some(Key::X));
        assert_eq!(resolve_key("z"), Some(Key::Z));
    }

    #[test]
    fn resolves_short_aliases() {
        assert_eq!(resolve_key("up"), Some(Key::ArrowUp));
        assert_eq!(resolve_key("Down"), Some(Key::ArrowDown));
        assert_eq!(resolve_key("LEFT"), Some(Key::ArrowLeft));
        assert_eq!(resolve_key("right"), Some(Key::ArrowRight));
        assert_eq!(resolve_key("return"), Some(Key::Enter));
        assert_eq!(resolve_key("space"), Some(Key::Space));
    }

    #[test]
    fn resolves_egui_names() {
        assert_eq!(resolve_key("ArrowUp"), Some(Key::ArrowUp));
        assert_eq!(resolve_key("F5"), Some(Key::F5));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert_eq!(resolve_key("notakey"), None);
        assert_eq!(resolve_key(""), None);
    }

    #[test]
    fn default_config_resolves() {
        let bindings = ControlBindings::from_config(&HandConfig::default()).unwrap();
        assert_eq!(bindings.get(Action::Grab).key, Key::X);
        assert_eq!(bindings.get(Action::FlexBackward).key, Key::ArrowUp);
        assert_eq!(
            bindings.get(Action::TurnRight).descriptor,
            BindingDescriptor::Axis {
                index: 0,
                direction: AxisDirection::Positive
            }
        );
    }

    #[test]
    fn reports_first_bad_action() {
        let mut config = HandConfig::default();
        config.joystick.flex_forward = "axis".to_string();
        config.joystick.turn_left = "stick".to_string();
        let err = ControlBindings::from_config(&config).unwrap_err();
        assert_eq!(err.to_string(), "Flex_Forward controller input invalid");
    }

    #[test]
    fn every_bad_action_is_collected() {
        let mut config = HandConfig::default();
        config.joystick.flex_forward = "axis".to_string();
        config.joystick.turn_left = "stick".to_string();
        config.keyboard.turn_right = "bogus".to_string();

        let errors = resolve_all(&config).unwrap_err();
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "Flex_Forward controller input invalid".to_string(),
                "Turn_Left controller input invalid".to_string(),
                "Turn_Right keyboard key 'bogus' invalid".to_string(),
            ]
        );
    }

    #[test]
    fn reports_bad_keyboard_key() {
        let mut config = HandConfig::default();
        config.keyboard.release = "bogus".to_string();
        let err = ControlBindings::from_config(&config).unwrap_err();
        assert_eq!(
            err,
            ControlError::InvalidKey {
                action: "Release".to_string(),
                key: "bogus".to_string()
            }
        );
    }
}
