//! Error types for the control core

use thiserror::Error;

/// Errors raised while resolving the configured controls at startup
///
/// Sampling and accumulation never fail; everything that can go wrong is caught
/// here, before the first tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    /// A joystick binding string matched no known shape or had a bad index
    #[error("{}", invalid_binding_message(.action.as_deref()))]
    InvalidBinding { action: Option<String> },

    /// A keyboard key name could not be resolved
    #[error("{action} keyboard key '{key}' invalid")]
    InvalidKey { action: String, key: String },
}

fn invalid_binding_message(action: Option<&str>) -> String {
    match action {
        Some(action) => format!("{action} controller input invalid"),
        None => "Controller input invalid".to_string(),
    }
}
