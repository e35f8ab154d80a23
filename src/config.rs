//! Hand control configuration
//!
//! A single TOML file with a `[keyboard]` and a `[joystick]` section, each
//! naming the six actions, plus `[serial]` settings. Missing sections or keys
//! fall back to the defaults below; a missing file is created with those
//! defaults and an explanatory header.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::control::Action;

pub const CONFIG_FILE: &str = "config.toml";
const USER_CONFIG_DIR: &str = "handlink";
pub const DEFAULT_BAUD_RATE: u32 = 9600;

const CONFIG_HEADER: &str = "\
# Robot Hand Control Configuration File
#
# For each of the keyboard values, type in the name of the desired key
# (e.g. \"x\", \"return\", \"up\", \"F5\").
#
# For each of the joystick values, write it in the following format:
# \"[input type][input index][input direction]\", where [input type] is
# either \"axis\", \"hat\", or \"button\", [input index] is the zero-indexed
# index of the input, and [input direction] specifies the direction of an
# axis or hat if applicable. Some examples of valid joystick values:
#     - axis0
#     - axis2-
#     - hat0up
#     - button5
#
# The default controls are as follows (Xbox controller as joystick):
#
#     Action     | Keyboard |     Joystick
# ---------------|----------|------------------
#  Grab          | X        | Right Trigger
#  Release       | Z        | Left Trigger
#  Flex Forward  | Down     | Right Stick Down
#  Flex Backward | Up       | Right Stick Up
#  Turn Left     | Left     | Left Stick Left
#  Turn Right    | Right    | Left Stick Right

";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Default values of one action section, in [`Action::ALL`] order
pub trait SectionDefaults {
    const DEFAULTS: [&'static str; 6];
}

/// Marker for the `[keyboard]` section: key names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardSection {}

impl SectionDefaults for KeyboardSection {
    const DEFAULTS: [&'static str; 6] = ["x", "z", "down", "up", "left", "right"];
}

/// Marker for the `[joystick]` section: binding strings, Linux XInput layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoystickSection {}

impl SectionDefaults for JoystickSection {
    const DEFAULTS: [&'static str; 6] = ["axis5", "axis2", "axis4+", "axis4-", "axis0-", "axis0+"];
}

/// One config string per action
///
/// Keys missing from the file keep the section's default.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, bound(deserialize = "S: SectionDefaults", serialize = ""))]
pub struct ActionTable<S> {
    #[serde(rename = "Grab")]
    pub grab: String,
    #[serde(rename = "Release")]
    pub release: String,
    #[serde(rename = "Flex_Forward")]
    pub flex_forward: String,
    #[serde(rename = "Flex_Backward")]
    pub flex_backward: String,
    #[serde(rename = "Turn_Left")]
    pub turn_left: String,
    #[serde(rename = "Turn_Right")]
    pub turn_right: String,

    #[serde(skip)]
    section: PhantomData<S>,
}

pub type KeyboardBindings = ActionTable<KeyboardSection>;
pub type JoystickBindings = ActionTable<JoystickSection>;

impl<S: SectionDefaults> Default for ActionTable<S> {
    fn default() -> Self {
        let [grab, release, flex_forward, flex_backward, turn_left, turn_right] =
            S::DEFAULTS.map(str::to_string);
        Self {
            grab,
            release,
            flex_forward,
            flex_backward,
            turn_left,
            turn_right,
            section: PhantomData,
        }
    }
}

impl<S> ActionTable<S> {
    pub fn get(&self, action: Action) -> &str {
        match action {
            Action::Grab => &self.grab,
            Action::Release => &self.release,
            Action::FlexForward => &self.flex_forward,
            Action::FlexBackward => &self.flex_backward,
            Action::TurnLeft => &self.turn_left,
            Action::TurnRight => &self.turn_right,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct SerialConfig {
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct HandConfig {
    pub keyboard: KeyboardBindings,
    pub joystick: JoystickBindings,
    pub serial: SerialConfig,
}

impl HandConfig {
    pub fn from_toml(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default file content: explanatory header followed by the default values
    pub fn default_file_content() -> Result<String, ConfigError> {
        let body = toml::to_string_pretty(&HandConfig::default())?;
        Ok(format!("{CONFIG_HEADER}{body}"))
    }

    /// Loads the config from `path`, creating it with defaults if it is missing
    pub async fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        if exists {
            debug!("Reading config from {}", path.display());
            let content =
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| ConfigError::Read {
                        path: path.to_path_buf(),
                        source,
                    })?;
            let config = Self::from_toml(path, &content)?;
            info!("Loaded config from {}", path.display());
            return Ok(config);
        }

        warn!(
            "No config found at {}, writing defaults",
            path.display()
        );
        tokio::fs::write(path, Self::default_file_content()?)
            .await
            .map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::default())
    }
}

/// Picks the config file to use
///
/// An explicit path always wins. Otherwise `local` is used, unless only the
/// per-user copy under `user_dir` exists.
pub fn resolve_config_path(
    explicit: Option<PathBuf>,
    local: &Path,
    user_dir: Option<&Path>,
) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }

    if local.exists() {
        return local.to_path_buf();
    }

    if let Some(dir) = user_dir {
        let user = dir.join(USER_CONFIG_DIR).join(CONFIG_FILE);
        if user.exists() {
            debug!("Using user config {}", user.display());
            return user;
        }
    }
    local.to_path_buf()
}
