//! Binding descriptor parser
//!
//! Compiles the human-readable joystick bindings from the config file into
//! [`BindingDescriptor`] values. Accepted shapes (case-insensitive):
//!
//! ```text
//! axis<N>        whole axis, -1..1 mapped to 0..1
//! axis<N>+       positive half of the axis
//! axis<N>-       negative half of the axis
//! hat[N]left     hat direction, N defaults to 0
//! hat[N]right
//! hat[N]down
//! hat[N]up
//! button<N>
//! ```
//!
//! Index validity is not checked here. A binding to an input the gamepad does
//! not have samples as zero.

use std::fmt;

use super::error::ControlError;

/// Which half of an axis a binding reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    /// The whole axis, rescaled to 0..1
    Full,
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HatDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Parsed form of a joystick binding
///
/// Each variant only carries the directions valid for its input family, so a
/// button with a direction or an axis bound to "left" cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingDescriptor {
    Axis {
        index: usize,
        direction: AxisDirection,
    },
    Hat {
        index: usize,
        direction: HatDirection,
    },
    Button {
        index: usize,
    },
}

/// Renders the canonical binding string, e.g. `axis4+` or `hat0left`
impl fmt::Display for BindingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BindingDescriptor::Axis { index, direction } => {
                let suffix = match direction {
                    AxisDirection::Full => "",
                    AxisDirection::Positive => "+",
                    AxisDirection::Negative => "-",
                };
                write!(f, "axis{index}{suffix}")
            }
            BindingDescriptor::Hat { index, direction } => {
                let suffix = match direction {
                    HatDirection::Left => "left",
                    HatDirection::Right => "right",
                    HatDirection::Up => "up",
                    HatDirection::Down => "down",
                };
                write!(f, "hat{index}{suffix}")
            }
            BindingDescriptor::Button { index } => write!(f, "button{index}"),
        }
    }
}

const HAT_SUFFIXES: [(&str, HatDirection); 4] = [
    ("left", HatDirection::Left),
    ("right", HatDirection::Right),
    ("down", HatDirection::Down),
    ("up", HatDirection::Up),
];

/// Parses a binding string into a descriptor
///
/// `action` is only used for the error message, so a caller resolving several
/// bindings can report which one is malformed.
///
/// # Errors
///
/// [`ControlError::InvalidBinding`] if the text matches none of the accepted
/// shapes or its index is not a plain non-negative integer.
///
/// # Examples
///
/// ```rust,ignore
/// let grab = parse_binding("axis5", Some("Grab"))?;
/// assert_eq!(grab, BindingDescriptor::Axis { index: 5, direction: AxisDirection::Full });
/// ```
pub fn parse_binding(text: &str, action: Option<&str>) -> Result<BindingDescriptor, ControlError> {
    let invalid = || ControlError::InvalidBinding {
        action: action.map(str::to_owned),
    };
    let text = text.trim().to_ascii_lowercase();

    if let Some(rest) = text.strip_prefix("axis") {
        let (digits, direction) = if let Some(digits) = rest.strip_suffix('+') {
            (digits, AxisDirection::Positive)
        } else if let Some(digits) = rest.strip_suffix('-') {
            (digits, AxisDirection::Negative)
        } else {
            (rest, AxisDirection::Full)
        };
        let index = parse_index(digits).ok_or_else(invalid)?;
        return Ok(BindingDescriptor::Axis { index, direction });
    }

    if let Some(rest) = text.strip_prefix("hat") {
        for (suffix, direction) in HAT_SUFFIXES {
            if let Some(digits) = rest.strip_suffix(suffix) {
                let index = if digits.is_empty() {
                    0
                } else {
                    parse_index(digits).ok_or_else(invalid)?
                };
                return Ok(BindingDescriptor::Hat { index, direction });
            }
        }
        return Err(invalid());
    }

    if let Some(digits) = text.strip_prefix("button") {
        let index = parse_index(digits).ok_or_else(invalid)?;
        return Ok(BindingDescriptor::Button { index });
    }

    Err(invalid())
}

fn parse_index(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> BindingDescriptor {
        parse_binding(text, None).unwrap()
    }

    #[test]
    fn parses_common_bindings() {
        assert_eq!(
            parse("axis3+"),
            BindingDescriptor::Axis {
                index: 3,
                direction: AxisDirection::Positive
            }
        );
        assert_eq!(
            parse("axis5"),
            BindingDescriptor::Axis {
                index: 5,
                direction: AxisDirection::Full
            }
        );
        assert_eq!(
            parse("hat0left"),
            BindingDescriptor::Hat {
                index: 0,
                direction: HatDirection::Left
            }
        );
        assert_eq!(parse("button6"), BindingDescriptor::Button { index: 6 });
        assert_eq!(
            parse("hatup"),
            BindingDescriptor::Hat {
                index: 0,
                direction: HatDirection::Up
            }
        );
    }

    #[test]
    fn parses_negative_axis_and_remaining_hat_directions() {
        assert_eq!(
            parse("axis4-"),
            BindingDescriptor::Axis {
                index: 4,
                direction: AxisDirection::Negative
            }
        );
        assert_eq!(
            parse("hat1right"),
            BindingDescriptor::Hat {
                index: 1,
                direction: HatDirection::Right
            }
        );
        assert_eq!(
            parse("hat2down"),
            BindingDescriptor::Hat {
                index: 2,
                direction: HatDirection::Down
            }
        );
    }

    #[test]
    fn is_case_insensitive_and_ignores_surrounding_whitespace() {
        assert_eq!(parse("AXIS0-"), parse("axis0-"));
        assert_eq!(parse("Hat0Left"), parse("hat0left"));
        assert_eq!(parse("  Button12 "), BindingDescriptor::Button { index: 12 });
    }

    #[test]
    fn rejects_strings_outside_the_grammar() {
        for text in [
            "", "axis", "axis+", "axis-", "axisx", "axis1x", "axis-1", "axis1+-", "stick1",
            "hat", "hat0", "hat0middle", "hatxleft", "button", "buttonx", "button-2", "key5",
        ] {
            assert!(
                parse_binding(text, None).is_err(),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn error_names_the_action_when_given() {
        let err = parse_binding("axis", Some("Grab")).unwrap_err();
        assert_eq!(
            err,
            ControlError::InvalidBinding {
                action: Some("Grab".to_string())
            }
        );
        assert_eq!(err.to_string(), "Grab controller input invalid");

        let err = parse_binding("axis", None).unwrap_err();
        assert_eq!(err.to_string(), "Controller input invalid");
    }

    #[test]
    fn large_hat_index_is_left_to_the_sampler() {
        assert_eq!(
            parse("hat9left"),
            BindingDescriptor::Hat {
                index: 9,
                direction: HatDirection::Left
            }
        );
    }

    #[test]
    fn display_renders_canonical_form() {
        for text in ["axis3+", "axis4-", "axis5", "hat0left", "hat2up", "button6"] {
            assert_eq!(parse(text).to_string(), text);
        }
        assert_eq!(parse("HATDOWN").to_string(), "hat0down");
    }
}
