//! Keyboard shortcuts for the player bar

use serde::{Deserialize, Serialize};

/// Physical key, named after the DOM `KeyboardEvent.code` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCode {
    Space,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl KeyCode {
    /// Parse a `KeyboardEvent.code` string
    pub fn from_code(code: &str) -> Self {
        match code {
            "Space" => KeyCode::Space,
            "ArrowLeft" => KeyCode::ArrowLeft,
            "ArrowRight" => KeyCode::ArrowRight,
            _ => KeyCode::Other,
        }
    }
}

/// A key press as seen by the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyPress {
    pub code: Option<KeyCode>,
    pub ctrl: bool,
    pub meta: bool,
    /// Focus is in a text input or textarea
    pub in_text_field: bool,
}

impl KeyPress {
    /// Plain key press without modifiers
    pub fn key(code: KeyCode) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    /// Key press with Ctrl held
    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code: Some(code),
            ctrl: true,
            ..Self::default()
        }
    }
}

/// Transport action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shortcut {
    TogglePlayPause,
    Next,
    Previous,
}

impl Shortcut {
    /// Map a key press to a shortcut
    ///
    /// Space toggles playback; Ctrl/Cmd + arrows skip. Typing in a text
    /// field never triggers anything.
    pub fn from_key(press: &KeyPress) -> Option<Self> {
        if press.in_text_field {
            return None;
        }

        let modified = press.ctrl || press.meta;
        match press.code? {
            KeyCode::Space => Some(Shortcut::TogglePlayPause),
            KeyCode::ArrowRight if modified => Some(Shortcut::Next),
            KeyCode::ArrowLeft if modified => Some(Shortcut::Previous),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_toggles() {
        assert_eq!(
            Shortcut::from_key(&KeyPress::key(KeyCode::Space)),
            Some(Shortcut::TogglePlayPause)
        );
    }

    #[test]
    fn arrows_need_modifier() {
        assert_eq!(Shortcut::from_key(&KeyPress::key(KeyCode::ArrowRight)), None);
        assert_eq!(
            Shortcut::from_key(&KeyPress::ctrl(KeyCode::ArrowRight)),
            Some(Shortcut::Next)
        );

        let cmd_left = KeyPress {
            code: Some(KeyCode::ArrowLeft),
            meta: true,
            ..KeyPress::default()
        };
        assert_eq!(Shortcut::from_key(&cmd_left), Some(Shortcut::Previous));
    }

    #[test]
    fn text_fields_swallow_keys() {
        let press = KeyPress {
            in_text_field: true,
            ..KeyPress::key(KeyCode::Space)
        };
        assert_eq!(Shortcut::from_key(&press), None);
    }

    #[test]
    fn parses_dom_codes() {
        assert_eq!(KeyCode::from_code("Space"), KeyCode::Space);
        assert_eq!(KeyCode::from_code("ArrowLeft"), KeyCode::ArrowLeft);
        assert_eq!(KeyCode::from_code("KeyA"), KeyCode::Other);
    }
}
