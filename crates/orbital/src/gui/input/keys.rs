use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display as StrumDisplay, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum Key {
    #[strum(to_string = "ArrowLeft", serialize = "Left")]
    ArrowLeft,
    #[strum(to_string = "ArrowRight", serialize = "Right")]
    ArrowRight,
    #[strum(to_string = "ArrowUp", serialize = "Up")]
    ArrowUp,
    #[strum(to_string = "ArrowDown", serialize = "Down")]
    ArrowDown,
    #[strum(to_string = "Space", serialize = " ")]
    Space,
    #[strum(to_string = "Enter", serialize = "Return")]
    Enter,
    #[strum(to_string = "Escape", serialize = "Esc")]
    Escape,
    #[strum(to_string = "Backspace")]
    Backspace,
    #[strum(to_string = "PageUp")]
    PageUp,
    #[strum(to_string = "PageDown")]
    PageDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Next,
    Previous,
    Overview,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyBindings {
    pub next: Vec<Key>,
    pub previous: Vec<Key>,
    pub overview: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            next: vec![Key::ArrowRight, Key::Space],
            previous: vec![Key::ArrowLeft],
            overview: vec![Key::Escape],
        }
    }
}

impl KeyBindings {
    pub fn action(&self, key: Key) -> Option<KeyAction> {
        if self.next.contains(&key) {
            Some(KeyAction::Next)
        } else if self.previous.contains(&key) {
            Some(KeyAction::Previous)
        } else if self.overview.contains(&key) {
            Some(KeyAction::Overview)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_deserialization() {
        let cases = vec![
            ("\"ArrowRight\"", Key::ArrowRight),
            ("\"arrowright\"", Key::ArrowRight),
            ("\"right\"", Key::ArrowRight),
            ("\" \"", Key::Space),
            ("\"SPACE\"", Key::Space),
            ("\"esc\"", Key::Escape),
            ("\"Escape\"", Key::Escape),
        ];

        for (json, expected) in cases {
            let deserialized: Key = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert!(serde_json::from_str::<Key>("\"F13\"").is_err());
    }

    #[test]
    fn test_default_bindings() {
        let keys = KeyBindings::default();
        assert_eq!(keys.action(Key::ArrowRight), Some(KeyAction::Next));
        assert_eq!(keys.action(Key::Space), Some(KeyAction::Next));
        assert_eq!(keys.action(Key::ArrowLeft), Some(KeyAction::Previous));
        assert_eq!(keys.action(Key::Escape), Some(KeyAction::Overview));
        assert_eq!(keys.action(Key::Enter), None);
    }
}
