// Key names accepted by scenarios, and their mapping onto enigo keys.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ProbeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KeyInput {
    Char(char),
    Return,
    Escape,
    Tab,
    Space,
    Backspace,
    Left,
    Right,
    Up,
    Down,
}

impl KeyInput {
    pub fn to_enigo(self) -> enigo::Key {
        use enigo::Key;
        match self {
            KeyInput::Char(c) => Key::Unicode(c),
            KeyInput::Return => Key::Return,
            KeyInput::Escape => Key::Escape,
            KeyInput::Tab => Key::Tab,
            KeyInput::Space => Key::Space,
            KeyInput::Backspace => Key::Backspace,
            KeyInput::Left => Key::LeftArrow,
            KeyInput::Right => Key::RightArrow,
            KeyInput::Up => Key::UpArrow,
            KeyInput::Down => Key::DownArrow,
        }
    }
}

impl FromStr for KeyInput {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(KeyInput::Char(c));
        }
        match s.to_ascii_lowercase().as_str() {
            "return" | "enter" => Ok(KeyInput::Return),
            "escape" | "esc" => Ok(KeyInput::Escape),
            "tab" => Ok(KeyInput::Tab),
            "space" => Ok(KeyInput::Space),
            "backspace" => Ok(KeyInput::Backspace),
            "left" => Ok(KeyInput::Left),
            "right" => Ok(KeyInput::Right),
            "up" => Ok(KeyInput::Up),
            "down" => Ok(KeyInput::Down),
            _ => Err(ProbeError::Config(format!("unknown key '{s}'"))),
        }
    }
}

impl TryFrom<String> for KeyInput {
    type Error = ProbeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyInput> for String {
    fn from(key: KeyInput) -> Self {
        key.to_string()
    }
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyInput::Char(c) => write!(f, "{c}"),
            KeyInput::Return => f.write_str("return"),
            KeyInput::Escape => f.write_str("escape"),
            KeyInput::Tab => f.write_str("tab"),
            KeyInput::Space => f.write_str("space"),
            KeyInput::Backspace => f.write_str("backspace"),
            KeyInput::Left => f.write_str("left"),
            KeyInput::Right => f.write_str("right"),
            KeyInput::Up => f.write_str("up"),
            KeyInput::Down => f.write_str("down"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_characters_and_names() {
        assert_eq!("a".parse::<KeyInput>().unwrap(), KeyInput::Char('a'));
        assert_eq!("B".parse::<KeyInput>().unwrap(), KeyInput::Char('B'));
        assert_eq!("Enter".parse::<KeyInput>().unwrap(), KeyInput::Return);
        assert_eq!("esc".parse::<KeyInput>().unwrap(), KeyInput::Escape);
        assert!("hyper".parse::<KeyInput>().is_err());
        assert!("".parse::<KeyInput>().is_err());
    }

    #[test]
    fn display_parses_back() {
        for key in [KeyInput::Char('z'), KeyInput::Space, KeyInput::Down] {
            assert_eq!(key.to_string().parse::<KeyInput>().unwrap(), key);
        }
    }
}
