use std::{collections::HashMap, fmt::Debug};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};

use crate::trace_dbg;

/// Maps key sequences such as `<Ctrl-c>` or `<g><g>` to a value (usually an action)
#[derive(Clone, Debug, Deref, DerefMut)]
pub struct KeyBindings<T: PartialEq + DeserializeOwned + Debug>(pub HashMap<Vec<KeyEvent>, T>);

impl<T: PartialEq + DeserializeOwned + Debug> Default for KeyBindings<T> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<'de, T: PartialEq + DeserializeOwned + Debug> Deserialize<'de> for KeyBindings<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<String, T>::deserialize(deserializer)?;

        let keybindings = parsed_map
            .into_iter()
            .map(|(keyseq, action)| {
                Self::parse_key_sequence(&keyseq)
                    .map(|seq| (seq, action))
                    .map_err(serde::de::Error::custom)
            })
            .collect::<Result<HashMap<Vec<KeyEvent>, T>, D::Error>>()?;

        Ok(KeyBindings(trace_dbg!(keybindings)))
    }
}

impl<T: PartialEq + DeserializeOwned + Debug> KeyBindings<T> {
    /// Adds every binding from `other` whose key sequence is not bound yet
    pub fn merge_missing(&mut self, other: &KeyBindings<T>)
    where
        T: Clone,
    {
        for (keys, action) in other.iter() {
            self.entry(keys.clone()).or_insert_with(|| action.clone());
        }
    }

    fn parse_key_code(raw: &str, modifiers: KeyModifiers) -> Result<KeyCode, String> {
        let code = match raw {
            "esc" => KeyCode::Esc,
            "enter" => KeyCode::Enter,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "backspace" => KeyCode::Backspace,
            "delete" => KeyCode::Delete,
            "space" => KeyCode::Char(' '),
            "minus" | "hyphen" => KeyCode::Char('-'),
            f if f.len() > 1 && f.starts_with('f') => match f[1..].parse::<u8>() {
                Ok(n @ 1..=12) => KeyCode::F(n),
                _ => return Err(format!("Unable to parse {raw}")),
            },
            c if c.chars().count() == 1 => {
                let Some(mut c) = c.chars().next() else {
                    return Err(format!("Unable to parse {raw}"));
                };
                if modifiers.contains(KeyModifiers::SHIFT) {
                    c = c.to_ascii_uppercase();
                }
                KeyCode::Char(c)
            }
            _ => return Err(format!("Unable to parse {raw}")),
        };
        Ok(code)
    }

    /// Parses a single key such as `ctrl-alt-a` (case insensitive)
    pub fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
        let lower = raw.to_ascii_lowercase();
        let mut modifiers = KeyModifiers::empty();
        let mut rest = lower.as_str();
        loop {
            if let Some(r) = rest.strip_prefix("ctrl-") {
                modifiers.insert(KeyModifiers::CONTROL);
                rest = r;
            } else if let Some(r) = rest.strip_prefix("alt-") {
                modifiers.insert(KeyModifiers::ALT);
                rest = r;
            } else if let Some(r) = rest.strip_prefix("shift-") {
                modifiers.insert(KeyModifiers::SHIFT);
                rest = r;
            } else {
                break;
            }
        }
        let code = Self::parse_key_code(rest, modifiers)?;
        if code == KeyCode::BackTab {
            modifiers.insert(KeyModifiers::SHIFT);
        }
        Ok(KeyEvent::new(code, modifiers))
    }

    /// Parses `<a><ctrl-b>` into two key events
    pub fn parse_key_sequence(raw: &str) -> Result<Vec<KeyEvent>, String> {
        let Some(inner) = raw.strip_prefix('<').and_then(|r| r.strip_suffix('>')) else {
            return Err(format!("Unable to parse `{}`", raw));
        };
        inner.split("><").map(Self::parse_key_event).collect()
    }
}
