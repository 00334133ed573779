use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::intent::Intent;

/// Errors from key binding configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("unknown key {0:?}")]
    UnknownKey(String),
}

/// A physical key as seen by the bridge. Letters are stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Escape,
}

impl Key {
    pub fn char(c: char) -> Self {
        Self::Char(c.to_ascii_lowercase())
    }
}

impl FromStr for Key {
    type Err = BindingError;

    /// Accepts a single character, or a named key with or without angle
    /// brackets (`up`, `<esc>`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Key::char(c));
        }
        let name = s
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or(s);
        match name.to_ascii_lowercase().as_str() {
            "up" => Ok(Key::Up),
            "down" => Ok(Key::Down),
            "left" => Ok(Key::Left),
            "right" => Ok(Key::Right),
            "esc" | "escape" => Ok(Key::Escape),
            "space" => Ok(Key::Char(' ')),
            _ => Err(BindingError::UnknownKey(s.to_string())),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(' ') => f.write_str("<space>"),
            Key::Char(c) => write!(f, "{c}"),
            Key::Up => f.write_str("<up>"),
            Key::Down => f.write_str("<down>"),
            Key::Left => f.write_str("<left>"),
            Key::Right => f.write_str("<right>"),
            Key::Escape => f.write_str("<esc>"),
        }
    }
}

/// Split a typed line into keys.
///
/// Whitespace separates tokens. A token of the form `<name>` is one named
/// key; any other token is read character by character, so `ppa` is three
/// keys and a bare `<` is the `<` key.
pub fn keys_in(line: &str) -> Vec<Key> {
    let mut keys = Vec::new();
    for token in line.split_whitespace() {
        if token.len() > 2 && token.starts_with('<') && token.ends_with('>') {
            match token.parse() {
                Ok(key) => keys.push(key),
                Err(_) => tracing::debug!(token, "ignoring unknown named key"),
            }
            continue;
        }
        keys.extend(token.chars().map(Key::char));
    }
    keys
}

/// Key → intent table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    map: BTreeMap<Key, Intent>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let table = [
            (Key::Char('p'), Intent::StepForward),
            (Key::Char('l'), Intent::StepBackward),
            (Key::Char('z'), Intent::StrafeLeft),
            (Key::Char('x'), Intent::StrafeRight),
            (Key::Char('u'), Intent::MoveUp),
            (Key::Char('n'), Intent::MoveDown),
            (Key::Char('a'), Intent::TurnLeft),
            (Key::Char('s'), Intent::TurnRight),
            (Key::Char('e'), Intent::LookUp),
            (Key::Char('d'), Intent::LookDown),
            (Key::Char('r'), Intent::ResetPose),
            (Key::Char('f'), Intent::FlyMode),
            (Key::Char('w'), Intent::WalkMode),
            (Key::Char('v'), Intent::ViewMode),
            (Key::Char('+'), Intent::FasterSteps),
            (Key::Char('-'), Intent::SlowerSteps),
            (Key::Char('<'), Intent::WiderTurns),
            (Key::Char('>'), Intent::NarrowerTurns),
            (Key::Char('?'), Intent::PrintLocation),
            (Key::Char('h'), Intent::Help),
            (Key::Char('q'), Intent::Exit),
            (Key::Escape, Intent::Exit),
            (Key::Up, Intent::StepForward),
            (Key::Down, Intent::StepBackward),
            (Key::Left, Intent::StrafeLeft),
            (Key::Right, Intent::StrafeRight),
        ];
        Self {
            map: table.into_iter().collect(),
        }
    }
}

impl KeyBindings {
    /// Default table with `overrides` (key name → intent) applied on top.
    pub fn with_overrides(overrides: &BTreeMap<String, Intent>) -> Result<Self, BindingError> {
        let mut bindings = Self::default();
        for (name, intent) in overrides {
            let key: Key = name.parse()?;
            tracing::debug!(%key, ?intent, "key binding override");
            bindings.map.insert(key, *intent);
        }
        Ok(bindings)
    }

    pub fn intent_for(&self, key: Key) -> Option<Intent> {
        let key = match key {
            Key::Char(c) => Key::char(c),
            other => other,
        };
        self.map.get(&key).copied()
    }

    pub fn keys_for(&self, intent: Intent) -> Vec<Key> {
        self.map
            .iter()
            .filter(|(_, i)| **i == intent)
            .map(|(k, _)| *k)
            .collect()
    }

    /// Intents for every bound key in `line`, in typing order.
    pub fn translate(&self, line: &str) -> Vec<Intent> {
        keys_in(line)
            .into_iter()
            .filter_map(|key| {
                let intent = self.intent_for(key);
                if intent.is_none() {
                    tracing::debug!(%key, "unbound key");
                }
                intent
            })
            .collect()
    }

    /// One line per bound intent listing its keys.
    pub fn help(&self) -> String {
        let mut out = String::new();
        for intent in Intent::ALL {
            let keys = self.keys_for(intent);
            if keys.is_empty() {
                continue;
            }
            let keys: Vec<String> = keys.iter().map(Key::to_string).collect();
            out.push_str(&format!("  {:<12} {}\n", keys.join(" "), intent.describe()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keys() {
        assert_eq!("P".parse::<Key>().unwrap(), Key::Char('p'));
        assert_eq!("up".parse::<Key>().unwrap(), Key::Up);
        assert_eq!("<ESC>".parse::<Key>().unwrap(), Key::Escape);
        assert_eq!("<".parse::<Key>().unwrap(), Key::Char('<'));
        assert!(matches!(
            "pageup".parse::<Key>(),
            Err(BindingError::UnknownKey(_))
        ));
    }

    #[test]
    fn display_round_trips() {
        for key in [Key::Up, Key::Escape, Key::Char('q'), Key::Char(' ')] {
            assert_eq!(key.to_string().parse::<Key>().unwrap(), key);
        }
    }

    #[test]
    fn default_table_covers_required_intents() {
        let b = KeyBindings::default();
        assert_eq!(b.intent_for(Key::Escape), Some(Intent::Exit));
        assert_eq!(b.intent_for(Key::Up), Some(Intent::StepForward));
        assert_eq!(b.intent_for(Key::Down), Some(Intent::StepBackward));
        assert_eq!(b.intent_for(Key::Left), Some(Intent::StrafeLeft));
        assert_eq!(b.intent_for(Key::Right), Some(Intent::StrafeRight));
        assert_eq!(b.intent_for(Key::Char('e')), Some(Intent::LookUp));
        assert_eq!(b.intent_for(Key::Char('d')), Some(Intent::LookDown));
        assert_eq!(b.intent_for(Key::Char('r')), Some(Intent::ResetPose));
        assert_eq!(b.intent_for(Key::Char('a')), Some(Intent::TurnLeft));
        assert_eq!(b.intent_for(Key::Char('s')), Some(Intent::TurnRight));
        assert_eq!(b.intent_for(Key::Char('v')), Some(Intent::ViewMode));
    }

    #[test]
    fn letters_are_case_insensitive() {
        let b = KeyBindings::default();
        assert_eq!(b.intent_for(Key::Char('P')), Some(Intent::StepForward));
        assert_eq!(b.intent_for(Key::Char('Q')), Some(Intent::Exit));
    }

    #[test]
    fn keys_in_splits_tokens() {
        assert_eq!(
            keys_in("pp <up> < q"),
            vec![
                Key::Char('p'),
                Key::Char('p'),
                Key::Up,
                Key::Char('<'),
                Key::Char('q')
            ]
        );
        assert_eq!(keys_in("<bogus> a"), vec![Key::Char('a')]);
        assert!(keys_in("   ").is_empty());
    }

    #[test]
    fn translate_skips_unbound_keys() {
        let b = KeyBindings::default();
        assert_eq!(
            b.translate("p 9 a <esc>"),
            vec![Intent::StepForward, Intent::TurnLeft, Intent::Exit]
        );
    }

    #[test]
    fn overrides_replace_defaults() {
        let mut overrides = BTreeMap::new();
        overrides.insert("k".to_string(), Intent::StepForward);
        overrides.insert("<left>".to_string(), Intent::TurnLeft);
        let b = KeyBindings::with_overrides(&overrides).unwrap();
        assert_eq!(b.intent_for(Key::Char('k')), Some(Intent::StepForward));
        assert_eq!(b.intent_for(Key::Left), Some(Intent::TurnLeft));
        assert_eq!(b.intent_for(Key::Char('p')), Some(Intent::StepForward));
    }

    #[test]
    fn overrides_reject_unknown_keys() {
        let mut overrides = BTreeMap::new();
        overrides.insert("f13".to_string(), Intent::Exit);
        assert_eq!(
            KeyBindings::with_overrides(&overrides),
            Err(BindingError::UnknownKey("f13".into()))
        );
    }

    #[test]
    fn help_lists_bound_intents() {
        let help = KeyBindings::default().help();
        assert!(help.contains("step forward"));
        assert!(help.contains("<esc>"));
        assert_eq!(help.lines().count(), Intent::ALL.len());
    }
}
