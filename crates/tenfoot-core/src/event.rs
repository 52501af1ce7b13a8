#![forbid(unsafe_code)]

//! Remote-control key codes and the key-down event payload.
//!
//! The default table follows browser `KeyboardEvent.keyCode` values, which is
//! also what most TV platforms report for their D-pad. Platforms with other
//! codes inject their own [`KeyMap`] instead of patching globals.

/// Default key codes for the D-pad and the confirm key.
pub mod key_code {
    /// LEFT ARROW
    pub const LEFT: u32 = 37;
    /// UP ARROW
    pub const UP: u32 = 38;
    /// RIGHT ARROW
    pub const RIGHT: u32 = 39;
    /// DOWN ARROW
    pub const DOWN: u32 = 40;
    /// ENTER
    pub const ENTER: u32 = 13;
}

/// A navigation intent decoded from a raw key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    /// Confirm / OK button.
    Enter,
}

impl NavKey {
    /// All navigation keys.
    pub const ALL: [NavKey; 5] = [
        NavKey::Up,
        NavKey::Down,
        NavKey::Left,
        NavKey::Right,
        NavKey::Enter,
    ];

    /// Human-readable label used in input diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            NavKey::Up => "KEY.UP",
            NavKey::Down => "KEY.DOWN",
            NavKey::Left => "KEY.LEFT",
            NavKey::Right => "KEY.RIGHT",
            NavKey::Enter => "KEY.ENTER",
        }
    }
}

/// Mapping from raw key codes to [`NavKey`] intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyMap {
    pub up: u32,
    pub down: u32,
    pub left: u32,
    pub right: u32,
    pub enter: u32,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            up: key_code::UP,
            down: key_code::DOWN,
            left: key_code::LEFT,
            right: key_code::RIGHT,
            enter: key_code::ENTER,
        }
    }
}

impl KeyMap {
    /// Decode a raw key code. Unknown codes yield `None`.
    #[must_use]
    pub fn decode(&self, code: u32) -> Option<NavKey> {
        if code == self.up {
            Some(NavKey::Up)
        } else if code == self.down {
            Some(NavKey::Down)
        } else if code == self.right {
            Some(NavKey::Right)
        } else if code == self.left {
            Some(NavKey::Left)
        } else if code == self.enter {
            Some(NavKey::Enter)
        } else {
            None
        }
    }

    /// Raw key code bound to `key`.
    #[must_use]
    pub fn code(&self, key: NavKey) -> u32 {
        match key {
            NavKey::Up => self.up,
            NavKey::Down => self.down,
            NavKey::Left => self.left,
            NavKey::Right => self.right,
            NavKey::Enter => self.enter,
        }
    }

    /// Diagnostic label for a raw key code (`NOT.DEFINED` for unknown codes).
    #[must_use]
    pub fn label(&self, code: u32) -> &'static str {
        self.decode(code).map_or("NOT.DEFINED", NavKey::label)
    }
}

/// Arguments of a key-down event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyDown {
    pub key_code: u32,
}

impl KeyDown {
    #[must_use]
    pub const fn new(key_code: u32) -> Self {
        Self { key_code }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_uses_dom_codes() {
        let map = KeyMap::default();
        assert_eq!(map.decode(37), Some(NavKey::Left));
        assert_eq!(map.decode(38), Some(NavKey::Up));
        assert_eq!(map.decode(39), Some(NavKey::Right));
        assert_eq!(map.decode(40), Some(NavKey::Down));
        assert_eq!(map.decode(13), Some(NavKey::Enter));
    }

    #[test]
    fn unknown_codes_are_ignored() {
        let map = KeyMap::default();
        assert_eq!(map.decode(0), None);
        assert_eq!(map.decode(27), None);
        assert_eq!(map.label(27), "NOT.DEFINED");
    }

    #[test]
    fn code_and_decode_agree() {
        let map = KeyMap::default();
        for key in NavKey::ALL {
            assert_eq!(map.decode(map.code(key)), Some(key));
        }
    }

    #[test]
    fn custom_map_overrides_defaults() {
        let map = KeyMap {
            enter: 29443,
            ..KeyMap::default()
        };
        assert_eq!(map.decode(29443), Some(NavKey::Enter));
        assert_eq!(map.decode(13), None);
        assert_eq!(map.label(29443), "KEY.ENTER");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn key_map_serde_shape() {
        let json = serde_json::to_string(&KeyMap::default()).unwrap();
        assert_eq!(json, r#"{"up":38,"down":40,"left":37,"right":39,"enter":13}"#);
    }
}
