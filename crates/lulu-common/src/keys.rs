//! Logical input keys.
//!
//! Discriminants match the raylib key codes the desktop front end reports,
//! so a driver can forward raw codes through [`Key::from_code`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};

/// A key the simulation reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum Key {
    /// Action key (attack)
    Space = 32,
    /// Move left
    A = 65,
    /// Move right
    D = 68,
    /// Move down
    S = 83,
    /// Move up
    W = 87,
    /// Confirm
    Enter = 257,
    /// Arrow right
    Right = 262,
    /// Arrow left
    Left = 263,
    /// Arrow down
    Down = 264,
    /// Arrow up
    Up = 265,
}

impl Key {
    /// All known keys.
    pub const ALL: [Self; 10] = [
        Self::Space,
        Self::A,
        Self::D,
        Self::S,
        Self::W,
        Self::Enter,
        Self::Right,
        Self::Left,
        Self::Down,
        Self::Up,
    ];

    /// Returns the raw key code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Looks a key up by its raw code.
    pub fn from_code(code: i32) -> CommonResult<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.code() == code)
            .ok_or(CommonError::UnknownKeyCode(code))
    }

    /// Lowercase display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Space => "space",
            Self::A => "a",
            Self::D => "d",
            Self::S => "s",
            Self::W => "w",
            Self::Enter => "enter",
            Self::Right => "right",
            Self::Left => "left",
            Self::Down => "down",
            Self::Up => "up",
        }
    }
}

impl FromStr for Key {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.name() == lowered)
            .ok_or_else(|| CommonError::UnknownKey(s.to_string()))
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
