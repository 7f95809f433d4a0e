//! LED unit selection and lighting patterns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{NIBBLE_MAX, parse_number};

/// One LED unit of the tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedColor {
    Red = 0,
    Yellow = 1,
    Green = 2,
    Blue = 3,
    White = 4,
}

impl LedColor {
    /// All colors, top of the tower first.
    pub const ALL: [Self; 5] = [Self::Red, Self::Yellow, Self::Green, Self::Blue, Self::White];

    /// Lowercase color name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::White => "white",
        }
    }
}

impl TryFrom<u8> for LedColor {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Red),
            1 => Ok(Self::Yellow),
            2 => Ok(Self::Green),
            3 => Ok(Self::Blue),
            4 => Ok(Self::White),
            _ => Err(Error::invalid("color", value, "out of range color")),
        }
    }
}

impl FromStr for LedColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(color) = Self::ALL.into_iter().find(|c| c.as_str().eq_ignore_ascii_case(s.trim())) {
            return Ok(color);
        }
        match parse_number(s) {
            Some(n) => Self::try_from(n),
            None => Err(Error::invalid("color", s, "expected red, yellow, green, blue, white or 0-4")),
        }
    }
}

impl fmt::Display for LedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lighting pattern of an LED unit.
///
/// The device treats every nibble value from 0x6 to 0xF as "keep the current
/// setting"; all of them decode to [`LedPattern::Keep`], which is always
/// encoded as 0xF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedPattern {
    Off,
    On,
    Pattern1,
    Pattern2,
    Pattern3,
    Pattern4,
    #[default]
    Keep,
}

impl LedPattern {
    /// Nibble emitted for [`LedPattern::Keep`].
    pub const KEEP_NIBBLE: u8 = 0x0F;

    /// Decode a 4-bit pattern code.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `value` does not fit in a nibble.
    pub fn from_nibble(value: u8) -> Result<Self> {
        match value {
            0x0 => Ok(Self::Off),
            0x1 => Ok(Self::On),
            0x2 => Ok(Self::Pattern1),
            0x3 => Ok(Self::Pattern2),
            0x4 => Ok(Self::Pattern3),
            0x5 => Ok(Self::Pattern4),
            0x6..=NIBBLE_MAX => Ok(Self::Keep),
            _ => Err(Error::invalid("led pattern", value, "must be 0x0-0xF")),
        }
    }

    /// Wire nibble for this pattern.
    #[must_use]
    pub const fn nibble(self) -> u8 {
        match self {
            Self::Off => 0x0,
            Self::On => 0x1,
            Self::Pattern1 => 0x2,
            Self::Pattern2 => 0x3,
            Self::Pattern3 => 0x4,
            Self::Pattern4 => 0x5,
            Self::Keep => Self::KEEP_NIBBLE,
        }
    }
}

impl TryFrom<u8> for LedPattern {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_nibble(value)
    }
}

impl FromStr for LedPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "on" => Ok(Self::On),
            "pattern1" => Ok(Self::Pattern1),
            "pattern2" => Ok(Self::Pattern2),
            "pattern3" => Ok(Self::Pattern3),
            "pattern4" => Ok(Self::Pattern4),
            "keep" => Ok(Self::Keep),
            other => match parse_number(other) {
                Some(n) => Self::from_nibble(n),
                None => Err(Error::invalid("led pattern", s, "expected off, on, pattern1-4, keep or 0x0-0xF")),
            },
        }
    }
}
