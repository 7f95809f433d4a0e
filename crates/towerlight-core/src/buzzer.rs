//! Buzzer patterns, repeat counts and pitches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{NIBBLE_MAX, parse_number};

/// Buzzing pattern.
///
/// Like LED patterns, nibble values 0x6 to 0xF all mean "keep".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuzzerPattern {
    Off,
    /// Continuous tone.
    On,
    Pattern1,
    Pattern2,
    Pattern3,
    Pattern4,
    #[default]
    Keep,
}

impl BuzzerPattern {
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
            _ => Err(Error::invalid("buzzer pattern", value, "must be 0x0-0xF")),
        }
    }

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

impl TryFrom<u8> for BuzzerPattern {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_nibble(value)
    }
}

impl FromStr for BuzzerPattern {
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
                None => Err(Error::invalid(
                    "buzzer pattern",
                    s,
                    "expected off, on, pattern1-4, keep or 0x0-0xF",
                )),
            },
        }
    }
}

/// Number of times the buzzer pattern plays.
///
/// Zero means continuous operation until the next command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BuzzerRepeat(u8);

impl BuzzerRepeat {
    pub const CONTINUOUS: Self = Self(0);
    pub const MAX: u8 = NIBBLE_MAX;

    /// # Errors
    /// Returns `InvalidArgument` for counts above 15.
    pub fn new(count: u8) -> Result<Self> {
        if count > Self::MAX {
            return Err(Error::invalid("buzzer repeat", count, "must be 0 (continuous) or 1-15"));
        }
        Ok(Self(count))
    }

    #[must_use]
    pub const fn count(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_continuous(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for BuzzerRepeat {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<BuzzerRepeat> for u8 {
    fn from(repeat: BuzzerRepeat) -> Self {
        repeat.0
    }
}

impl FromStr for BuzzerRepeat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continuous" => Ok(Self::CONTINUOUS),
            other => match parse_number(other) {
                Some(n) => Self::new(n),
                None => Err(Error::invalid("buzzer repeat", s, "expected continuous or 0-15")),
            },
        }
    }
}

/// Buzzer pitch for one of the two note slots.
///
/// Slot A and slot B alternate while the buzzer sounds. The two sentinel
/// values select the device defaults: D7 for slot A, silence for slot B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuzzerPitch {
    Off = 0x0,
    A6 = 0x1,
    Bb6 = 0x2,
    B6 = 0x3,
    C7 = 0x4,
    Db7 = 0x5,
    D7 = 0x6,
    Eb7 = 0x7,
    E7 = 0x8,
    F7 = 0x9,
    Gb7 = 0xA,
    G7 = 0xB,
    Ab7 = 0xC,
    A7 = 0xD,
    DefaultA = 0xE,
    DefaultB = 0xF,
}

impl BuzzerPitch {
    const ALL: [Self; 16] = [
        Self::Off,
        Self::A6,
        Self::Bb6,
        Self::B6,
        Self::C7,
        Self::Db7,
        Self::D7,
        Self::Eb7,
        Self::E7,
        Self::F7,
        Self::Gb7,
        Self::G7,
        Self::Ab7,
        Self::A7,
        Self::DefaultA,
        Self::DefaultB,
    ];

    /// # Errors
    /// Returns `InvalidArgument` if `value` does not fit in a nibble.
    pub fn from_nibble(value: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| Error::invalid("buzzer pitch", value, "must be 0x0-0xF"))
    }

    #[must_use]
    pub const fn nibble(self) -> u8 {
        self as u8
    }

    /// Name as accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::A6 => "a6",
            Self::Bb6 => "bb6",
            Self::B6 => "b6",
            Self::C7 => "c7",
            Self::Db7 => "db7",
            Self::D7 => "d7",
            Self::Eb7 => "eb7",
            Self::E7 => "e7",
            Self::F7 => "f7",
            Self::Gb7 => "gb7",
            Self::G7 => "g7",
            Self::Ab7 => "ab7",
            Self::A7 => "a7",
            Self::DefaultA => "default-a",
            Self::DefaultB => "default-b",
        }
    }
}

impl TryFrom<u8> for BuzzerPitch {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_nibble(value)
    }
}

impl FromStr for BuzzerPitch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        if let Some(pitch) = Self::ALL.into_iter().find(|p| p.as_str().eq_ignore_ascii_case(needle)) {
            return Ok(pitch);
        }
        match parse_number(needle) {
            Some(n) => Self::from_nibble(n),
            None => Err(Error::invalid("buzzer pitch", s, "expected a note (a6-a7), off, default-a, default-b or 0x0-0xF")),
        }
    }
}

impl fmt::Display for BuzzerPitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
