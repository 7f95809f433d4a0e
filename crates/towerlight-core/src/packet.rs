//! Command packet layout and encoders.
//!
//! Every command is the same 8-byte frame:
//!
//! | Offset | Field          | Contents              |
//! |--------|----------------|-----------------------|
//! | 0      | version        | `0x00`                |
//! | 1      | command id     | `0x00`                |
//! | 2      | buzzer control | `repeat << 4 \| pattern` |
//! | 3      | buzzer pitch   | `pitch_a << 4 \| pitch_b` |
//! | 4      | red / yellow   | `red << 4 \| yellow`    |
//! | 5      | green / blue   | `green << 4 \| blue`    |
//! | 6      | white          | `white << 4`          |
//! | 7      | padding        | `0x00`                |
//!
//! The encoders differ only in which payload bytes carry caller data and
//! which carry the keep sentinel, so they all go through [`Payload`].

use std::fmt;

use serde::Serialize;

use crate::buzzer::{BuzzerPattern, BuzzerPitch, BuzzerRepeat};
use crate::led::{LedColor, LedPattern};

/// Length of every command packet.
pub const PACKET_LEN: usize = 8;
/// Protocol version byte.
pub const COMMAND_VERSION: u8 = 0x00;
/// Command identifier byte.
pub const COMMAND_ID: u8 = 0x00;

const KEEP: u8 = LedPattern::KEEP_NIBBLE;

/// Which high-level command a packet was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    Light,
    Tower,
    Buzzer,
    BuzzerWithPitch,
    Reset,
}

impl CommandKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Tower => "tower",
            Self::Buzzer => "buzzer",
            Self::BuzzerWithPitch => "buzzer-with-pitch",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An encoded 8-byte command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CommandPacket([u8; PACKET_LEN]);

impl CommandPacket {
    const BUZZER_CONTROL: usize = 2;
    const BUZZER_PITCH: usize = 3;
    const LED_RED_YELLOW: usize = 4;
    const LED_GREEN_BLUE: usize = 5;
    const LED_WHITE: usize = 6;

    /// Raw wire bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PACKET_LEN] {
        &self.0
    }

    #[must_use]
    pub const fn into_bytes(self) -> [u8; PACKET_LEN] {
        self.0
    }

    #[must_use]
    pub const fn buzzer_control(&self) -> u8 {
        self.0[Self::BUZZER_CONTROL]
    }

    #[must_use]
    pub const fn buzzer_pitch(&self) -> u8 {
        self.0[Self::BUZZER_PITCH]
    }

    /// Buzzer pattern nibble (low half of the control byte).
    #[must_use]
    pub const fn buzzer_pattern_nibble(&self) -> u8 {
        low(self.buzzer_control())
    }

    /// Repeat count nibble (high half of the control byte).
    #[must_use]
    pub const fn buzzer_repeat_nibble(&self) -> u8 {
        high(self.buzzer_control())
    }

    #[must_use]
    pub const fn pitch_a_nibble(&self) -> u8 {
        high(self.buzzer_pitch())
    }

    #[must_use]
    pub const fn pitch_b_nibble(&self) -> u8 {
        low(self.buzzer_pitch())
    }

    /// Pattern nibble currently encoded for `color`.
    #[must_use]
    pub const fn led_nibble(&self, color: LedColor) -> u8 {
        match color {
            LedColor::Red => high(self.0[Self::LED_RED_YELLOW]),
            LedColor::Yellow => low(self.0[Self::LED_RED_YELLOW]),
            LedColor::Green => high(self.0[Self::LED_GREEN_BLUE]),
            LedColor::Blue => low(self.0[Self::LED_GREEN_BLUE]),
            LedColor::White => high(self.0[Self::LED_WHITE]),
        }
    }
}

impl AsRef<[u8]> for CommandPacket {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for CommandPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

const fn pack(high: u8, low: u8) -> u8 {
    (high << 4) | (low & 0x0F)
}

const fn high(byte: u8) -> u8 {
    byte >> 4
}

const fn low(byte: u8) -> u8 {
    byte & 0x0F
}

/// The five variable bytes of a packet.
#[derive(Debug, Clone, Copy)]
struct Payload {
    buzzer_control: u8,
    buzzer_pitch: u8,
    led_red_yellow: u8,
    led_green_blue: u8,
    led_white: u8,
}

impl Payload {
    /// Buzzer untouched. Pitch is ignored by the device when the pattern is keep.
    const BUZZER_KEEP: (u8, u8) = (pack(0, BuzzerPattern::KEEP_NIBBLE), 0x00);

    /// Every field keeps its current device state.
    const KEEP_ALL: Self = Self {
        buzzer_control: Self::BUZZER_KEEP.0,
        buzzer_pitch: Self::BUZZER_KEEP.1,
        led_red_yellow: pack(KEEP, KEEP),
        led_green_blue: pack(KEEP, KEEP),
        led_white: pack(KEEP, 0),
    };

    /// Every field forced off.
    const ALL_OFF: Self = Self {
        buzzer_control: pack(0, BuzzerPattern::Off.nibble()),
        buzzer_pitch: pack(BuzzerPitch::Off.nibble(), BuzzerPitch::Off.nibble()),
        led_red_yellow: pack(LedPattern::Off.nibble(), LedPattern::Off.nibble()),
        led_green_blue: pack(LedPattern::Off.nibble(), LedPattern::Off.nibble()),
        led_white: pack(LedPattern::Off.nibble(), 0),
    };

    fn with_buzzer(self, pattern: BuzzerPattern, repeat: BuzzerRepeat, a: BuzzerPitch, b: BuzzerPitch) -> Self {
        Self {
            buzzer_control: pack(repeat.count(), pattern.nibble()),
            buzzer_pitch: pack(a.nibble(), b.nibble()),
            ..self
        }
    }

    fn into_packet(self) -> CommandPacket {
        CommandPacket([
            COMMAND_VERSION,
            COMMAND_ID,
            self.buzzer_control,
            self.buzzer_pitch,
            self.led_red_yellow,
            self.led_green_blue,
            self.led_white,
            0x00,
        ])
    }
}

/// Set one LED unit; every other LED and the buzzer keep their state.
#[must_use]
pub fn encode_single_color(color: LedColor, pattern: LedPattern) -> CommandPacket {
    let p = pattern.nibble();
    let mut payload = Payload::KEEP_ALL;
    match color {
        LedColor::Red => payload.led_red_yellow = pack(p, KEEP),
        LedColor::Yellow => payload.led_red_yellow = pack(KEEP, p),
        LedColor::Green => payload.led_green_blue = pack(p, KEEP),
        LedColor::Blue => payload.led_green_blue = pack(KEEP, p),
        LedColor::White => payload.led_white = pack(p, 0),
    }
    payload.into_packet()
}

/// Set all five LED units at once; the buzzer keeps its state.
#[must_use]
pub fn encode_tower(
    red: LedPattern,
    yellow: LedPattern,
    green: LedPattern,
    blue: LedPattern,
    white: LedPattern,
) -> CommandPacket {
    Payload {
        led_red_yellow: pack(red.nibble(), yellow.nibble()),
        led_green_blue: pack(green.nibble(), blue.nibble()),
        led_white: pack(white.nibble(), 0),
        ..Payload::KEEP_ALL
    }
    .into_packet()
}

/// Sound the buzzer with the device's default pitches; LEDs keep their state.
#[must_use]
pub fn encode_buzzer(pattern: BuzzerPattern, repeat: BuzzerRepeat) -> CommandPacket {
    encode_buzzer_with_pitch(pattern, repeat, BuzzerPitch::DefaultA, BuzzerPitch::DefaultB)
}

/// Sound the buzzer with explicit pitches for both note slots.
#[must_use]
pub fn encode_buzzer_with_pitch(
    pattern: BuzzerPattern,
    repeat: BuzzerRepeat,
    pitch_a: BuzzerPitch,
    pitch_b: BuzzerPitch,
) -> CommandPacket {
    Payload::KEEP_ALL.with_buzzer(pattern, repeat, pitch_a, pitch_b).into_packet()
}

/// Turn every LED off and stop the buzzer.
#[must_use]
pub fn encode_reset() -> CommandPacket {
    Payload::ALL_OFF.into_packet()
}
