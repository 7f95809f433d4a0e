//! Towerlight Core - data model and command encoding for USB signal towers.
//!
//! A signal tower is driven by fixed 8-byte command packets. Every field in
//! the payload is a 4-bit nibble, and most commands only touch a subset of
//! them: the remaining nibbles carry a "keep" sentinel so the device leaves
//! that LED or the buzzer in its current state.
//!
//! This crate performs no I/O. See `towerlight-usb` for the transport.

pub mod buzzer;
pub mod error;
pub mod led;
pub mod packet;

pub use buzzer::{BuzzerPattern, BuzzerPitch, BuzzerRepeat};
pub use error::{Error, Result};
pub use led::{LedColor, LedPattern};
pub use packet::{
    COMMAND_ID, COMMAND_VERSION, CommandKind, CommandPacket, PACKET_LEN, encode_buzzer,
    encode_buzzer_with_pitch, encode_reset, encode_single_color, encode_tower,
};

/// Largest value a 4-bit field can carry.
pub const NIBBLE_MAX: u8 = 0x0F;

/// Parse a numeric CLI/config value, accepting decimal or `0x`-prefixed hex.
pub(crate) fn parse_number(s: &str) -> Option<u8> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}
