//! The five tower commands.

use tracing::{debug, warn};

use towerlight_core::{
    BuzzerPattern, BuzzerPitch, BuzzerRepeat, CommandKind, CommandPacket, LedColor, LedPattern,
    encode_buzzer, encode_buzzer_with_pitch, encode_reset, encode_single_color, encode_tower,
};

use crate::error::TowerResult;
use crate::transport::{CommandEndpoint, Transport, TransportSettings};

/// Command facade over a borrowed device endpoint.
///
/// Each call encodes one packet and performs exactly one write and one
/// device reset. Calls are blocking and independent; there is no retry.
pub struct SignalTower<'a, E: CommandEndpoint + ?Sized> {
    transport: Transport<'a, E>,
}

impl<'a, E: CommandEndpoint + ?Sized> SignalTower<'a, E> {
    #[must_use]
    pub fn new(endpoint: &'a mut E, settings: TransportSettings) -> Self {
        Self { transport: Transport::new(endpoint, settings) }
    }

    /// Set one LED unit. The buzzer and the other LED units keep their state.
    ///
    /// # Errors
    /// Returns `ShortWrite` or `TransferFailed` if the send fails.
    pub fn set_light(&mut self, color: LedColor, pattern: LedPattern) -> TowerResult<()> {
        self.dispatch(CommandKind::Light, encode_single_color(color, pattern))
    }

    /// Set one LED unit from raw codes.
    ///
    /// # Errors
    /// Returns `InvalidArgument` without touching the device if `color` is
    /// not 0-4 or `pattern` does not fit in a nibble.
    pub fn set_light_raw(&mut self, color: u8, pattern: u8) -> TowerResult<()> {
        let color = LedColor::try_from(color).inspect_err(|e| warn!(error = %e, "Rejected light command"))?;
        let pattern =
            LedPattern::from_nibble(pattern).inspect_err(|e| warn!(error = %e, "Rejected light command"))?;
        self.set_light(color, pattern)
    }

    /// Set every LED unit. The buzzer keeps its state.
    ///
    /// # Errors
    /// Returns `ShortWrite` or `TransferFailed` if the send fails.
    pub fn set_tower(
        &mut self,
        red: LedPattern,
        yellow: LedPattern,
        green: LedPattern,
        blue: LedPattern,
        white: LedPattern,
    ) -> TowerResult<()> {
        self.dispatch(CommandKind::Tower, encode_tower(red, yellow, green, blue, white))
    }

    /// Sound the buzzer at the default pitches. The LED units keep their state.
    ///
    /// # Errors
    /// Returns `ShortWrite` or `TransferFailed` if the send fails.
    pub fn set_buzzer(&mut self, pattern: BuzzerPattern, repeat: BuzzerRepeat) -> TowerResult<()> {
        self.dispatch(CommandKind::Buzzer, encode_buzzer(pattern, repeat))
    }

    /// Sound the buzzer with explicit pitches for notes A and B.
    ///
    /// # Errors
    /// Returns `ShortWrite` or `TransferFailed` if the send fails.
    pub fn set_buzzer_with_pitch(
        &mut self,
        pattern: BuzzerPattern,
        repeat: BuzzerRepeat,
        pitch_a: BuzzerPitch,
        pitch_b: BuzzerPitch,
    ) -> TowerResult<()> {
        self.dispatch(
            CommandKind::BuzzerWithPitch,
            encode_buzzer_with_pitch(pattern, repeat, pitch_a, pitch_b),
        )
    }

    /// Turn off every LED unit and stop the buzzer.
    ///
    /// # Errors
    /// Returns `ShortWrite` or `TransferFailed` if the send fails.
    pub fn reset_all(&mut self) -> TowerResult<()> {
        self.dispatch(CommandKind::Reset, encode_reset())
    }

    fn dispatch(&mut self, kind: CommandKind, packet: CommandPacket) -> TowerResult<()> {
        debug!(command = %kind, packet = %packet, "Sending command");
        self.transport
            .send(&packet)
            .inspect_err(|e| warn!(command = %kind, error = %e, "failed to send data"))
    }
}
