//! Single-command transport with unconditional link reset.

use std::time::Duration;

use tracing::{debug, warn};

use towerlight_core::{CommandPacket, PACKET_LEN};

use crate::device::{ENDPOINT_ADDRESS, SEND_TIMEOUT};
use crate::error::{TowerError, TowerResult};

/// The two device operations the transport needs.
///
/// Implemented by [`crate::TowerDevice`] for real hardware.
#[cfg_attr(test, mockall::automock)]
pub trait CommandEndpoint {
    /// Write `data` to the host-to-device endpoint at `address`, returning the
    /// byte count reported by the host stack.
    ///
    /// # Errors
    /// Returns the underlying USB error, including `Timeout`.
    fn write(&mut self, address: u8, data: &[u8], timeout: Duration) -> rusb::Result<usize>;

    /// Reset the USB link.
    ///
    /// # Errors
    /// Returns the underlying USB error.
    fn reset(&mut self) -> rusb::Result<()>;
}

/// Adjustment applied to the byte count reported by a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteCountCorrection {
    /// The reported count is the number of payload bytes.
    Exact,
    /// The host stack reports one byte more than the payload.
    ReportsOneExtra,
}

impl WriteCountCorrection {
    /// Correction for the platform this binary was built for.
    ///
    /// The Windows USB stack counts one extra byte on these transfers.
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(windows) { Self::ReportsOneExtra } else { Self::Exact }
    }

    #[must_use]
    pub const fn apply(self, reported: usize) -> usize {
        match self {
            Self::Exact => reported,
            Self::ReportsOneExtra => reported.saturating_sub(1),
        }
    }
}

impl Default for WriteCountCorrection {
    fn default() -> Self {
        Self::host()
    }
}

/// Where and how commands are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportSettings {
    /// Host-to-device endpoint address
    pub endpoint: u8,
    /// Bound on each write
    pub timeout: Duration,
    /// Byte count correction
    pub correction: WriteCountCorrection,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            endpoint: ENDPOINT_ADDRESS,
            timeout: SEND_TIMEOUT,
            correction: WriteCountCorrection::host(),
        }
    }
}

/// Resets the endpoint when dropped, so every exit path from a send
/// (including an unwinding panic) leaves the link reset.
struct ResetGuard<'a, E: CommandEndpoint + ?Sized> {
    endpoint: &'a mut E,
}

impl<E: CommandEndpoint + ?Sized> ResetGuard<'_, E> {
    fn endpoint(&mut self) -> &mut E {
        &mut *self.endpoint
    }
}

impl<E: CommandEndpoint + ?Sized> Drop for ResetGuard<'_, E> {
    fn drop(&mut self) {
        match self.endpoint.reset() {
            Ok(()) => debug!("Device reset"),
            Err(e) => warn!(error = %e, "Device reset failed"),
        }
    }
}

/// Delivers command packets over a borrowed endpoint.
pub struct Transport<'a, E: CommandEndpoint + ?Sized> {
    endpoint: &'a mut E,
    settings: TransportSettings,
}

impl<'a, E: CommandEndpoint + ?Sized> Transport<'a, E> {
    #[must_use]
    pub fn new(endpoint: &'a mut E, settings: TransportSettings) -> Self {
        Self { endpoint, settings }
    }

    /// Write one packet, then reset the device.
    ///
    /// The reset runs whether the write succeeds, comes up short, or fails.
    /// A failing reset is logged and does not change the returned result.
    ///
    /// # Errors
    /// - `TransferFailed` if the write errors or times out.
    /// - `ShortWrite` if the corrected byte count differs from the packet length.
    pub fn send(&mut self, packet: &CommandPacket) -> TowerResult<()> {
        let TransportSettings { endpoint, timeout, correction } = self.settings;
        let mut link = ResetGuard { endpoint: &mut *self.endpoint };

        let reported = link
            .endpoint()
            .write(endpoint, packet.as_bytes(), timeout)
            .map_err(TowerError::TransferFailed)?;

        let written = correction.apply(reported);
        debug!(endpoint, reported, written, "Packet written");

        if written != PACKET_LEN {
            return Err(TowerError::ShortWrite { expected: PACKET_LEN, written });
        }
        Ok(())
    }
}
