//! USB error types.

use thiserror::Error;

/// Error type for signal tower commands.
#[derive(Debug, Error)]
pub enum TowerError {
    #[error(transparent)]
    InvalidArgument(#[from] towerlight_core::Error),

    #[error("Short write: {written} of {expected} bytes")]
    ShortWrite { expected: usize, written: usize },

    #[error("Transfer failed: {0}")]
    TransferFailed(#[source] rusb::Error),

    #[error("Device not found")]
    DeviceNotFound,

    #[error("Permission denied - check udev rules")]
    PermissionDenied,

    #[error("Endpoint {0:#04x} not found in active configuration")]
    EndpointNotFound(u8),

    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),
}

impl TowerError {
    /// Classify an error raised while locating or opening a device.
    pub(crate) fn from_open(err: rusb::Error) -> Self {
        match err {
            rusb::Error::Access => Self::PermissionDenied,
            rusb::Error::NoDevice | rusb::Error::NotFound => Self::DeviceNotFound,
            other => Self::Usb(other),
        }
    }
}

/// Result type for signal tower operations.
pub type TowerResult<T> = Result<T, TowerError>;

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_open_error_classification() {
        assert_matches!(TowerError::from_open(rusb::Error::Access), TowerError::PermissionDenied);
        assert_matches!(TowerError::from_open(rusb::Error::NoDevice), TowerError::DeviceNotFound);
        assert_matches!(TowerError::from_open(rusb::Error::Busy), TowerError::Usb(rusb::Error::Busy));
    }

    #[test]
    fn test_short_write_message() {
        let err = TowerError::ShortWrite { expected: 8, written: 7 };
        assert_eq!(err.to_string(), "Short write: 7 of 8 bytes");
    }
}
