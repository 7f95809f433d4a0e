//! Error types for Towerlight core.

use thiserror::Error;

/// Core error type for field validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid argument: {field} = {value} ({reason})")]
    InvalidArgument { field: &'static str, value: String, reason: &'static str },
}

impl Error {
    pub(crate) fn invalid(field: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self::InvalidArgument { field, value: value.to_string(), reason }
    }
}

/// Result type alias for Towerlight core operations.
pub type Result<T> = std::result::Result<T, Error>;
