//! Core Error Types

use otter_native::ErrorCode;
use thiserror::Error;

/// Errors from device and capture lifecycle operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid device index: {0}")]
    InvalidDeviceIndex(u32),

    #[error("no device is flagged as default")]
    NoDefaultDevice,

    #[error("no playback endpoint matches capture device '{0}'")]
    NoMatchingPlayback(String),

    #[error("native engine call failed: {0}")]
    Native(#[from] ErrorCode),
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidDeviceIndex(5);
        assert!(err.to_string().contains('5'));

        let err = CoreError::NoMatchingPlayback("Speakers (Loopback)".into());
        assert!(err.to_string().contains("Speakers"));
    }

    #[test]
    fn test_error_from_native() {
        let err: CoreError = ErrorCode::Busy.into();
        assert!(matches!(err, CoreError::Native(ErrorCode::Busy)));
    }
}
