//! Native Error Codes
//!
//! The engine reports failures through a thread-local "last error" slot that
//! is overwritten by every subsequent call. Implementations of
//! [`NativeEngine`](crate::NativeEngine) capture the code together with the
//! failing call and return it as a structured [`ErrorCode`], so upper layers
//! never touch the raw accessor.

use thiserror::Error;

/// Error codes reported by the native engine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    #[error("memory error")]
    Memory,

    #[error("invalid handle")]
    Handle,

    #[error("device has not been initialized")]
    Init,

    #[error("could not start the device")]
    Start,

    #[error("already initialized or started")]
    Already,

    #[error("invalid parameter")]
    Parameter,

    #[error("invalid device")]
    Device,

    #[error("action is not available")]
    NotAvailable,

    #[error("the device is busy")]
    Busy,

    #[error("unknown native error code {0}")]
    Unknown(i32),
}

impl ErrorCode {
    /// Map a raw native error code to a structured variant.
    pub fn from_raw(code: i32) -> Self {
        match code {
            1 => ErrorCode::Memory,
            5 => ErrorCode::Handle,
            8 => ErrorCode::Init,
            9 => ErrorCode::Start,
            14 => ErrorCode::Already,
            20 => ErrorCode::Parameter,
            23 => ErrorCode::Device,
            37 => ErrorCode::NotAvailable,
            46 => ErrorCode::Busy,
            other => ErrorCode::Unknown(other),
        }
    }

    /// The raw native code for this variant.
    pub fn to_raw(self) -> i32 {
        match self {
            ErrorCode::Memory => 1,
            ErrorCode::Handle => 5,
            ErrorCode::Init => 8,
            ErrorCode::Start => 9,
            ErrorCode::Already => 14,
            ErrorCode::Parameter => 20,
            ErrorCode::Device => 23,
            ErrorCode::NotAvailable => 37,
            ErrorCode::Busy => 46,
            ErrorCode::Unknown(code) => code,
        }
    }
}

/// Result type alias for native engine calls.
pub type NativeResult<T> = Result<T, ErrorCode>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ErrorCode::Handle;
        assert!(err.to_string().contains("handle"));

        let err = ErrorCode::Unknown(99);
        assert!(err.to_string().contains("99"));
    }

    #[test]
    fn test_raw_round_trip() {
        for code in [
            ErrorCode::Memory,
            ErrorCode::Handle,
            ErrorCode::Init,
            ErrorCode::Start,
            ErrorCode::Already,
            ErrorCode::Parameter,
            ErrorCode::Device,
            ErrorCode::NotAvailable,
            ErrorCode::Busy,
            ErrorCode::Unknown(1234),
        ] {
            assert_eq!(ErrorCode::from_raw(code.to_raw()), code);
        }
    }

    #[test]
    fn test_unmapped_raw_is_unknown() {
        assert_eq!(ErrorCode::from_raw(7777), ErrorCode::Unknown(7777));
    }
}
