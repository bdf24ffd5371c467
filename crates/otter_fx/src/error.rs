//! Effect Binding Error Types

use otter_native::ErrorCode;
use thiserror::Error;

/// Errors from effect creation and parameter synchronization.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FxError {
    #[error("engine rejected the effect: {0}")]
    CreationFailed(ErrorCode),

    #[error("failed to push parameters: {0}")]
    ApplyFailed(ErrorCode),

    #[error("failed to pull parameters: {0}")]
    RefreshFailed(ErrorCode),

    #[error("band index {0} was never added")]
    InvalidBandIndex(u32),

    #[error("effect has been disposed")]
    Disposed,
}

/// Result type alias for effect binding operations.
pub type FxResult<T> = Result<T, FxError>;
