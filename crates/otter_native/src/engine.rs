//! The Native Engine Boundary
//!
//! Defines the interface the rest of the workspace consumes from the native
//! audio engine. Real deployments implement [`NativeEngine`] over the
//! engine's C API; tests use the in-memory [`MockEngine`](crate::MockEngine).
//!
//! Every method returns a [`NativeResult`]: implementations must fetch the
//! engine's thread-local "last error" code immediately after a failing call,
//! before issuing any other native call, and hand it back as the `Err`
//! variant. The raw error accessor is never exposed above this trait.

use serde::{Deserialize, Serialize};

use crate::error::NativeResult;
use crate::params::EffectKind;

/// Handle to a native audio channel (a stream being processed or played).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelHandle(pub u32);

/// Handle to a native effect instance attached to a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FxHandle(pub u32);

/// Whether an endpoint records audio or plays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceKind {
    Input,
    Output,
}

/// Capability descriptor for one audio endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Human-readable device name.
    pub name: String,

    /// Endpoint identity string, stable across enumerations.
    pub id: String,

    /// Driver identity. For a loopback capture endpoint this carries the id
    /// of the playback endpoint it mirrors.
    pub driver: String,

    /// Whether this endpoint records or plays.
    pub kind: DeviceKind,

    /// Whether this is the system default endpoint of its kind.
    pub is_default: bool,

    /// Whether the endpoint is currently usable.
    pub is_enabled: bool,

    /// Mix sample rate in Hz.
    pub sample_rate: u32,

    /// Mix channel count.
    pub channels: u16,
}

/// Callback invoked by the engine's processing thread when captured data is
/// available. Arguments are the raw buffer address and its length in bytes;
/// the buffer is only valid for the duration of the call.
pub type CaptureCallback = Box<dyn Fn(*const u8, usize) + Send + Sync>;

/// The native engine's control surface.
///
/// Channel/stream creation, playback transport and codec support live
/// entirely inside the engine and are out of scope here; this trait covers
/// only what the binding layer needs: effect parameter pushes/pulls, device
/// lifecycle, capture delivery and the silent keep-alive transport.
pub trait NativeEngine: Send + Sync {
    // --- effects ---

    /// Register a new effect of `kind` on `channel` with the given priority.
    /// Ties between equal priorities are broken by the engine's own insertion
    /// order.
    fn channel_set_fx(
        &self,
        channel: ChannelHandle,
        kind: EffectKind,
        priority: i32,
    ) -> NativeResult<FxHandle>;

    /// Remove an effect instance from its channel.
    fn channel_remove_fx(&self, fx: FxHandle) -> NativeResult<()>;

    /// Push a full parameter block to the engine.
    ///
    /// `params` must point to `len` readable bytes laid out for the effect's
    /// kind, and must remain valid at the same address for the effect's
    /// lifetime (the engine may retain it).
    fn fx_set_parameters(&self, fx: FxHandle, params: *const u8, len: usize) -> NativeResult<()>;

    /// Pull the engine's current parameter state into the block at `params`.
    /// For banded effects the engine reads the selector field from the block
    /// first, then fills the indexed payload fields.
    fn fx_get_parameters(&self, fx: FxHandle, params: *mut u8, len: usize) -> NativeResult<()>;

    // --- devices ---

    /// Query the capability descriptor for a device index. Fails for indices
    /// past the end of the device list; enumeration probes until that
    /// failure.
    fn device_info(&self, index: u32) -> NativeResult<DeviceInfo>;

    /// Initialize a device for use. Makes it the current device on success.
    fn device_init(&self, index: u32) -> NativeResult<()>;

    /// Free the *current* device's native resources.
    fn device_free(&self) -> NativeResult<()>;

    /// The current-device context used by context-sensitive calls.
    fn current_device(&self) -> NativeResult<u32>;

    /// Switch the current-device context. Does not initialize the device.
    fn set_current_device(&self, index: u32) -> NativeResult<()>;

    // --- capture ---

    /// Start capturing from an initialized device. `callback` is invoked on
    /// the engine's processing thread for every chunk of captured data.
    fn record_start(&self, index: u32, callback: CaptureCallback) -> NativeResult<()>;

    /// Stop capturing from a device.
    fn record_stop(&self, index: u32) -> NativeResult<()>;

    // --- keep-alive playback ---

    /// Start rendering silence to an output device, keeping it active so its
    /// output can be loopback-captured.
    fn playback_start(&self, index: u32) -> NativeResult<()>;

    /// Stop the silence stream on an output device.
    fn playback_stop(&self, index: u32) -> NativeResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_info_serialization() {
        let info = DeviceInfo {
            name: "Speakers (Loopback)".to_string(),
            id: "loopback-0".to_string(),
            driver: "speakers-0".to_string(),
            kind: DeviceKind::Input,
            is_default: true,
            is_enabled: true,
            sample_rate: 48000,
            channels: 2,
        };

        let json = serde_json::to_string(&info).unwrap();
        let deserialized: DeviceInfo = serde_json::from_str(&json).unwrap();

        assert_eq!(info.name, deserialized.name);
        assert_eq!(info.driver, deserialized.driver);
        assert_eq!(info.kind, deserialized.kind);
    }

    #[test]
    fn test_handles_are_comparable() {
        assert_eq!(ChannelHandle(3), ChannelHandle(3));
        assert_ne!(FxHandle(1), FxHandle(2));
    }
}
