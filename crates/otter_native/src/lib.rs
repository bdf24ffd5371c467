//! Otter Native - The Engine Boundary
//!
//! This crate is the seam between the workspace and the native real-time
//! audio engine. It provides:
//! - Opaque channel/effect handle types
//! - The [`NativeEngine`] trait consumed by `otter_fx` and `otter_core`
//! - `#[repr(C)]` effect parameter layouts matching the engine's structs
//! - The native error-code enumeration, captured per call so the engine's
//!   thread-local "last error" slot never leaks upward
//! - An in-memory [`MockEngine`] (feature `mock`) for downstream tests
//!
//! # Architecture
//!
//! ```text
//! otter_fx / otter_core
//!         │  NativeEngine trait (structured NativeResult per call)
//!         ▼
//! ┌──────────────────────────────────────────────┐
//! │ native engine (black box)                    │
//! │  channels · effects · devices · capture      │
//! │  thread-local last-error slot (never leaks)  │
//! └──────────────────────────────────────────────┘
//! ```

mod engine;
mod error;
mod params;

#[cfg(any(test, feature = "mock"))]
mod mock;

pub use engine::{
    CaptureCallback, ChannelHandle, DeviceInfo, DeviceKind, FxHandle, NativeEngine,
};
pub use error::{ErrorCode, NativeResult};
pub use params::{
    ChorusParams, EffectKind, EffectParameters, PeakEqParams, ReverbParams, CHANNEL_ALL,
};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockEngine;
