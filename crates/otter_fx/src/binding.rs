//! Effect Binding - The Apply/Refresh Protocol
//!
//! An `FxBinding` pairs one native effect instance with one pinned parameter
//! block. Synchronization is deliberately narrow:
//! - [`FxBinding::apply`] is the only operation that mutates engine-side
//!   state from the local block.
//! - [`FxBinding::refresh`] is the only operation that overwrites the local
//!   block from engine-side state.
//! - [`FxBinding::params_mut`] is a pure local write; callers batch field
//!   mutations and `apply()` once, matching the engine's one-shot
//!   "set all fields" semantics (there is no native field-level setter).

use std::sync::Arc;

use tracing::{debug, warn};

use otter_native::{ChannelHandle, EffectParameters, FxHandle, NativeEngine};

use crate::error::{FxError, FxResult};
use crate::pinned::PinnedBlock;

/// One native effect instance with its pinned parameter block.
pub struct FxBinding<P: EffectParameters> {
    engine: Arc<dyn NativeEngine>,
    channel: ChannelHandle,
    priority: i32,
    /// `None` after disposal; guards the pinned address against stale use.
    handle: Option<FxHandle>,
    block: PinnedBlock<P>,
}

impl<P: EffectParameters> FxBinding<P> {
    /// Register a new effect of `P::KIND` on `channel` and allocate its
    /// parameter block. Priority ties are broken by the engine's own
    /// insertion order.
    pub fn new(
        engine: Arc<dyn NativeEngine>,
        channel: ChannelHandle,
        priority: i32,
    ) -> FxResult<Self> {
        let handle = engine
            .channel_set_fx(channel, P::KIND, priority)
            .map_err(FxError::CreationFailed)?;
        debug!(?channel, ?handle, kind = ?P::KIND, priority, "effect created");

        Ok(Self {
            engine,
            channel,
            priority,
            handle: Some(handle),
            block: PinnedBlock::new(),
        })
    }

    /// Push the full local block to the engine in one synchronous call.
    /// The change is immediately audible; nothing is buffered or batched.
    pub fn apply(&self) -> FxResult<()> {
        let handle = self.handle.ok_or(FxError::Disposed)?;
        self.engine
            .fx_set_parameters(handle, self.block.as_ptr(), self.block.len())
            .map_err(FxError::ApplyFailed)
    }

    /// Pull the engine's current state into the local block, overwriting
    /// every local value. Use before partial updates and after any external
    /// mutation of the same effect.
    pub fn refresh(&mut self) -> FxResult<()> {
        let handle = self.handle.ok_or(FxError::Disposed)?;
        self.engine
            .fx_get_parameters(handle, self.block.as_mut_ptr(), self.block.len())
            .map_err(FxError::RefreshFailed)
    }

    /// Local read access to the block.
    pub fn params(&self) -> &P {
        self.block.get()
    }

    /// Local write access to the block. Does not call `apply()`.
    pub fn params_mut(&mut self) -> &mut P {
        self.block.get_mut()
    }

    /// The channel this effect is attached to.
    pub fn channel(&self) -> ChannelHandle {
        self.channel
    }

    /// The priority this effect was registered with.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn is_disposed(&self) -> bool {
        self.handle.is_none()
    }

    /// Remove the native effect instance and invalidate the binding.
    /// Disposing twice is a no-op.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(code) = self.engine.channel_remove_fx(handle) {
                warn!(?handle, %code, "failed to remove effect");
            } else {
                debug!(?handle, "effect disposed");
            }
        }
    }
}

impl<P: EffectParameters> std::fmt::Debug for FxBinding<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FxBinding")
            .field("channel", &self.channel)
            .field("priority", &self.priority)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl<P: EffectParameters> Drop for FxBinding<P> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otter_native::{ChorusParams, ErrorCode, MockEngine, ReverbParams};

    fn engine_with_channel() -> (Arc<MockEngine>, ChannelHandle) {
        let engine = Arc::new(MockEngine::new());
        let channel = engine.add_channel();
        (engine, channel)
    }

    #[test]
    fn test_create_on_invalid_channel_fails() {
        let engine = Arc::new(MockEngine::new());
        let err = FxBinding::<ReverbParams>::new(engine, ChannelHandle(42), 0).unwrap_err();
        assert_eq!(err, FxError::CreationFailed(ErrorCode::Handle));
    }

    #[test]
    fn test_apply_refresh_round_trip() {
        let (engine, channel) = engine_with_channel();
        let mut fx = FxBinding::<ChorusParams>::new(engine, channel, 0).unwrap();

        // Batch local mutations, then a single push.
        {
            let params = fx.params_mut();
            params.dry_mix = 0.9;
            params.wet_mix = 0.35;
            params.feedback = 0.5;
        }
        fx.apply().unwrap();

        // Clobber local state, pull it back.
        fx.params_mut().dry_mix = 0.0;
        fx.refresh().unwrap();

        assert!((fx.params().dry_mix - 0.9).abs() < 1e-6);
        assert!((fx.params().wet_mix - 0.35).abs() < 1e-6);
        assert!((fx.params().feedback - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_apply_fails_after_channel_freed() {
        let (engine, channel) = engine_with_channel();
        let fx = FxBinding::<ReverbParams>::new(Arc::clone(&engine) as _, channel, 0).unwrap();

        engine.free_channel(channel);
        assert_eq!(fx.apply().unwrap_err(), FxError::ApplyFailed(ErrorCode::Handle));
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let (engine, channel) = engine_with_channel();
        let mut fx = FxBinding::<ReverbParams>::new(engine, channel, 0).unwrap();

        fx.dispose();
        fx.dispose();
        assert!(fx.is_disposed());

        assert_eq!(fx.apply().unwrap_err(), FxError::Disposed);
        assert_eq!(fx.refresh().unwrap_err(), FxError::Disposed);
    }

    #[test]
    fn test_drop_removes_native_effect() {
        let (engine, channel) = engine_with_channel();
        let fx = FxBinding::<ReverbParams>::new(Arc::clone(&engine) as _, channel, 0).unwrap();
        let handle = fx.handle.unwrap();
        assert!(engine.fx_exists(handle));

        drop(fx);
        assert!(!engine.fx_exists(handle));
    }

    #[test]
    fn test_local_writes_do_not_touch_engine() {
        let (engine, channel) = engine_with_channel();
        let mut fx = FxBinding::<ReverbParams>::new(engine, channel, 0).unwrap();

        fx.params_mut().dry_mix = 0.7;
        // Without apply(), refresh() still sees the engine defaults.
        fx.refresh().unwrap();
        assert_eq!(fx.params().dry_mix, 0.0);
    }
}
