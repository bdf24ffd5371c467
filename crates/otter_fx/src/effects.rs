//! Typed Effect Wrappers
//!
//! Thin property-style surfaces over [`FxBinding`]. Accessors read and write
//! the local block only; call `apply()` to make a batch of changes audible.

use std::sync::Arc;

use otter_native::{ChannelHandle, ChorusParams, NativeEngine, ReverbParams};

use crate::binding::FxBinding;
use crate::error::FxResult;

/// Freeverb-style reverb on one channel.
pub struct Reverb {
    fx: FxBinding<ReverbParams>,
}

impl Reverb {
    pub fn new(
        engine: Arc<dyn NativeEngine>,
        channel: ChannelHandle,
        priority: i32,
    ) -> FxResult<Self> {
        Ok(Self {
            fx: FxBinding::new(engine, channel, priority)?,
        })
    }

    /// Dry (unaffected) signal mix (0.0...1.0, default 0.0).
    pub fn dry_mix(&self) -> f32 {
        self.fx.params().dry_mix
    }

    pub fn set_dry_mix(&mut self, value: f32) {
        self.fx.params_mut().dry_mix = value;
    }

    /// Wet (affected) signal mix (0.0...3.0, default 1.0).
    pub fn wet_mix(&self) -> f32 {
        self.fx.params().wet_mix
    }

    pub fn set_wet_mix(&mut self, value: f32) {
        self.fx.params_mut().wet_mix = value;
    }

    /// Room size (0.0...1.0, default 0.5).
    pub fn room_size(&self) -> f32 {
        self.fx.params().room_size
    }

    pub fn set_room_size(&mut self, value: f32) {
        self.fx.params_mut().room_size = value;
    }

    /// Damping factor (0.0...1.0, default 0.5).
    pub fn damp(&self) -> f32 {
        self.fx.params().damp
    }

    pub fn set_damp(&mut self, value: f32) {
        self.fx.params_mut().damp = value;
    }

    /// Stereo width (0.0...1.0, default 1.0).
    pub fn width(&self) -> f32 {
        self.fx.params().width
    }

    pub fn set_width(&mut self, value: f32) {
        self.fx.params_mut().width = value;
    }

    pub fn apply(&self) -> FxResult<()> {
        self.fx.apply()
    }

    pub fn refresh(&mut self) -> FxResult<()> {
        self.fx.refresh()
    }

    pub fn dispose(&mut self) {
        self.fx.dispose()
    }

    pub fn params(&self) -> &ReverbParams {
        self.fx.params()
    }

    pub fn params_mut(&mut self) -> &mut ReverbParams {
        self.fx.params_mut()
    }
}

/// Chorus/flanger on one channel.
pub struct Chorus {
    fx: FxBinding<ChorusParams>,
}

impl Chorus {
    pub fn new(
        engine: Arc<dyn NativeEngine>,
        channel: ChannelHandle,
        priority: i32,
    ) -> FxResult<Self> {
        Ok(Self {
            fx: FxBinding::new(engine, channel, priority)?,
        })
    }

    /// Dry (unaffected) signal mix (-2.0...+2.0, default 0.9).
    pub fn dry_mix(&self) -> f32 {
        self.fx.params().dry_mix
    }

    pub fn set_dry_mix(&mut self, value: f32) {
        self.fx.params_mut().dry_mix = value;
    }

    /// Wet (affected) signal mix (-2.0...+2.0, default 0.35).
    pub fn wet_mix(&self) -> f32 {
        self.fx.params().wet_mix
    }

    pub fn set_wet_mix(&mut self, value: f32) {
        self.fx.params_mut().wet_mix = value;
    }

    /// Feedback (-1.0...+1.0, default 0.5).
    pub fn feedback(&self) -> f32 {
        self.fx.params().feedback
    }

    pub fn set_feedback(&mut self, value: f32) {
        self.fx.params_mut().feedback = value;
    }

    /// Minimum sweep delay in ms (default 1.0).
    pub fn min_sweep(&self) -> f32 {
        self.fx.params().min_sweep
    }

    pub fn set_min_sweep(&mut self, value: f32) {
        self.fx.params_mut().min_sweep = value;
    }

    /// Maximum sweep delay in ms (default 400.0).
    pub fn max_sweep(&self) -> f32 {
        self.fx.params().max_sweep
    }

    pub fn set_max_sweep(&mut self, value: f32) {
        self.fx.params_mut().max_sweep = value;
    }

    /// Rate of delay change in ms/s (default 200.0).
    pub fn rate(&self) -> f32 {
        self.fx.params().rate
    }

    pub fn set_rate(&mut self, value: f32) {
        self.fx.params_mut().rate = value;
    }

    pub fn apply(&self) -> FxResult<()> {
        self.fx.apply()
    }

    pub fn refresh(&mut self) -> FxResult<()> {
        self.fx.refresh()
    }

    pub fn dispose(&mut self) {
        self.fx.dispose()
    }

    pub fn params(&self) -> &ChorusParams {
        self.fx.params()
    }

    pub fn params_mut(&mut self) -> &mut ChorusParams {
        self.fx.params_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otter_native::MockEngine;

    #[test]
    fn test_chorus_scenario_round_trip() {
        let engine = Arc::new(MockEngine::new());
        let channel = engine.add_channel();
        let mut chorus = Chorus::new(engine, channel, 0).unwrap();

        chorus.set_dry_mix(0.9);
        chorus.set_wet_mix(0.35);
        chorus.set_feedback(0.5);
        chorus.apply().unwrap();

        chorus.refresh().unwrap();
        assert!((chorus.dry_mix() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_reverb_setters_are_local() {
        let engine = Arc::new(MockEngine::new());
        let channel = engine.add_channel();
        let mut reverb = Reverb::new(engine, channel, 0).unwrap();

        reverb.set_room_size(0.8);
        reverb.set_damp(0.2);
        assert_eq!(reverb.room_size(), 0.8);
        assert_eq!(reverb.damp(), 0.2);

        // Nothing pushed yet: refresh restores engine defaults.
        reverb.refresh().unwrap();
        assert_eq!(reverb.room_size(), 0.5);
        assert_eq!(reverb.damp(), 0.5);
    }

    #[test]
    fn test_reverb_defaults() {
        let engine = Arc::new(MockEngine::new());
        let channel = engine.add_channel();
        let reverb = Reverb::new(engine, channel, 1).unwrap();

        assert_eq!(reverb.dry_mix(), 0.0);
        assert_eq!(reverb.wet_mix(), 1.0);
        assert_eq!(reverb.width(), 1.0);
    }
}
