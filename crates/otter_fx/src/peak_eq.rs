//! Banded Peaking Equalizer
//!
//! The engine exposes all EQ bands through a single parameter block with a
//! mutable selector field: the selector must be written immediately before
//! every native get or set of the per-band payload (center frequency, gain).
//! Interleaving two bands' read/modify/write sequences without that
//! discipline corrupts which band is updated, so `PeakEq` hides the selector
//! entirely: each public operation performs its whole
//! select → sync → mutate → apply sequence under one `&mut self` borrow.
//!
//! Bands are append-only and identified by a zero-based, monotonically
//! assigned index; there is no deletion primitive.

use std::sync::Arc;

use tracing::debug;

use otter_native::{ChannelHandle, NativeEngine, PeakEqParams};

use crate::binding::FxBinding;
use crate::error::{FxError, FxResult};

/// Peaking EQ with indexed band access.
pub struct PeakEq {
    fx: FxBinding<PeakEqParams>,
    /// Number of bands appended so far; valid indices are `0..bands`.
    bands: u32,
}

impl PeakEq {
    /// Register a peaking EQ on `channel`. The block starts with the default
    /// bandwidth (2.5 octaves), Q of 0 and selector -1; bands are added with
    /// [`PeakEq::add_band`].
    pub fn new(
        engine: Arc<dyn NativeEngine>,
        channel: ChannelHandle,
        priority: i32,
    ) -> FxResult<Self> {
        Ok(Self {
            fx: FxBinding::new(engine, channel, priority)?,
            bands: 0,
        })
    }

    /// Append a new band at `center_frequency` Hz with zero gain and push it
    /// to the engine. Returns the band's index (0, 1, 2, ... in call order).
    ///
    /// On failure the band's fields in the local block are unspecified; the
    /// band is not counted and the next successful call reuses its index.
    pub fn add_band(&mut self, center_frequency: f32) -> FxResult<u32> {
        let index = self.bands;
        {
            let params = self.fx.params_mut();
            params.band = index as i32;
            params.center = center_frequency;
            params.gain = 0.0;
        }
        self.fx.apply()?;

        self.bands += 1;
        debug!(band = index, center_frequency, "band added");
        Ok(index)
    }

    /// Set the gain of band `index`, preserving every other field.
    ///
    /// The engine's block is shared across all bands, so the local copy may
    /// be stale for fields other than gain; the band's current state is
    /// pulled before the gain is overwritten and pushed back.
    pub fn update_band(&mut self, index: u32, gain: f32) -> FxResult<()> {
        self.select(index)?;
        self.fx.refresh()?;
        self.fx.params_mut().gain = gain;
        self.fx.apply()
    }

    /// Read the current gain of band `index` from the engine.
    pub fn band_gain(&mut self, index: u32) -> FxResult<f32> {
        self.select(index)?;
        self.fx.refresh()?;
        Ok(self.fx.params().gain)
    }

    /// Read the center frequency of band `index` from the engine.
    pub fn band_center(&mut self, index: u32) -> FxResult<f32> {
        self.select(index)?;
        self.fx.refresh()?;
        Ok(self.fx.params().center)
    }

    /// Number of bands added so far.
    pub fn band_count(&self) -> u32 {
        self.bands
    }

    pub fn dispose(&mut self) {
        self.fx.dispose()
    }

    /// Validate the index against the appended count and write the selector.
    /// The engine's behavior for a never-added index is unspecified, so it is
    /// rejected here before any native call.
    fn select(&mut self, index: u32) -> FxResult<()> {
        if index >= self.bands {
            return Err(FxError::InvalidBandIndex(index));
        }
        self.fx.params_mut().band = index as i32;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otter_native::MockEngine;

    fn peak_eq() -> (Arc<MockEngine>, PeakEq) {
        let engine = Arc::new(MockEngine::new());
        let channel = engine.add_channel();
        let eq = PeakEq::new(Arc::clone(&engine) as _, channel, 0).unwrap();
        (engine, eq)
    }

    #[test]
    fn test_band_indices_assigned_in_call_order() {
        let (_engine, mut eq) = peak_eq();
        assert_eq!(eq.add_band(1000.0).unwrap(), 0);
        assert_eq!(eq.add_band(5000.0).unwrap(), 1);
        assert_eq!(eq.add_band(250.0).unwrap(), 2);
        assert_eq!(eq.band_count(), 3);
    }

    #[test]
    fn test_update_band_changes_only_that_band() {
        let (_engine, mut eq) = peak_eq();
        eq.add_band(1000.0).unwrap();
        eq.add_band(5000.0).unwrap();

        eq.update_band(0, -3.0).unwrap();

        assert!((eq.band_gain(0).unwrap() + 3.0).abs() < 1e-6);
        assert_eq!(eq.band_gain(1).unwrap(), 0.0);
        assert_eq!(eq.band_center(0).unwrap(), 1000.0);
        assert_eq!(eq.band_center(1).unwrap(), 5000.0);
    }

    #[test]
    fn test_new_band_starts_at_zero_gain() {
        let (_engine, mut eq) = peak_eq();
        eq.add_band(125.0).unwrap();
        assert_eq!(eq.band_gain(0).unwrap(), 0.0);
    }

    #[test]
    fn test_never_added_index_is_rejected() {
        let (_engine, mut eq) = peak_eq();
        assert_eq!(
            eq.update_band(0, -3.0).unwrap_err(),
            FxError::InvalidBandIndex(0)
        );

        eq.add_band(1000.0).unwrap();
        assert_eq!(
            eq.band_gain(1).unwrap_err(),
            FxError::InvalidBandIndex(1)
        );
    }

    #[test]
    fn test_failed_append_does_not_count() {
        let (engine, mut eq) = peak_eq();
        eq.add_band(1000.0).unwrap();

        let channel = eq.fx.channel();
        engine.free_channel(channel);
        assert!(eq.add_band(5000.0).is_err());
        assert_eq!(eq.band_count(), 1);
    }

    #[test]
    fn test_interleaved_band_updates_stay_isolated() {
        let (_engine, mut eq) = peak_eq();
        eq.add_band(100.0).unwrap();
        eq.add_band(1000.0).unwrap();
        eq.add_band(10000.0).unwrap();

        eq.update_band(2, 6.0).unwrap();
        eq.update_band(0, -6.0).unwrap();
        eq.update_band(1, 3.0).unwrap();

        assert_eq!(eq.band_gain(0).unwrap(), -6.0);
        assert_eq!(eq.band_gain(1).unwrap(), 3.0);
        assert_eq!(eq.band_gain(2).unwrap(), 6.0);
    }
}
