//! Effect Parameter Layouts
//!
//! Each effect kind is configured through a fixed-layout parameter block.
//! The engine reads and writes these blocks through a raw address, so every
//! struct here is `#[repr(C)]` and its field order and sizes must match the
//! native layout exactly. The layout is fixed at compile time per effect
//! kind; there is no runtime variation and no padding surprises (all fields
//! are 4 bytes wide).

use serde::{Deserialize, Serialize};

/// The effect kinds this binding layer knows how to configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Reverb,
    Chorus,
    PeakEq,
}

/// Channel-flags value selecting all channels of a stream.
pub const CHANNEL_ALL: i32 = -1;

/// Marker for fixed-layout parameter blocks the engine can read and write
/// through a raw address.
///
/// Implementors must be `#[repr(C)]` plain data matching the native struct
/// for [`Self::KIND`].
pub trait EffectParameters: Copy + Default + Send + Unpin + 'static {
    /// The native effect kind this block configures.
    const KIND: EffectKind;
}

/// Reverb parameter block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    /// Dry (unaffected) signal mix (0.0...1.0).
    pub dry_mix: f32,
    /// Wet (affected) signal mix (0.0...3.0).
    pub wet_mix: f32,
    /// Room size (0.0...1.0).
    pub room_size: f32,
    /// Damping factor (0.0...1.0).
    pub damp: f32,
    /// Stereo width (0.0...1.0).
    pub width: f32,
    /// Processing mode flags (engine-defined, 0 = default).
    pub mode: i32,
    /// Channel-flags bitset selecting which channels the effect applies to.
    pub channel: i32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            dry_mix: 0.0,
            wet_mix: 1.0,
            room_size: 0.5,
            damp: 0.5,
            width: 1.0,
            mode: 0,
            channel: CHANNEL_ALL,
        }
    }
}

impl EffectParameters for ReverbParams {
    const KIND: EffectKind = EffectKind::Reverb;
}

/// Chorus parameter block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChorusParams {
    /// Dry (unaffected) signal mix (-2.0...+2.0).
    pub dry_mix: f32,
    /// Wet (affected) signal mix (-2.0...+2.0).
    pub wet_mix: f32,
    /// Feedback (-1.0...+1.0).
    pub feedback: f32,
    /// Minimum delay in ms (0...6000).
    pub min_sweep: f32,
    /// Maximum delay in ms (0...6000).
    pub max_sweep: f32,
    /// Rate of delay change in ms/s (0...1000).
    pub rate: f32,
    /// Channel-flags bitset selecting which channels the effect applies to.
    pub channel: i32,
}

impl Default for ChorusParams {
    fn default() -> Self {
        Self {
            dry_mix: 0.9,
            wet_mix: 0.35,
            feedback: 0.5,
            min_sweep: 1.0,
            max_sweep: 400.0,
            rate: 200.0,
            channel: CHANNEL_ALL,
        }
    }
}

impl EffectParameters for ChorusParams {
    const KIND: EffectKind = EffectKind::Chorus;
}

/// Peaking-EQ parameter block.
///
/// A single block multiplexes access to all bands of the effect: `band`
/// selects which band `center`/`gain` refer to, and must be written
/// immediately before every native get or set of those fields. Callers never
/// touch this struct directly; `otter_fx::PeakEq` hides the selector behind
/// indexed accessors.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakEqParams {
    /// Band selector (0-based). -1 before any band has been added.
    pub band: i32,
    /// Bandwidth in octaves (used when `q` is 0).
    pub bandwidth: f32,
    /// Q factor (takes precedence over `bandwidth` when non-zero).
    pub q: f32,
    /// Center frequency of the selected band, in Hz.
    pub center: f32,
    /// Gain of the selected band, in dB.
    pub gain: f32,
    /// Channel-flags bitset selecting which channels the effect applies to.
    pub channel: i32,
}

impl Default for PeakEqParams {
    fn default() -> Self {
        Self {
            band: -1,
            bandwidth: 2.5,
            q: 0.0,
            center: 0.0,
            gain: 0.0,
            channel: CHANNEL_ALL,
        }
    }
}

impl EffectParameters for PeakEqParams {
    const KIND: EffectKind = EffectKind::PeakEq;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_layout_sizes() {
        // All fields are 4 bytes; repr(C) must not introduce padding.
        assert_eq!(size_of::<ReverbParams>(), 28);
        assert_eq!(size_of::<ChorusParams>(), 28);
        assert_eq!(size_of::<PeakEqParams>(), 24);
    }

    #[test]
    fn test_peak_eq_field_order() {
        assert_eq!(offset_of!(PeakEqParams, band), 0);
        assert_eq!(offset_of!(PeakEqParams, bandwidth), 4);
        assert_eq!(offset_of!(PeakEqParams, q), 8);
        assert_eq!(offset_of!(PeakEqParams, center), 12);
        assert_eq!(offset_of!(PeakEqParams, gain), 16);
        assert_eq!(offset_of!(PeakEqParams, channel), 20);
    }

    #[test]
    fn test_reverb_field_order() {
        assert_eq!(offset_of!(ReverbParams, dry_mix), 0);
        assert_eq!(offset_of!(ReverbParams, wet_mix), 4);
        assert_eq!(offset_of!(ReverbParams, room_size), 8);
        assert_eq!(offset_of!(ReverbParams, damp), 12);
        assert_eq!(offset_of!(ReverbParams, width), 16);
        assert_eq!(offset_of!(ReverbParams, mode), 20);
        assert_eq!(offset_of!(ReverbParams, channel), 24);
    }

    #[test]
    fn test_defaults() {
        let reverb = ReverbParams::default();
        assert_eq!(reverb.wet_mix, 1.0);
        assert_eq!(reverb.room_size, 0.5);
        assert_eq!(reverb.channel, CHANNEL_ALL);

        let chorus = ChorusParams::default();
        assert_eq!(chorus.dry_mix, 0.9);
        assert_eq!(chorus.wet_mix, 0.35);
        assert_eq!(chorus.feedback, 0.5);

        let eq = PeakEqParams::default();
        assert_eq!(eq.band, -1);
        assert_eq!(eq.bandwidth, 2.5);
        assert_eq!(eq.q, 0.0);
    }
}
