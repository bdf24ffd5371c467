//! Otter FX - Effect Parameter Synchronization
//!
//! This crate provides the control protocol around the engine's effects:
//! - Address-stable parameter blocks ([`PinnedBlock`]) the engine reads and
//!   writes through a raw pointer for the effect's whole lifetime
//! - The apply/refresh protocol ([`FxBinding`]): batch local field writes,
//!   push the whole block once, pull it back before partial updates
//! - Typed wrappers ([`Reverb`], [`Chorus`]) with property-style accessors
//! - The banded peaking EQ ([`PeakEq`]), which hides the engine's shared
//!   band-selector field behind indexed operations
//! - Pitch interpretation ([`PitchRecord`]): resolving a detected frequency
//!   to a MIDI note, cent offset and display name
//!
//! The DSP itself lives inside the engine and is treated as a black box;
//! only the parameter control and synchronization protocol is implemented
//! here.

mod binding;
mod effects;
mod error;
mod peak_eq;
mod pinned;
mod pitch;

pub use binding::FxBinding;
pub use effects::{Chorus, Reverb};
pub use error::{FxError, FxResult};
pub use peak_eq::PeakEq;
pub use pinned::PinnedBlock;
pub use pitch::{
    midi_note_to_pitch, note_name, pitch_to_midi_note, PitchRecord, MAX_MIDI_NOTE, MIN_MIDI_NOTE,
};
