//! Pitch to MIDI Conversion
//!
//! Host-side math for reporting a detected pitch as a MIDI note, a cent
//! offset and a display name. The tracking itself happens inside the engine;
//! this only interprets the frequency it hands back. Pitches below 20 Hz are
//! treated as "no pitch".

/// 1 / log10(2); converts base-10 logs to octaves.
const INVERSE_LOG2: f64 = 1.0 / std::f64::consts::LOG10_2;

/// Lowest named MIDI note, A0.
pub const MIN_MIDI_NOTE: i32 = 21;

/// Highest named MIDI note, C8.
pub const MAX_MIDI_NOTE: i32 = 108;

const NOTE_NAMES_SHARP: [&str; 12] = [
    "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
];
const NOTE_NAMES_FLAT: [&str; 12] = [
    "A", "Bb", "B", "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab",
];

/// One detected pitch, resolved to the nearest MIDI note.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchRecord {
    /// The detected pitch in Hz.
    pub pitch: f64,

    /// The nearest MIDI note, or 0 when no pitch was detected.
    pub midi_note: i32,

    /// Offset from the nearest note in cents, -50 to +50.
    pub midi_cents: i32,

    /// Display name like "A 4", when the note is in the A0..=C8 range.
    pub note_name: Option<String>,
}

impl PitchRecord {
    pub fn new(pitch: f64) -> Self {
        let (midi_note, midi_cents) = pitch_to_midi_note(pitch as f32).unwrap_or((0, 0));
        Self {
            pitch,
            midi_note,
            midi_cents,
            note_name: note_name(midi_note, true, true),
        }
    }
}

/// The nearest MIDI note and its cent offset for `pitch` Hz, or `None` below
/// the 20 Hz tracking floor.
pub fn pitch_to_midi_note(pitch: f32) -> Option<(i32, i32)> {
    if pitch < 20.0 {
        return None;
    }

    // 55 Hz is A1, MIDI note 33; 12 semitones per octave from there.
    let f_note = (12.0 * (f64::from(pitch) / 55.0).log10() * INVERSE_LOG2) as f32 + 33.0;
    let note = (f_note + 0.5) as i32;
    let cents = ((note as f32 - f_note) * 100.0) as i32;
    Some((note, cents))
}

/// The pitch in Hz of a (possibly fractional) MIDI note. Notes below A1
/// fall outside the tracked range and map to 0.
pub fn midi_note_to_pitch(note: f32) -> f32 {
    if note < 33.0 {
        return 0.0;
    }
    10f64.powf((f64::from(note) - 33.0) / INVERSE_LOG2 / 12.0) as f32 * 55.0
}

/// Format a MIDI note as text, `None` outside A0..=C8. `sharps` selects
/// sharp or flat spellings for the accidentals.
pub fn note_name(note: i32, sharps: bool, show_octave: bool) -> Option<String> {
    if !(MIN_MIDI_NOTE..=MAX_MIDI_NOTE).contains(&note) {
        return None;
    }

    let note = note - MIN_MIDI_NOTE;
    let octave = (note + 9) / 12;
    let names = if sharps {
        &NOTE_NAMES_SHARP
    } else {
        &NOTE_NAMES_FLAT
    };
    let name = names[(note % 12) as usize];

    Some(if show_octave {
        format!("{name} {octave}")
    } else {
        name.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concert_a_is_midi_69() {
        let record = PitchRecord::new(440.0);
        assert_eq!(record.midi_note, 69);
        assert_eq!(record.midi_cents, 0);
        assert_eq!(record.note_name.as_deref(), Some("A 4"));
    }

    #[test]
    fn test_below_tracking_floor_is_no_pitch() {
        assert_eq!(pitch_to_midi_note(19.9), None);

        let record = PitchRecord::new(5.0);
        assert_eq!(record.midi_note, 0);
        assert_eq!(record.midi_cents, 0);
        assert_eq!(record.note_name, None);
    }

    #[test]
    fn test_sharp_pitch_reports_cents() {
        // Roughly 10 cents above A4; truncation makes the last cent
        // imprecise, so the assertion allows one either side.
        let pitch = midi_note_to_pitch(69.1);
        let (note, cents) = pitch_to_midi_note(pitch).unwrap();
        assert_eq!(note, 69);
        assert!((-11..=-9).contains(&cents), "cents = {cents}");
    }

    #[test]
    fn test_midi_note_round_trip() {
        for note in [33, 45, 60, 69, 81, 108] {
            let pitch = midi_note_to_pitch(note as f32);
            let (back, _) = pitch_to_midi_note(pitch).unwrap();
            assert_eq!(back, note);
        }
        assert_eq!(midi_note_to_pitch(32.0), 0.0);
    }

    #[test]
    fn test_note_name_range_and_spelling() {
        assert_eq!(note_name(MIN_MIDI_NOTE, true, true).as_deref(), Some("A 0"));
        assert_eq!(note_name(MAX_MIDI_NOTE, true, true).as_deref(), Some("C 8"));
        assert_eq!(note_name(MIN_MIDI_NOTE - 1, true, true), None);
        assert_eq!(note_name(MAX_MIDI_NOTE + 1, true, true), None);

        // MIDI 70 is A#4 / Bb4.
        assert_eq!(note_name(70, true, false).as_deref(), Some("A#"));
        assert_eq!(note_name(70, false, false).as_deref(), Some("Bb"));
    }
}
