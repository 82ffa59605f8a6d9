//! Chord track derivation.
//!
//! The chord track is the beat-quantized chord sequence of a .mus stream:
//! one chord ID per 12-tick beat window, closed by the stop sentinel. It is
//! both the training target of the chord predictor and the conditioning
//! input of the note generation pass.

use crate::codec::index_space::STOP_CHORD;
use crate::codec::quadruple::DecodedEvent;

/// Ticks per beat; chords are sampled at beat boundaries.
pub const TICKS_PER_BEAT: u64 = 12;

/// Derives the chord track from a decoded event stream.
///
/// A pending chord tag survives only until the next quadruple: time-shifts
/// install a new tag, every other event clears it. A chord is emitted when
/// a quadruple is reached while the tick counter sits on a beat boundary
/// and a tag is pending, so each boundary yields exactly one chord, emitted
/// right after the time-shift that reached it. The initial pending tag is 0,
/// which makes beat 0 default to chord 0.
///
/// The track is closed with the stop sentinel unless the final pending tag
/// is already the sentinel.
pub fn derive_chord_track<I>(events: I) -> Vec<u8>
where
    I: IntoIterator<Item = DecodedEvent>,
{
    let mut track = Vec::new();
    let mut tick: u64 = 0;
    let mut pending: Option<u8> = Some(0);

    for event in events {
        if let Some(chord) = pending {
            if tick % TICKS_PER_BEAT == 0 {
                track.push(chord);
            }
        }
        pending = event.chord_tag();
        tick += event.tick_advance();
    }

    if pending != Some(STOP_CHORD) {
        track.push(STOP_CHORD);
    }

    track
}
