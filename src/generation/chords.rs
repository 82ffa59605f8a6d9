//! Chord-track generation pass.
//!
//! Runs before the note pass. The chord predictor is primed on the
//! primer's own chord track, then samples chords autoregressively until it
//! emits the stop sentinel or hits its length budget. The resulting track
//! replaces the primer's chords as the note pass's conditioning input once
//! note priming ends.

use crate::codec::STOP_CHORD;
use crate::config::GenerationParams;
use crate::error::{Error, Result};
use crate::generation::sampler::Sampler;
use crate::generation::TrackState;
use crate::models::ChordPredictor;

/// Generates a chord track from `primer_chords`.
///
/// The returned track opens with the primer's first chord, contains only
/// chords sampled after full priming (the replays plus the warm-up tail),
/// and always closes with exactly one stop sentinel.
pub fn generate_chords(
    predictor: &mut dyn ChordPredictor,
    primer_chords: &[u8],
    params: &GenerationParams,
    sampler: &mut Sampler,
) -> Result<Vec<u8>> {
    let input_size = primer_chords.len();
    if input_size == 0 {
        return Err(Error::primer_too_short(1, 0, "chord-track entries"));
    }
    if params.chord_priming_length > input_size {
        return Err(Error::primer_too_short(
            params.chord_priming_length,
            input_size,
            "chord-track entries",
        ));
    }

    predictor.reset()?;

    let replay = params.n_primes * input_size;
    let full_priming = replay + params.chord_priming_length;

    let mut output = primer_chords[0];
    let mut result = vec![output];
    let mut input = output;
    let mut state = TrackState::Priming;

    for i in 0..full_priming + params.chord_max_length {
        output = if i < full_priming {
            // Warm the hidden state on the true track; discard the logits.
            predictor.step(input)?;
            primer_chords[(i + 1) % input_size]
        } else {
            state = TrackState::Generating;
            let logits = predictor.step(input)?;
            sampler.sample(&logits, params.chord_temperature)? as u8
        };

        input = output;

        if i < full_priming {
            continue;
        }
        if output == STOP_CHORD {
            state = TrackState::Terminated;
            break;
        }
        result.push(output);
    }

    if state != TrackState::Terminated {
        eprintln!("Chord track hit its length budget before the stop chord.");
    }
    result.push(STOP_CHORD);
    Ok(result)
}
