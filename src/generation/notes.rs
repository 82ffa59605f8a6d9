//! Note generation pass.
//!
//! The note predictor is primed on the primer's event stream, conditioned
//! each step on the chord of the upcoming beat, then samples events until
//! the conditioning chord is the stop sentinel, the chord track runs out,
//! or the step budget is spent. Time advances only on sampled time-shift
//! events; the chord fed for the next step is indexed by `ceil(tick / 12)`
//! into the active chord track.

use crate::codec::{IndexSpace, STOP_CHORD, TICKS_PER_BEAT};
use crate::config::GenerationParams;
use crate::error::{Error, Result};
use crate::generation::sampler::{ClusterMask, Sampler};
use crate::generation::{GeneratedEvent, TrackState, DEFAULT_VOLUME};
use crate::models::NotePredictor;

/// Generates the event sequence.
///
/// `source_chords` is the primer's own chord track, used for conditioning
/// throughout priming; `generated_chords`, when present, replaces it
/// exactly at the step where the last primer replay ends. Nothing is
/// emitted while priming (the replays plus the warm-up tail); afterwards
/// up to `max_length` sampled steps are emitted, so with `max_length` 0
/// the result is empty.
pub fn generate_notes(
    predictor: &mut dyn NotePredictor,
    primer_events: &[u16],
    source_chords: &[u8],
    generated_chords: Option<&[u8]>,
    params: &GenerationParams,
    sampler: &mut Sampler,
) -> Result<Vec<GeneratedEvent>> {
    let space = IndexSpace::get();

    let input_size = primer_events.len();
    if input_size == 0 {
        return Err(Error::primer_too_short(1, 0, "events"));
    }
    if params.priming_length > input_size {
        return Err(Error::primer_too_short(
            params.priming_length,
            input_size,
            "events",
        ));
    }

    predictor.reset()?;

    let replay = params.n_primes * input_size;
    let full_priming = replay + params.priming_length;

    let mut chords = source_chords;
    let mut input_event = primer_events[0];
    let mut input_chord: u8 = 0;
    let mut tick: u64 = 0;
    let mut mask: Option<ClusterMask> = None;
    let mut state = TrackState::Priming;
    let mut result = Vec::new();

    for i in 0..full_priming + params.max_length {
        // Lock the masking cluster on the first note-on that flows through
        // the predictor, whether fed or sampled.
        if params.single_instrument && mask.is_none() {
            if let Some(cluster) = space.note_on_cluster(input_event) {
                mask = Some(ClusterMask::for_cluster(space, cluster));
            }
        }

        let output = if i < full_priming {
            // Warm the hidden state on the true next event.
            predictor.step(input_event, input_chord)?;
            primer_events[(i + 1) % input_size]
        } else {
            state = TrackState::Generating;
            let logits = predictor.step(input_event, input_chord)?;
            let drawn = match &mask {
                Some(m) => sampler.sample_masked(&logits, params.temperature, |j| m.allows(j))?,
                None => sampler.sample(&logits, params.temperature)?,
            };
            drawn as u16
        };

        // Each primer replay restarts the song, and with it the clock. The
        // generated chord track takes over exactly when the last replay
        // ends.
        if i > 0 && i % input_size == 0 && i <= replay {
            tick = 0;
            if i == replay {
                if let Some(generated) = generated_chords {
                    chords = generated;
                }
            }
        }

        if output == space.small_shift_event() {
            tick += 1;
        } else if output == space.large_shift_event() {
            tick += 6;
        }

        // Condition the next step on the chord of the upcoming beat.
        let beat = ((tick + TICKS_PER_BEAT - 1) / TICKS_PER_BEAT) as usize;
        if beat >= chords.len() {
            // Chord track exhausted: expected early termination, keeping
            // everything emitted so far.
            state = TrackState::Terminated;
            break;
        }
        input_chord = chords[beat];
        input_event = output;

        if i < full_priming {
            continue;
        }
        if input_chord == STOP_CHORD {
            state = TrackState::Terminated;
            break;
        }
        result.push(GeneratedEvent {
            event: output,
            chord: input_chord,
            volume: DEFAULT_VOLUME,
        });
    }

    if state != TrackState::Terminated {
        eprintln!("Note track hit its length budget of {} steps.", params.max_length);
    }

    Ok(result)
}
