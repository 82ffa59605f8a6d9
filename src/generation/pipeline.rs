//! Generation pipeline.
//!
//! Orchestrates one generation run as a strictly sequential pipeline: the
//! chord pass (when a chord predictor is present) finishes before the note
//! pass starts sampling, and the note pass finishes before the volume pass
//! regresses over its output. Each pass resets and owns its predictor's
//! recurrent state; the seeded sampler is the only resource shared across
//! passes.

use crate::codec::MusFile;
use crate::config::GenerationParams;
use crate::error::{Error, Result};
use crate::generation::chords::generate_chords;
use crate::generation::notes::generate_notes;
use crate::generation::sampler::Sampler;
use crate::generation::volumes::generate_volumes;
use crate::generation::GeneratedEvent;
use crate::models::PredictorSet;

/// The primer's three parallel token streams, decoded once per run.
#[derive(Debug)]
pub struct Primer {
    /// Event IDs, one per quadruple.
    pub events: Vec<u16>,
    /// Beat-quantized chord track.
    pub chord_track: Vec<u8>,
    /// Event/volume pairs, one per quadruple.
    pub volumes: Vec<(u16, f32)>,
}

impl Primer {
    /// Decodes the token streams of a loaded .mus file.
    pub fn from_file(file: &MusFile) -> Result<Self> {
        Ok(Self {
            events: file.events()?.into_iter().map(|(event, _)| event).collect(),
            chord_track: file.chord_track()?,
            volumes: file.volumes()?,
        })
    }
}

/// Checks the run parameters against the primer before any predictor is
/// stepped.
fn validate_run(primer: &Primer, params: &GenerationParams, chord_pass: bool) -> Result<()> {
    if let Some(problem) = params.validate() {
        return Err(Error::invalid_parameter(problem));
    }
    if primer.events.is_empty() {
        return Err(Error::primer_too_short(1, 0, "events"));
    }
    if params.priming_length > primer.events.len() {
        return Err(Error::primer_too_short(
            params.priming_length,
            primer.events.len(),
            "events",
        ));
    }
    if chord_pass && params.chord_priming_length > primer.chord_track.len() {
        return Err(Error::primer_too_short(
            params.chord_priming_length,
            primer.chord_track.len(),
            "chord-track entries",
        ));
    }
    Ok(())
}

/// Runs the full generation pipeline and returns the emitted triples.
pub fn generate(
    predictors: &mut PredictorSet,
    primer: &Primer,
    params: &GenerationParams,
) -> Result<Vec<GeneratedEvent>> {
    validate_run(primer, params, predictors.chord.is_some())?;

    let mut sampler = Sampler::new(params.seed);

    let generated_chords = match predictors.chord.as_mut() {
        Some(predictor) => {
            eprintln!("Generating chords...");
            let track =
                generate_chords(predictor.as_mut(), &primer.chord_track, params, &mut sampler)?;
            eprintln!("Generated {} chords.", track.len());
            Some(track)
        }
        None => None,
    };

    eprintln!("Generating notes...");
    let mut result = generate_notes(
        predictors.note.as_mut(),
        &primer.events,
        &primer.chord_track,
        generated_chords.as_deref(),
        params,
        &mut sampler,
    )?;
    eprintln!("Generated {} events.", result.len());

    if let Some(predictor) = predictors.volume.as_mut() {
        eprintln!("Generating volumes...");
        let emitted: Vec<u16> = result.iter().map(|e| e.event).collect();
        let volumes = generate_volumes(predictor.as_mut(), &primer.volumes, &emitted, params)?;
        for (event, volume) in result.iter_mut().zip(volumes) {
            event.volume = volume;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{IndexSpace, STOP_CHORD};
    use crate::error::ErrorCode;
    use crate::generation::DEFAULT_VOLUME;
    use crate::models::{ChordPredictor, NotePredictor, VolumePredictor};
    use ndarray::Array1;

    /// Note predictor that always wants the end marker, which never moves
    /// the clock, so runs end by budget.
    struct EndMarkerNotes;

    impl NotePredictor for EndMarkerNotes {
        fn reset(&mut self) -> Result<()> {
            Ok(())
        }

        fn step(&mut self, _event: u16, _chord: u8) -> Result<Array1<f32>> {
            let space = IndexSpace::get();
            let mut logits = Array1::zeros(space.event_count() as usize);
            logits[space.end_marker_event() as usize] = 60.0;
            Ok(logits)
        }
    }

    /// Chord predictor that immediately wants the stop sentinel.
    struct StopChords;

    impl ChordPredictor for StopChords {
        fn reset(&mut self) -> Result<()> {
            Ok(())
        }

        fn step(&mut self, _chord: u8) -> Result<Array1<f32>> {
            let mut logits = Array1::zeros(25);
            logits[STOP_CHORD as usize] = 60.0;
            Ok(logits)
        }
    }

    /// Constant-volume regressor.
    struct ConstantVolumes(f32);

    impl VolumePredictor for ConstantVolumes {
        fn reset(&mut self) -> Result<()> {
            Ok(())
        }

        fn step(&mut self, _event: u16) -> Result<f32> {
            Ok(self.0)
        }
    }

    fn primer() -> Primer {
        let space = IndexSpace::get();
        let on = space.note_on_base(0) + 60;
        Primer {
            events: vec![on, space.end_marker_event()],
            chord_track: vec![0, 24],
            volumes: vec![(on, 0.7), (space.end_marker_event(), -1.0)],
        }
    }

    fn params(max_length: usize) -> GenerationParams {
        GenerationParams {
            n_primes: 1,
            priming_length: 0,
            chord_priming_length: 0,
            max_length,
            ..Default::default()
        }
    }

    fn predictors(
        chord: Option<Box<dyn ChordPredictor>>,
        volume: Option<Box<dyn VolumePredictor>>,
    ) -> PredictorSet {
        PredictorSet {
            note: Box::new(EndMarkerNotes),
            chord,
            volume,
        }
    }

    #[test]
    fn note_only_run_uses_default_volume() {
        let mut set = predictors(None, None);
        let result = generate(&mut set, &primer(), &params(5)).unwrap();
        assert_eq!(result.len(), 5);
        for event in &result {
            assert_eq!(event.event, IndexSpace::get().end_marker_event());
            assert_eq!(event.chord, 0);
            assert_eq!(event.volume, DEFAULT_VOLUME);
        }
    }

    #[test]
    fn volume_pass_overwrites_placeholder() {
        let mut set = predictors(None, Some(Box::new(ConstantVolumes(0.9))));
        let result = generate(&mut set, &primer(), &params(4)).unwrap();
        assert_eq!(result.len(), 4);
        assert!(result.iter().all(|e| e.volume == 0.9));
    }

    #[test]
    fn chord_pass_feeds_note_conditioning() {
        // The chord predictor stops immediately, so the generated track is
        // [first primer chord, 24]: beat 0 still carries chord 0 and the
        // note pass runs to its budget exactly as with source chords.
        let mut set = predictors(Some(Box::new(StopChords)), None);
        let result = generate(&mut set, &primer(), &params(3)).unwrap();
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|e| e.chord == 0));
    }

    #[test]
    fn max_length_zero_yields_empty_output() {
        let mut set = predictors(None, Some(Box::new(ConstantVolumes(0.9))));
        let mut p = params(0);
        p.priming_length = 2;
        let result = generate(&mut set, &primer(), &p).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn validation_rejects_bad_params_before_stepping() {
        let mut set = predictors(None, None);
        let mut p = params(5);
        p.n_primes = 0;
        let err = generate(&mut set, &primer(), &p).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameter);

        let mut p = params(5);
        p.priming_length = 100;
        let err = generate(&mut set, &primer(), &p).unwrap_err();
        assert_eq!(err.code, ErrorCode::PrimerTooShort);
    }

    #[test]
    fn validation_checks_chord_priming_only_with_chord_pass() {
        let mut p = params(3);
        p.chord_priming_length = 50;

        // Without a chord predictor the chord-track length is irrelevant.
        let mut set = predictors(None, None);
        assert!(generate(&mut set, &primer(), &p).is_ok());

        let mut set = predictors(Some(Box::new(StopChords)), None);
        let err = generate(&mut set, &primer(), &p).unwrap_err();
        assert_eq!(err.code, ErrorCode::PrimerTooShort);
    }
}
