//! Volume regression pass.
//!
//! Runs after the note pass has fully terminated. The volume predictor is
//! primed on the primer's event stream, then steps once per emitted event
//! and takes the scalar output directly. Volumes are a regression, not a
//! draw, so this pass consumes no randomness.

use crate::config::GenerationParams;
use crate::error::{Error, Result};
use crate::models::VolumePredictor;

/// Regresses one volume per emitted event.
///
/// `primer` pairs each primer event with its true volume (the training
/// stream of the predictor); priming feeds the event column for the
/// replays plus the warm-up tail, emitting nothing. Afterwards every
/// emitted event gets the predictor's regressed scalar, in order.
pub fn generate_volumes(
    predictor: &mut dyn VolumePredictor,
    primer: &[(u16, f32)],
    emitted: &[u16],
    params: &GenerationParams,
) -> Result<Vec<f32>> {
    let primer_size = primer.len();
    if primer_size == 0 {
        return Err(Error::primer_too_short(1, 0, "events"));
    }
    if params.priming_length > primer_size {
        return Err(Error::primer_too_short(
            params.priming_length,
            primer_size,
            "events",
        ));
    }

    predictor.reset()?;

    let full_priming = params.n_primes * primer_size + params.priming_length;
    for i in 0..full_priming {
        let (event, _) = primer[i % primer_size];
        predictor.step(event)?;
    }

    emitted.iter().map(|&event| predictor.step(event)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    /// Returns `steps_so_far / 100` so each regressed volume is
    /// distinguishable; records the events it was driven with.
    struct CountingVolumes {
        steps: usize,
        resets: usize,
        inputs: Vec<u16>,
    }

    impl CountingVolumes {
        fn new() -> Self {
            Self {
                steps: 0,
                resets: 0,
                inputs: Vec::new(),
            }
        }
    }

    impl VolumePredictor for CountingVolumes {
        fn reset(&mut self) -> Result<()> {
            self.resets += 1;
            Ok(())
        }

        fn step(&mut self, event: u16) -> Result<f32> {
            self.steps += 1;
            self.inputs.push(event);
            Ok(self.steps as f32 / 100.0)
        }
    }

    fn params(n_primes: usize, priming: usize) -> GenerationParams {
        GenerationParams {
            n_primes,
            priming_length: priming,
            ..Default::default()
        }
    }

    #[test]
    fn one_volume_per_emitted_event() {
        let primer = vec![(10, 0.8), (11, -1.0), (12, 0.3)];
        let emitted = vec![20, 21, 22, 23, 24];
        let mut predictor = CountingVolumes::new();
        let volumes =
            generate_volumes(&mut predictor, &primer, &emitted, &params(2, 0)).unwrap();
        assert_eq!(volumes.len(), emitted.len());
    }

    #[test]
    fn priming_feeds_primer_events_and_emits_nothing() {
        let primer = vec![(10, 0.8), (11, -1.0), (12, 0.3)];
        let emitted = vec![20, 21, 22, 23];
        let mut predictor = CountingVolumes::new();
        let volumes =
            generate_volumes(&mut predictor, &primer, &emitted, &params(1, 2)).unwrap();

        // Replay of 3 plus a warm-up tail of 2 cycling from the primer's
        // start, then one regression step per emitted event.
        assert_eq!(predictor.inputs, vec![10, 11, 12, 10, 11, 20, 21, 22, 23]);
        assert_eq!(volumes, vec![0.06, 0.07, 0.08, 0.09]);
    }

    #[test]
    fn regression_is_deterministic_over_emitted_events() {
        let primer = vec![(10, 0.8), (11, 0.2)];
        let emitted = vec![30, 31, 32];
        let mut predictor = CountingVolumes::new();
        let volumes =
            generate_volumes(&mut predictor, &primer, &emitted, &params(1, 0)).unwrap();

        // Replay of 2 steps, then one step per emitted event.
        assert_eq!(predictor.steps, 5);
        assert_eq!(volumes, vec![0.03, 0.04, 0.05]);
        assert_eq!(predictor.inputs[2..], [30, 31, 32]);
        assert_eq!(predictor.resets, 1);
    }

    #[test]
    fn empty_emission_yields_empty_volumes() {
        let primer = vec![(10, 0.8)];
        let mut predictor = CountingVolumes::new();
        let volumes = generate_volumes(&mut predictor, &primer, &[], &params(1, 0)).unwrap();
        assert!(volumes.is_empty());
        // The replay still ran to completion.
        assert_eq!(predictor.steps, 1);
    }

    #[test]
    fn too_short_primer_is_rejected_before_stepping() {
        let primer = vec![(10, 0.8)];
        let mut predictor = CountingVolumes::new();
        let err =
            generate_volumes(&mut predictor, &primer, &[20], &params(1, 5)).unwrap_err();
        assert_eq!(err.code, ErrorCode::PrimerTooShort);
        assert_eq!(predictor.steps, 0);

        let err = generate_volumes(&mut predictor, &[], &[20], &params(1, 0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::PrimerTooShort);
    }
}
