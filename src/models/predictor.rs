//! Abstract sequence-predictor interface.
//!
//! The generation controller only needs three capabilities from a learned
//! model: reset its recurrent state, advance it one step, and hand back a
//! probability-bearing vector (or a scalar, for volume). Everything else
//! (architecture, weights, training) lives behind these traits. Batch size
//! is fixed at 1 during generation, so `reset` takes no argument.
//!
//! The shipped implementations wrap single-step ONNX exports (see
//! [`super::note`], [`super::chord`], [`super::volume`]); tests drive the
//! controller with deterministic in-memory stubs.

use ndarray::Array1;

use crate::error::Result;

/// Predictor over the full event alphabet, conditioned on the previous
/// event and the chord of the current beat.
pub trait NotePredictor {
    /// Resets the recurrent state for a fresh pass.
    fn reset(&mut self) -> Result<()>;

    /// Advances one step and returns the output distribution's logits over
    /// all `event_count()` events.
    fn step(&mut self, event: u16, chord: u8) -> Result<Array1<f32>>;
}

/// Predictor over the 25-symbol chord alphabet.
pub trait ChordPredictor {
    /// Resets the recurrent state for a fresh pass.
    fn reset(&mut self) -> Result<()>;

    /// Advances one step and returns logits over the chord alphabet.
    fn step(&mut self, chord: u8) -> Result<Array1<f32>>;
}

/// Regression predictor producing one volume per event.
pub trait VolumePredictor {
    /// Resets the recurrent state for a fresh pass.
    fn reset(&mut self) -> Result<()>;

    /// Advances one step and returns the regressed volume for `event`.
    fn step(&mut self, event: u16) -> Result<f32>;
}
