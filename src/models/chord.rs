//! ONNX-backed chord predictor.

use std::path::Path;

use ndarray::Array1;

use crate::codec::CHORD_COUNT;
use crate::error::Result;
use crate::models::config::PredictorConfig;
use crate::models::predictor::ChordPredictor;
use crate::models::session::{extract_logits, RecurrentSession};

/// Chord predictor loaded from a single-step ONNX export.
///
/// Expected signature: int64 input `chord` (`[1, 1]`) plus state `h0`/`c0`;
/// outputs `logits` over the 25-chord alphabet plus `hn`/`cn`.
pub struct OnnxChordPredictor {
    inner: RecurrentSession,
}

impl OnnxChordPredictor {
    /// Loads the chord model from a directory containing `model.onnx`.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let inner = RecurrentSession::load(model_dir, PredictorConfig::chord_default())?;
        Ok(Self { inner })
    }
}

impl ChordPredictor for OnnxChordPredictor {
    fn reset(&mut self) -> Result<()> {
        self.inner.reset()
    }

    fn step(&mut self, chord: u8) -> Result<Array1<f32>> {
        let output = self.inner.step(&[("chord", chord as i64)], "logits")?;
        extract_logits(&output, CHORD_COUNT)
    }
}
