//! ONNX-backed note predictor.

use std::path::Path;

use ndarray::Array1;

use crate::codec::IndexSpace;
use crate::error::Result;
use crate::models::config::PredictorConfig;
use crate::models::predictor::NotePredictor;
use crate::models::session::{extract_logits, RecurrentSession};

/// Note predictor loaded from a single-step ONNX export.
///
/// Expected signature: int64 inputs `event` and `chord` (both `[1, 1]`)
/// plus state `h0`/`c0`; outputs `logits` over the full event alphabet
/// plus `hn`/`cn`.
pub struct OnnxNotePredictor {
    inner: RecurrentSession,
    event_count: usize,
}

impl OnnxNotePredictor {
    /// Loads the note model from a directory containing `model.onnx`.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let inner = RecurrentSession::load(model_dir, PredictorConfig::note_default())?;
        Ok(Self {
            inner,
            event_count: IndexSpace::get().event_count() as usize,
        })
    }
}

impl NotePredictor for OnnxNotePredictor {
    fn reset(&mut self) -> Result<()> {
        self.inner.reset()
    }

    fn step(&mut self, event: u16, chord: u8) -> Result<Array1<f32>> {
        let output = self
            .inner
            .step(&[("event", event as i64), ("chord", chord as i64)], "logits")?;
        extract_logits(&output, self.event_count)
    }
}
