//! ONNX-backed volume predictor.

use std::path::Path;

use crate::error::Result;
use crate::models::config::PredictorConfig;
use crate::models::predictor::VolumePredictor;
use crate::models::session::{extract_scalar, RecurrentSession};

/// Volume predictor loaded from a single-step ONNX export.
///
/// Expected signature: int64 input `event` (`[1, 1]`) plus state `h0`/`c0`;
/// outputs a scalar `volume` plus `hn`/`cn`. Volumes are a regression, not
/// a distribution; the scalar is used directly.
pub struct OnnxVolumePredictor {
    inner: RecurrentSession,
}

impl OnnxVolumePredictor {
    /// Loads the volume model from a directory containing `model.onnx`.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let inner = RecurrentSession::load(model_dir, PredictorConfig::volume_default())?;
        Ok(Self { inner })
    }
}

impl VolumePredictor for OnnxVolumePredictor {
    fn reset(&mut self) -> Result<()> {
        self.inner.reset()
    }

    fn step(&mut self, event: u16) -> Result<f32> {
        let output = self.inner.step(&[("event", event as i64)], "volume")?;
        extract_scalar(&output)
    }
}
