//! Predictor models.
//!
//! This module contains the abstract predictor interface and its
//! ONNX-backed implementations:
//! - [`predictor`]: the trait surface the generation controller depends on
//! - [`session`]: recurrent-state threading over an ONNX session
//! - [`note`]/[`chord`]/[`volume`]: one wrapper per predictor role
//! - [`config`]: recurrent-state shape, with `config.json` sidecar support
//! - [`loader`]: bundling the predictors of one generation run

pub mod chord;
pub mod config;
pub mod loader;
pub mod note;
pub mod predictor;
pub mod session;
pub mod volume;

// Re-export commonly used types
pub use chord::OnnxChordPredictor;
pub use config::PredictorConfig;
pub use loader::PredictorSet;
pub use note::OnnxNotePredictor;
pub use predictor::{ChordPredictor, NotePredictor, VolumePredictor};
pub use session::MODEL_FILE;
pub use volume::OnnxVolumePredictor;
