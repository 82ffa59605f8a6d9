//! Predictor loading.
//!
//! Bundles the up-to-three predictors of a generation run. The note
//! predictor is mandatory; the chord and volume predictors are optional.
//! A disabled chord track falls back to the primer's own chords, a
//! disabled volume track to a constant volume.

use std::path::Path;

use crate::error::Result;
use crate::models::chord::OnnxChordPredictor;
use crate::models::note::OnnxNotePredictor;
use crate::models::predictor::{ChordPredictor, NotePredictor, VolumePredictor};
use crate::models::volume::OnnxVolumePredictor;

/// The predictors driving one generation run.
pub struct PredictorSet {
    /// Note predictor; always present.
    pub note: Box<dyn NotePredictor>,
    /// Chord predictor; None reuses the primer's chord track.
    pub chord: Option<Box<dyn ChordPredictor>>,
    /// Volume predictor; None yields constant volume 0.5.
    pub volume: Option<Box<dyn VolumePredictor>>,
}

impl PredictorSet {
    /// Loads the ONNX predictors for a run.
    pub fn load(
        note_dir: &Path,
        chord_dir: Option<&Path>,
        volume_dir: Option<&Path>,
    ) -> Result<Self> {
        eprintln!("Loading note model from {}...", note_dir.display());
        let note = Box::new(OnnxNotePredictor::load(note_dir)?);

        let chord: Option<Box<dyn ChordPredictor>> = match chord_dir {
            Some(dir) => {
                eprintln!("Loading chord model from {}...", dir.display());
                Some(Box::new(OnnxChordPredictor::load(dir)?))
            }
            None => None,
        };

        let volume: Option<Box<dyn VolumePredictor>> = match volume_dir {
            Some(dir) => {
                eprintln!("Loading volume model from {}...", dir.display());
                Some(Box::new(OnnxVolumePredictor::load(dir)?))
            }
            None => None,
        };

        Ok(Self {
            note,
            chord,
            volume,
        })
    }
}
