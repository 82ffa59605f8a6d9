//! Predictor model configuration.
//!
//! The recurrent state tensors fed to a model must match the shape it was
//! exported with. Each model directory may carry a `config.json` sidecar
//! naming the layer count and hidden size; absent fields fall back to the
//! per-track defaults the reference models were trained with.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Shape of a predictor's recurrent state: `[num_layers, 1, hidden_size]`
/// for each of h and c.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Number of stacked recurrent layers.
    pub num_layers: usize,

    /// Hidden units per layer.
    pub hidden_size: usize,
}

impl PredictorConfig {
    /// Default shape of the note predictor (3 layers of 800 units).
    pub fn note_default() -> Self {
        Self {
            num_layers: 3,
            hidden_size: 800,
        }
    }

    /// Default shape of the chord predictor (2 layers of 32 units).
    pub fn chord_default() -> Self {
        Self {
            num_layers: 2,
            hidden_size: 32,
        }
    }

    /// Default shape of the volume predictor (2 layers of 64 units).
    pub fn volume_default() -> Self {
        Self {
            num_layers: 2,
            hidden_size: 64,
        }
    }

    /// Validates the configuration for consistency.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        if self.num_layers == 0 {
            return Some("num_layers must be > 0".to_string());
        }
        if self.hidden_size == 0 {
            return Some("hidden_size must be > 0".to_string());
        }
        None
    }

    /// Total number of f32 elements in one state tensor.
    pub fn state_len(&self) -> usize {
        self.num_layers * self.hidden_size
    }

    /// Loads the configuration from `config.json` in `model_dir`, filling
    /// missing fields from `default`. A missing sidecar yields `default`
    /// unchanged.
    pub fn load_or(model_dir: &Path, default: Self) -> Result<Self> {
        let config_path = model_dir.join("config.json");
        if !config_path.exists() {
            return Ok(default);
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            Error::model_load_failed(format!(
                "Failed to read {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let json: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            Error::model_load_failed(format!(
                "Failed to parse {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let config = Self {
            num_layers: json
                .get("num_layers")
                .and_then(|v| v.as_u64())
                .map(|v| v as usize)
                .unwrap_or(default.num_layers),
            hidden_size: json
                .get("hidden_size")
                .and_then(|v| v.as_u64())
                .map(|v| v as usize)
                .unwrap_or(default.hidden_size),
        };

        if let Some(problem) = config.validate() {
            return Err(Error::model_load_failed(format!(
                "Invalid {}: {}",
                config_path.display(),
                problem
            )));
        }

        Ok(config)
    }
}
