//! Shared ONNX session plumbing for recurrent predictors.
//!
//! Each predictor is a single-step ONNX export: scalar token inputs plus
//! the recurrent state pair `(h0, c0)`, producing its output head plus the
//! next state `(hn, cn)`. The session wrapper threads that state across
//! steps: the state is an opaque handle, reset at pass start and replaced
//! wholesale each step, never mutated in place.

use std::borrow::Cow;
use std::path::Path;

use half::f16;
use ndarray::Array1;
use ort::session::{Session, SessionInputValue};
use ort::value::{DynValue, Tensor};

use crate::error::{Error, Result};
use crate::models::config::PredictorConfig;

/// Model file expected inside every predictor directory.
pub const MODEL_FILE: &str = "model.onnx";

/// Input names of the recurrent state pair.
const STATE_INPUTS: [&str; 2] = ["h0", "c0"];

/// Output names of the updated state pair.
const STATE_OUTPUTS: [&str; 2] = ["hn", "cn"];

/// An ONNX session with its threaded recurrent state.
pub struct RecurrentSession {
    session: Session,
    config: PredictorConfig,
    hidden: DynValue,
    cell: DynValue,
}

impl RecurrentSession {
    /// Loads `model.onnx` from `model_dir` and initializes zeroed state.
    ///
    /// `default_config` supplies the state shape when the directory has no
    /// `config.json` sidecar.
    pub fn load(model_dir: &Path, default_config: PredictorConfig) -> Result<Self> {
        let model_path = model_dir.join(MODEL_FILE);
        if !model_path.exists() {
            return Err(Error::model_not_found(model_path.display().to_string()));
        }

        let config = PredictorConfig::load_or(model_dir, default_config)?;

        let session = Session::builder()
            .map_err(|e| Error::model_load_failed(format!("Failed to create session: {}", e)))?
            .commit_from_file(&model_path)
            .map_err(|e| {
                Error::model_load_failed(format!(
                    "Failed to load {}: {}",
                    model_path.display(),
                    e
                ))
            })?;

        let hidden = zero_state(&config)?;
        let cell = zero_state(&config)?;

        Ok(Self {
            session,
            config,
            hidden,
            cell,
        })
    }

    /// Resets the recurrent state to zeros for a fresh pass.
    pub fn reset(&mut self) -> Result<()> {
        self.hidden = zero_state(&self.config)?;
        self.cell = zero_state(&self.config)?;
        Ok(())
    }

    /// Advances the session one step.
    ///
    /// `tokens` are the scalar int64 inputs of this model (event and/or
    /// chord); the current state pair is fed alongside them. The updated
    /// state replaces the old one, and the output named `output_name` is
    /// returned for the caller to interpret.
    pub fn step(&mut self, tokens: &[(&str, i64)], output_name: &str) -> Result<DynValue> {
        let token_tensors = tokens
            .iter()
            .map(|(_, value)| {
                Tensor::from_array(([1usize, 1], vec![*value])).map_err(|e| {
                    Error::model_inference_failed(format!("Failed to create input tensor: {}", e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut session_inputs: Vec<(Cow<str>, SessionInputValue)> = tokens
            .iter()
            .zip(&token_tensors)
            .map(|((name, _), tensor)| (Cow::from(*name), SessionInputValue::from(tensor.view())))
            .collect();
        session_inputs.push((
            Cow::from(STATE_INPUTS[0]),
            SessionInputValue::from(self.hidden.view()),
        ));
        session_inputs.push((
            Cow::from(STATE_INPUTS[1]),
            SessionInputValue::from(self.cell.view()),
        ));

        let mut outputs = self
            .session
            .run(session_inputs)
            .map_err(|e| Error::model_inference_failed(format!("Session run failed: {}", e)))?;

        let output = outputs
            .remove(output_name)
            .ok_or_else(|| {
                Error::model_inference_failed(format!("{} not found in output", output_name))
            })?;

        let hidden = outputs.remove(STATE_OUTPUTS[0]).ok_or_else(|| {
            Error::model_inference_failed(format!("{} not found in output", STATE_OUTPUTS[0]))
        })?;
        let cell = outputs.remove(STATE_OUTPUTS[1]).ok_or_else(|| {
            Error::model_inference_failed(format!("{} not found in output", STATE_OUTPUTS[1]))
        })?;

        self.hidden = hidden;
        self.cell = cell;

        Ok(output)
    }
}

/// Creates a zeroed state tensor shaped `[num_layers, 1, hidden_size]`.
fn zero_state(config: &PredictorConfig) -> Result<DynValue> {
    let tensor = Tensor::from_array((
        [config.num_layers, 1usize, config.hidden_size],
        vec![0f32; config.state_len()],
    ))
    .map_err(|e| Error::model_load_failed(format!("Failed to create state tensor: {}", e)))?;
    Ok(tensor.into_dyn())
}

/// Extracts a logit vector of the expected length from a model output,
/// accepting both f32 and f16 tensors. The output may be shaped `[V]` or
/// `[1, 1, V]`; only the total element count is checked.
pub fn extract_logits(value: &DynValue, expected: usize) -> Result<Array1<f32>> {
    let data: Vec<f32> = if let Ok((_, data)) = value.try_extract_tensor::<f32>() {
        data.to_vec()
    } else if let Ok((_, data)) = value.try_extract_tensor::<f16>() {
        data.iter().map(|e| f32::from(*e)).collect()
    } else {
        return Err(Error::model_inference_failed(
            "Logits must be f32 or f16",
        ));
    };

    if data.len() != expected {
        return Err(Error::model_inference_failed(format!(
            "Expected {} logits, model produced {}",
            expected,
            data.len()
        )));
    }

    Ok(Array1::from_vec(data))
}

/// Extracts a single scalar from a model output, accepting f32 and f16.
pub fn extract_scalar(value: &DynValue) -> Result<f32> {
    let logits = extract_logits(value, 1)?;
    Ok(logits[0])
}
