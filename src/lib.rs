//! musegen: multi-model autoregressive music generation engine.
//!
//! This library turns .mus binary music-event logs into symbolic token
//! streams, drives three coupled sequence predictors through priming and
//! sampling, and reconstitutes a new .mus stream from their output.
//!
//! # Modules
//!
//! - [`codec`]: binary to/from symbolic translation (index space,
//!   quadruples, chord track, file streams)
//! - [`models`]: the abstract predictor interface and its ONNX backends
//! - [`generation`]: the chord/note/volume generation passes
//! - [`config`]: shared generation parameters
//! - [`error`]: error types and codes
//! - [`cli`]: command-line surface of the generation binary

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod generation;
pub mod models;

// Re-export commonly used types at crate root for convenience
pub use codec::{IndexSpace, MusFile};
pub use config::GenerationParams;
pub use error::{Error, ErrorCode, Result};
pub use generation::{GeneratedEvent, Primer};
