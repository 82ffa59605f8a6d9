//! Error types for musegen.
//!
//! Defines all error codes and types used throughout the engine for
//! consistent error handling and reporting.

use std::fmt;

/// Error codes returned by the engine.
///
/// These codes allow callers to programmatically distinguish data-integrity
/// failures from model failures. Chord-track exhaustion during generation is
/// deliberately absent: it is a normal termination condition, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The .mus byte stream is malformed.
    /// Trigger: unknown event-type nibble, cluster byte out of range,
    /// file length not a multiple of 4, or unreadable primer file.
    MalformedInput,

    /// An event or chord ID fell outside its valid index space.
    /// Trigger: encode of a symbol the index space does not contain,
    /// indicating an upstream sampling defect.
    OutOfRangeSymbol,

    /// The primer is too short for the requested priming parameters.
    /// Trigger: priming_length exceeds the primer's token count.
    PrimerTooShort,

    /// Predictor model files not found at the expected path.
    /// Trigger: model.onnx missing from the given model directory.
    ModelNotFound,

    /// Failed to load a predictor model into memory.
    /// Trigger: corrupt file, wrong format, or OOM during load.
    ModelLoadFailed,

    /// Predictor inference failed during generation.
    /// Trigger: session run failure, unexpected output shape, or a
    /// distribution with no probability mass left after masking.
    ModelInferenceFailed,

    /// A generation parameter is outside its valid range.
    /// Trigger: zero n_primes or a non-positive temperature.
    InvalidParameter,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MalformedInput => "MALFORMED_INPUT",
            ErrorCode::OutOfRangeSymbol => "OUT_OF_RANGE_SYMBOL",
            ErrorCode::PrimerTooShort => "PRIMER_TOO_SHORT",
            ErrorCode::ModelNotFound => "MODEL_NOT_FOUND",
            ErrorCode::ModelLoadFailed => "MODEL_LOAD_FAILED",
            ErrorCode::ModelInferenceFailed => "MODEL_INFERENCE_FAILED",
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
        }
    }

    /// Returns a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::MalformedInput => "The .mus byte stream is malformed",
            ErrorCode::OutOfRangeSymbol => "An event or chord ID is outside its valid space",
            ErrorCode::PrimerTooShort => "The primer is too short for the requested priming",
            ErrorCode::ModelNotFound => "Predictor model files not found at expected path",
            ErrorCode::ModelLoadFailed => "Failed to load predictor model into memory",
            ErrorCode::ModelInferenceFailed => "Predictor inference failed during generation",
            ErrorCode::InvalidParameter => "A generation parameter is outside its valid range",
        }
    }

    /// Returns a recovery hint suggesting how to resolve this error.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCode::MalformedInput => {
                "Verify the file is a .mus event log produced by the analyzer; \
                 files must be a sequence of 4-byte quadruples with event-type \
                 nibbles 0-6"
            }
            ErrorCode::OutOfRangeSymbol => {
                "This indicates a predictor or sampling defect, not bad input. \
                 Check that the model's output alphabet matches the index space \
                 (865 events, 25 chords)"
            }
            ErrorCode::PrimerTooShort => {
                "Use a longer priming song, or reduce --priming-length / \
                 --chord-priming-length below the primer's token count"
            }
            ErrorCode::ModelNotFound => {
                "Point --note-model/--chord-model/--volume-model at a directory \
                 containing model.onnx (and optionally config.json)"
            }
            ErrorCode::ModelLoadFailed => {
                "Verify the model file is a valid single-step ONNX export and \
                 that enough memory is available"
            }
            ErrorCode::ModelInferenceFailed => {
                "Check that the model was exported with the expected inputs \
                 (event/chord, h0, c0) and outputs (logits or volume, hn, cn); \
                 if masking removed all probability mass, disable \
                 --single-instrument"
            }
            ErrorCode::InvalidParameter => {
                "Use --n-primes of at least 1 and strictly positive \
                 --temperature / --chord-temperature values"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for engine operations.
#[derive(Debug)]
pub struct Error {
    /// The error code identifying the type of error.
    pub code: ErrorCode,
    /// Human-readable error message with context.
    pub message: String,
    /// Optional underlying cause of the error.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Creates a new Error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new Error with an underlying cause.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a MALFORMED_INPUT error for a bad quadruple, with the byte
    /// offset and the offending bytes.
    pub fn malformed_quadruple(offset: u64, bytes: [u8; 4], detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::MalformedInput,
            format!(
                "{} at byte offset {} (quadruple {:02x} {:02x} {:02x} {:02x})",
                detail.into(),
                offset,
                bytes[0],
                bytes[1],
                bytes[2],
                bytes[3],
            ),
        )
    }

    /// Creates a MALFORMED_INPUT error for a file whose length is not a
    /// multiple of the 4-byte quadruple size.
    pub fn bad_stream_length(path: impl Into<String>, len: u64) -> Self {
        Self::new(
            ErrorCode::MalformedInput,
            format!(
                "{} is {} bytes long, which is not a multiple of 4",
                path.into(),
                len
            ),
        )
    }

    /// Creates a MALFORMED_INPUT error for an unreadable input file.
    pub fn unreadable_input(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::with_source(
            ErrorCode::MalformedInput,
            format!("Cannot read {}", path.into()),
            source,
        )
    }

    /// Creates a MALFORMED_INPUT error for an unwritable output path.
    pub fn unwritable_output(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::with_source(
            ErrorCode::MalformedInput,
            format!("Cannot write {}", path.into()),
            source,
        )
    }

    /// Creates an OUT_OF_RANGE_SYMBOL error for an event ID.
    pub fn event_out_of_range(event: u16, event_count: u16) -> Self {
        Self::new(
            ErrorCode::OutOfRangeSymbol,
            format!(
                "Event ID {} is outside the index space [0, {})",
                event, event_count
            ),
        )
    }

    /// Creates an OUT_OF_RANGE_SYMBOL error for a chord ID.
    pub fn chord_out_of_range(chord: u8) -> Self {
        Self::new(
            ErrorCode::OutOfRangeSymbol,
            format!("Chord ID {} is outside the chord space [0, 25)", chord),
        )
    }

    /// Creates a PRIMER_TOO_SHORT error.
    pub fn primer_too_short(needed: usize, available: usize, what: &str) -> Self {
        Self::new(
            ErrorCode::PrimerTooShort,
            format!(
                "Priming requires {} {} but the primer only has {}",
                needed, what, available
            ),
        )
    }

    /// Creates a MODEL_NOT_FOUND error.
    pub fn model_not_found(path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ModelNotFound,
            format!("Model files not found at: {}", path.into()),
        )
    }

    /// Creates a MODEL_LOAD_FAILED error.
    pub fn model_load_failed(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ModelLoadFailed,
            format!("Failed to load model: {}", reason.into()),
        )
    }

    /// Creates a MODEL_INFERENCE_FAILED error.
    pub fn model_inference_failed(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ModelInferenceFailed,
            format!("Inference failed: {}", reason.into()),
        )
    }

    /// Creates an INVALID_PARAMETER error.
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParameter, reason.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}. Recovery: {}",
            self.code,
            self.message,
            self.code.recovery_hint()
        )
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias using Error.
pub type Result<T> = std::result::Result<T, Error>;
