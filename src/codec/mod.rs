//! Music event codec for the .mus binary format.
//!
//! This module owns the translation between raw bytes and the symbolic
//! token streams the predictors operate on:
//! - [`index_space`]: the flat event-ID layout over instrument clusters
//! - [`quadruple`]: per-quadruple decode/encode
//! - [`chords`]: beat-quantized chord track derivation
//! - [`stream`]: whole-file reading and writing

pub mod chords;
pub mod index_space;
pub mod quadruple;
pub mod stream;

// Re-export commonly used items
pub use chords::{derive_chord_track, TICKS_PER_BEAT};
pub use index_space::{IndexSpace, CHORD_COUNT, NUM_CLUSTERS, PERCUSSION_CLUSTER, STOP_CHORD};
pub use quadruple::{encode, DecodedEvent, Quadruple};
pub use stream::{write_mus, MusFile, NO_VOLUME};
