//! .mus byte-stream handling.
//!
//! A .mus file is a headerless sequence of 4-byte quadruples; its length
//! must be a multiple of 4. [`MusFile`] loads a file once and exposes the
//! three parallel token streams the predictors consume; [`write_mus`]
//! encodes a generated triple sequence back to bytes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codec::chords::derive_chord_track;
use crate::codec::index_space::IndexSpace;
use crate::codec::quadruple::{encode, DecodedEvent, Quadruple};
use crate::error::{Error, Result};
use crate::generation::GeneratedEvent;

/// Volume sentinel for events that carry no velocity.
pub const NO_VOLUME: f32 = -1.0;

/// A loaded .mus file.
#[derive(Debug)]
pub struct MusFile {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl MusFile {
    /// Reads a .mus file, enforcing the 4-byte framing contract.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|e| Error::unreadable_input(path.display().to_string(), e))?;

        if bytes.len() % 4 != 0 {
            return Err(Error::bad_stream_length(
                path.display().to_string(),
                bytes.len() as u64,
            ));
        }

        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }

    /// The path this file was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the source, used to name generated output.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("output.mus")
    }

    /// Number of quadruples in the file.
    pub fn event_len(&self) -> usize {
        self.bytes.len() / 4
    }

    /// Iterates the raw quadruples of the file.
    pub fn quadruples(&self) -> impl Iterator<Item = Quadruple> + '_ {
        self.bytes
            .chunks_exact(4)
            .map(|c| Quadruple([c[0], c[1], c[2], c[3]]))
    }

    /// Decodes every quadruple, failing on the first malformed one with its
    /// byte offset.
    pub fn decode(&self) -> Result<Vec<DecodedEvent>> {
        self.quadruples()
            .enumerate()
            .map(|(i, q)| DecodedEvent::decode(q, (i * 4) as u64))
            .collect()
    }

    /// The event-ID stream paired with the carried-forward chord tag, one
    /// entry per quadruple. The chord column holds the most recent
    /// time-shift tag (initially 0), which is what the note predictor is
    /// conditioned on during training and priming.
    pub fn events(&self) -> Result<Vec<(u16, u8)>> {
        let space = IndexSpace::get();
        let mut chord: u8 = 0;
        let mut out = Vec::with_capacity(self.event_len());
        for event in self.decode()? {
            if let Some(tag) = event.chord_tag() {
                chord = tag;
            }
            out.push((event.event_id(space), chord));
        }
        Ok(out)
    }

    /// The beat-quantized chord track of the file.
    pub fn chord_track(&self) -> Result<Vec<u8>> {
        Ok(derive_chord_track(self.decode()?))
    }

    /// The event-ID stream paired with per-event volume, one entry per
    /// quadruple. Events without a velocity get [`NO_VOLUME`].
    pub fn volumes(&self) -> Result<Vec<(u16, f32)>> {
        let space = IndexSpace::get();
        Ok(self
            .decode()?
            .into_iter()
            .map(|event| (event.event_id(space), event.volume().unwrap_or(NO_VOLUME)))
            .collect())
    }
}

/// Encodes a generated triple sequence and writes it as a .mus file.
pub fn write_mus(path: impl AsRef<Path>, events: &[GeneratedEvent]) -> Result<()> {
    let path = path.as_ref();
    let space = IndexSpace::get();

    let mut bytes = Vec::with_capacity(events.len() * 4);
    for event in events {
        let q = encode(event.event, event.chord, event.volume, space)?;
        bytes.extend_from_slice(&q.0);
    }

    let mut file = fs::File::create(path)
        .map_err(|e| Error::unwritable_output(path.display().to_string(), e))?;
    file.write_all(&bytes)
        .map_err(|e| Error::unwritable_output(path.display().to_string(), e))?;

    Ok(())
}
