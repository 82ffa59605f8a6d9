//! Quadruple decode/encode for the .mus binary format.
//!
//! A quadruple is the atomic 4-byte unit of the format. The low nibble of
//! byte 0 selects one of seven event types; bytes 1-3 are type-dependent.
//! Decoding turns a quadruple into a [`DecodedEvent`]; encoding is the
//! exact inverse, mapping an (event ID, chord, volume) triple back to four
//! bytes.

use crate::codec::index_space::{IndexSpace, CHORD_COUNT, NUM_CLUSTERS, PERCUSSION_CLUSTER};
use crate::error::{Error, Result};

/// The fixed 4-byte atomic unit of the .mus format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quadruple(pub [u8; 4]);

/// A quadruple interpreted against the event-type table.
///
/// Every wire-level event type maps to exactly one variant; the unknown
/// nibble case is rejected at decode time so downstream matching is
/// exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedEvent {
    /// Note-on with velocity. Melodic clusters use wire type 0, the
    /// percussion cluster type 2.
    NoteOn {
        cluster: usize,
        pitch: u8,
        velocity: u8,
    },
    /// Note-off. Melodic clusters use wire type 1, percussion type 3.
    NoteOff { cluster: usize, pitch: u8 },
    /// Time-shift of +1 tick, carrying a chord tag.
    SmallShift { chord: u8 },
    /// Time-shift of +6 ticks, carrying a chord tag.
    LargeShift { chord: u8 },
    /// End marker / no-op.
    EndMarker,
}

impl DecodedEvent {
    /// Decodes one quadruple. `offset` is the byte offset of the quadruple
    /// in its stream, used only for error reporting.
    pub fn decode(q: Quadruple, offset: u64) -> Result<Self> {
        let [b0, b1, b2, b3] = q.0;
        match b0 & 0x0f {
            0 => {
                let cluster = (b0 >> 4) as usize;
                if cluster >= NUM_CLUSTERS {
                    return Err(Error::malformed_quadruple(
                        offset,
                        q.0,
                        format!("Note-on cluster {} out of range", cluster),
                    ));
                }
                Ok(DecodedEvent::NoteOn {
                    cluster,
                    pitch: b1,
                    velocity: b2,
                })
            }
            1 => {
                let cluster = b2 as usize;
                if cluster >= NUM_CLUSTERS {
                    return Err(Error::malformed_quadruple(
                        offset,
                        q.0,
                        format!("Note-off cluster {} out of range", cluster),
                    ));
                }
                Ok(DecodedEvent::NoteOff { cluster, pitch: b1 })
            }
            2 => Ok(DecodedEvent::NoteOn {
                cluster: PERCUSSION_CLUSTER,
                pitch: b1,
                velocity: b2,
            }),
            3 => Ok(DecodedEvent::NoteOff {
                cluster: PERCUSSION_CLUSTER,
                pitch: b1,
            }),
            4 | 5 => {
                if (b3 as usize) >= CHORD_COUNT {
                    return Err(Error::malformed_quadruple(
                        offset,
                        q.0,
                        format!("Chord tag {} out of range", b3),
                    ));
                }
                if b0 & 0x0f == 4 {
                    Ok(DecodedEvent::SmallShift { chord: b3 })
                } else {
                    Ok(DecodedEvent::LargeShift { chord: b3 })
                }
            }
            6 => Ok(DecodedEvent::EndMarker),
            t => Err(Error::malformed_quadruple(
                offset,
                q.0,
                format!("Unknown event type {}", t),
            )),
        }
    }

    /// The event ID this quadruple occupies in the index space.
    pub fn event_id(&self, space: &IndexSpace) -> u16 {
        match *self {
            DecodedEvent::NoteOn { cluster, pitch, .. } => {
                space.note_on_base(cluster) + pitch as u16
            }
            DecodedEvent::NoteOff { cluster, pitch } => {
                space.note_off_base(cluster) + pitch as u16
            }
            DecodedEvent::SmallShift { .. } => space.small_shift_event(),
            DecodedEvent::LargeShift { .. } => space.large_shift_event(),
            DecodedEvent::EndMarker => space.end_marker_event(),
        }
    }

    /// The chord tag carried by this quadruple, if any. Only time-shifts
    /// carry tags.
    pub fn chord_tag(&self) -> Option<u8> {
        match *self {
            DecodedEvent::SmallShift { chord } | DecodedEvent::LargeShift { chord } => Some(chord),
            _ => None,
        }
    }

    /// The volume of this quadruple in [0, 1], if it has one. Only note-ons
    /// carry a velocity.
    pub fn volume(&self) -> Option<f32> {
        match *self {
            DecodedEvent::NoteOn { velocity, .. } => Some(velocity as f32 / 255.0),
            _ => None,
        }
    }

    /// Tick advance caused by this quadruple.
    pub fn tick_advance(&self) -> u64 {
        match *self {
            DecodedEvent::SmallShift { .. } => 1,
            DecodedEvent::LargeShift { .. } => 6,
            _ => 0,
        }
    }
}

/// Quantizes a volume in [0, 1] to a velocity byte.
///
/// Floor-quantized via multiplication and truncation; the f64-to-u8 cast
/// saturates, so values at or above 1.0 yield 255 and negatives yield 0.
/// The result is never 256.
fn quantize_velocity(volume: f32) -> u8 {
    (volume as f64 * 255.999_999_99) as u8
}

/// Encodes an (event ID, chord, volume) triple into a quadruple.
///
/// The exact inverse of decode: note-on/off clusters are recovered by a
/// linear scan over the base table, the percussion cluster switches to its
/// asymmetric wire types, and the three scalar events carry the chord tag
/// (time-shifts) or zeros (end marker).
pub fn encode(event: u16, chord: u8, volume: f32, space: &IndexSpace) -> Result<Quadruple> {
    if let Some(cluster) = space.note_on_cluster(event) {
        let pitch = (event - space.note_on_base(cluster)) as u8;
        let b0 = if cluster == PERCUSSION_CLUSTER {
            2
        } else {
            (cluster as u8) << 4
        };
        return Ok(Quadruple([b0, pitch, quantize_velocity(volume), 0]));
    }

    if let Some(cluster) = space.note_off_cluster(event) {
        let pitch = (event - space.note_off_base(cluster)) as u8;
        let (b0, b2) = if cluster == PERCUSSION_CLUSTER {
            (3, 0)
        } else {
            (1, cluster as u8)
        };
        return Ok(Quadruple([b0, pitch, b2, 0]));
    }

    if event == space.small_shift_event() || event == space.large_shift_event() {
        if (chord as usize) >= CHORD_COUNT {
            return Err(Error::chord_out_of_range(chord));
        }
        let b0 = if event == space.small_shift_event() { 4 } else { 5 };
        return Ok(Quadruple([b0, 0, 0, chord]));
    }

    if event == space.end_marker_event() {
        return Ok(Quadruple([6, 0, 0, 0]));
    }

    Err(Error::event_out_of_range(event, space.event_count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn space() -> &'static IndexSpace {
        IndexSpace::get()
    }

    #[test]
    fn decode_melodic_note_on() {
        // Note-on, cluster 0, pitch 60, velocity 100.
        let q = Quadruple([0x00, 0x3c, 0x64, 0x00]);
        let event = DecodedEvent::decode(q, 0).unwrap();
        assert_eq!(event.event_id(space()), space().note_on_base(0) + 60);
        assert_eq!(event.chord_tag(), None);
        assert_eq!(event.volume(), Some(100.0 / 255.0));
        assert_eq!(event.tick_advance(), 0);
    }

    #[test]
    fn decode_melodic_note_off_takes_cluster_from_byte_2() {
        let q = Quadruple([0x01, 0x10, 0x03, 0x00]);
        let event = DecodedEvent::decode(q, 0).unwrap();
        assert_eq!(
            event,
            DecodedEvent::NoteOff {
                cluster: 3,
                pitch: 0x10
            }
        );
        assert_eq!(event.event_id(space()), space().note_off_base(3) + 0x10);
        assert_eq!(event.volume(), None);
    }

    #[test]
    fn decode_percussion_ignores_high_nibble() {
        let q = Quadruple([0x72, 0x05, 0x40, 0x00]);
        let event = DecodedEvent::decode(q, 0).unwrap();
        assert_eq!(
            event,
            DecodedEvent::NoteOn {
                cluster: PERCUSSION_CLUSTER,
                pitch: 5,
                velocity: 0x40
            }
        );
    }

    #[test]
    fn decode_time_shifts_carry_chord_and_ticks() {
        let small = DecodedEvent::decode(Quadruple([0x04, 0x00, 0x00, 0x05]), 0).unwrap();
        assert_eq!(small.event_id(space()), space().other_base());
        assert_eq!(small.chord_tag(), Some(5));
        assert_eq!(small.tick_advance(), 1);

        let large = DecodedEvent::decode(Quadruple([0x05, 0x00, 0x00, 0x18]), 0).unwrap();
        assert_eq!(large.event_id(space()), space().other_base() + 1);
        assert_eq!(large.chord_tag(), Some(24));
        assert_eq!(large.tick_advance(), 6);
    }

    #[test]
    fn decode_end_marker() {
        let event = DecodedEvent::decode(Quadruple([0x06, 0x00, 0x00, 0x00]), 0).unwrap();
        assert_eq!(event, DecodedEvent::EndMarker);
        assert_eq!(event.event_id(space()), space().other_base() + 2);
        assert_eq!(event.tick_advance(), 0);
    }

    #[test]
    fn decode_unknown_type_fails_with_offset() {
        let err = DecodedEvent::decode(Quadruple([0x0f, 0x00, 0x00, 0x00]), 44).unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedInput);
        assert!(err.message.contains("offset 44"));
    }

    #[test]
    fn decode_note_off_cluster_out_of_range_fails() {
        let err = DecodedEvent::decode(Quadruple([0x01, 0x10, 0x0b, 0x00]), 8).unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedInput);
        assert!(err.message.contains("offset 8"));
    }

    #[test]
    fn decode_melodic_note_on_cluster_out_of_range_fails() {
        // High nibble 0xb = cluster 11, one past the last cluster.
        let err = DecodedEvent::decode(Quadruple([0xb0, 0x10, 0x20, 0x00]), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedInput);
    }

    #[test]
    fn encode_small_shift_scenario() {
        let q = encode(space().other_base(), 5, 0.0, space()).unwrap();
        assert_eq!(q, Quadruple([0x04, 0x00, 0x00, 0x05]));
    }

    #[test]
    fn encode_rejects_out_of_range_event() {
        let err = encode(space().event_count(), 0, 0.0, space()).unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfRangeSymbol);
    }

    #[test]
    fn encode_rejects_out_of_range_chord() {
        let err = encode(space().small_shift_event(), 25, 0.0, space()).unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfRangeSymbol);
    }

    #[test]
    fn velocity_quantization_never_overflows() {
        assert_eq!(quantize_velocity(0.0), 0);
        assert_eq!(quantize_velocity(1.0), 255);
        assert_eq!(quantize_velocity(1.5), 255);
        assert_eq!(quantize_velocity(-0.25), 0);
        // 100/255 decodes to ~0.392; re-quantizing recovers 100 exactly.
        assert_eq!(quantize_velocity(100.0 / 255.0), 100);
    }

    #[test]
    fn round_trip_all_valid_quadruple_shapes() {
        let space = space();
        let cases = [
            Quadruple([0x00, 0x30, 0x7f, 0x00]), // melodic note-on, cluster 0
            Quadruple([0xa0, 0x29, 0x01, 0x00]), // melodic note-on, cluster 10
            Quadruple([0x02, 0x2f, 0xff, 0x00]), // percussion note-on
            Quadruple([0x01, 0x21, 0x04, 0x00]), // melodic note-off
            Quadruple([0x03, 0x00, 0x00, 0x00]), // percussion note-off
            Quadruple([0x04, 0x00, 0x00, 0x17]), // small shift
            Quadruple([0x05, 0x00, 0x00, 0x00]), // large shift
            Quadruple([0x06, 0x00, 0x00, 0x00]), // end marker
        ];

        for q in cases {
            let decoded = DecodedEvent::decode(q, 0).unwrap();
            let event = decoded.event_id(space);
            let chord = decoded.chord_tag().unwrap_or(0);
            let volume = decoded.volume().unwrap_or(0.0);
            let encoded = encode(event, chord, volume, space).unwrap();
            assert_eq!(encoded, q, "round trip failed for {:?}", q);
        }
    }
}
