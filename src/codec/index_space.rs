//! Event index space for the .mus symbol alphabet.
//!
//! Note-on and note-off events for all instrument clusters share one flat
//! integer space, followed by three scalar events (small time-shift, large
//! time-shift, end marker). The layout is a prefix sum over the fixed
//! cluster pitch-range widths: note-on bases first, note-off bases after.

use std::sync::OnceLock;

/// Number of instrument clusters.
pub const NUM_CLUSTERS: usize = 11;

/// Pitch-range width of each instrument cluster.
pub const CLUSTER_WIDTHS: [u16; NUM_CLUSTERS] = [49, 34, 42, 27, 42, 27, 41, 37, 42, 48, 42];

/// Cluster reserved for the percussion channel.
///
/// Percussion uses its own quadruple types on the wire (2/3 instead of 0/1)
/// but occupies an ordinary slice of the index space.
pub const PERCUSSION_CLUSTER: usize = 9;

/// Number of scalar events after the note-on/off span:
/// small time-shift, large time-shift, end marker.
pub const OTHER_EVENTS: u16 = 3;

/// Size of the chord alphabet. IDs 0-23 are chord symbols, 24 is the stop
/// sentinel.
pub const CHORD_COUNT: usize = 25;

/// Chord ID signaling stream termination.
pub const STOP_CHORD: u8 = 24;

/// Immutable lookup over the event index space.
///
/// `base[0..NUM_CLUSTERS]` are the note-on bases, `base[NUM_CLUSTERS..2N]`
/// the note-off bases, and `base[2N]` the total note-on+note-off span.
#[derive(Debug)]
pub struct IndexSpace {
    base: [u16; 2 * NUM_CLUSTERS + 1],
}

impl IndexSpace {
    /// Returns the process-wide index space, computing it on first use.
    pub fn get() -> &'static IndexSpace {
        static SPACE: OnceLock<IndexSpace> = OnceLock::new();
        SPACE.get_or_init(IndexSpace::build)
    }

    fn build() -> Self {
        let mut base = [0u16; 2 * NUM_CLUSTERS + 1];
        for i in 1..=NUM_CLUSTERS {
            base[i] = base[i - 1] + CLUSTER_WIDTHS[i - 1];
        }
        for i in 1..=NUM_CLUSTERS {
            base[NUM_CLUSTERS + i] = base[NUM_CLUSTERS + i - 1] + CLUSTER_WIDTHS[i - 1];
        }
        Self { base }
    }

    /// First event ID of `cluster`'s note-on range.
    ///
    /// `cluster == NUM_CLUSTERS` is valid and yields the end of the note-on
    /// span (which equals `note_off_base(0)`).
    pub fn note_on_base(&self, cluster: usize) -> u16 {
        self.base[cluster]
    }

    /// First event ID of `cluster`'s note-off range.
    ///
    /// `cluster == NUM_CLUSTERS` is valid and yields the end of the
    /// note-off span (which equals `other_base()`).
    pub fn note_off_base(&self, cluster: usize) -> u16 {
        self.base[NUM_CLUSTERS + cluster]
    }

    /// First event ID after the note-on/off span; base of the three scalar
    /// events.
    pub fn other_base(&self) -> u16 {
        self.base[2 * NUM_CLUSTERS]
    }

    /// Total number of event IDs.
    pub fn event_count(&self) -> u16 {
        self.other_base() + OTHER_EVENTS
    }

    /// Size of the chord alphabet.
    pub fn chord_count(&self) -> usize {
        CHORD_COUNT
    }

    /// Event ID of the small (+1 tick) time-shift.
    pub fn small_shift_event(&self) -> u16 {
        self.other_base()
    }

    /// Event ID of the large (+6 ticks) time-shift.
    pub fn large_shift_event(&self) -> u16 {
        self.other_base() + 1
    }

    /// Event ID of the end marker.
    pub fn end_marker_event(&self) -> u16 {
        self.other_base() + 2
    }

    /// Cluster owning a note-on event ID, or None if `event` is not a
    /// note-on. Linear scan over the bases.
    pub fn note_on_cluster(&self, event: u16) -> Option<usize> {
        if event >= self.note_off_base(0) {
            return None;
        }
        (1..=NUM_CLUSTERS)
            .find(|&i| event < self.note_on_base(i))
            .map(|i| i - 1)
    }

    /// Cluster owning a note-off event ID, or None if `event` is not a
    /// note-off.
    pub fn note_off_cluster(&self, event: u16) -> Option<usize> {
        if event < self.note_off_base(0) || event >= self.other_base() {
            return None;
        }
        (1..=NUM_CLUSTERS)
            .find(|&i| event < self.note_off_base(i))
            .map(|i| i - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_count_matches_width_sum() {
        let space = IndexSpace::get();
        let total: u16 = CLUSTER_WIDTHS.iter().sum();
        assert_eq!(space.other_base(), 2 * total);
        assert_eq!(space.event_count(), 2 * total + 3);
        assert_eq!(space.event_count(), 865);
    }

    #[test]
    fn note_on_bases_are_prefix_sums() {
        let space = IndexSpace::get();
        assert_eq!(space.note_on_base(0), 0);
        let mut sum = 0u16;
        for c in 0..NUM_CLUSTERS {
            assert_eq!(space.note_on_base(c), sum);
            sum += CLUSTER_WIDTHS[c];
        }
        assert_eq!(space.note_on_base(NUM_CLUSTERS), sum);
    }

    #[test]
    fn note_off_bases_continue_the_recurrence() {
        let space = IndexSpace::get();
        let on_span = space.note_on_base(NUM_CLUSTERS);
        assert_eq!(space.note_off_base(0), on_span);
        let mut prefix = 0u16;
        for c in 0..NUM_CLUSTERS {
            assert_eq!(space.note_off_base(c), on_span + prefix);
            prefix += CLUSTER_WIDTHS[c];
        }
    }

    #[test]
    fn chord_count_is_25() {
        assert_eq!(IndexSpace::get().chord_count(), 25);
        assert_eq!(STOP_CHORD, 24);
    }

    #[test]
    fn cluster_recovery_roundtrips() {
        let space = IndexSpace::get();
        for c in 0..NUM_CLUSTERS {
            let first_on = space.note_on_base(c);
            let last_on = space.note_on_base(c + 1) - 1;
            assert_eq!(space.note_on_cluster(first_on), Some(c));
            assert_eq!(space.note_on_cluster(last_on), Some(c));

            let first_off = space.note_off_base(c);
            let last_off = space.note_off_base(c + 1) - 1;
            assert_eq!(space.note_off_cluster(first_off), Some(c));
            assert_eq!(space.note_off_cluster(last_off), Some(c));
        }
    }

    #[test]
    fn cluster_recovery_rejects_other_ranges() {
        let space = IndexSpace::get();
        assert_eq!(space.note_on_cluster(space.note_off_base(0)), None);
        assert_eq!(space.note_off_cluster(0), None);
        assert_eq!(space.note_off_cluster(space.other_base()), None);
    }
}
