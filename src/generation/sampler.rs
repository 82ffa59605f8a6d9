//! Temperature sampling over predictor logits.
//!
//! Logits are divided by the temperature and exponentiated into sampling
//! weights, optionally masked, then drawn from with a weighted index. One
//! seeded RNG is shared by every categorical draw of a run, so a fixed
//! seed reproduces the run exactly.

use ndarray::Array1;
use rand::distributions::{Distribution, WeightedIndex};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::codec::IndexSpace;
use crate::error::{Error, Result};

/// Weighted categorical sampler with a reproducible RNG.
pub struct Sampler {
    rng: ChaCha8Rng,
}

impl Sampler {
    /// Creates a sampler seeded for reproducible generation.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws one index from `exp(logits / temperature)`.
    pub fn sample(&mut self, logits: &Array1<f32>, temperature: f64) -> Result<usize> {
        self.sample_masked(logits, temperature, |_| true)
    }

    /// Draws one index from `exp(logits / temperature)`, keeping only
    /// indices `keep` admits.
    ///
    /// Weights are computed in f64, shifted by the largest kept logit
    /// before exponentiation, an identity after normalization that keeps
    /// `exp` in range.
    pub fn sample_masked(
        &mut self,
        logits: &Array1<f32>,
        temperature: f64,
        keep: impl Fn(usize) -> bool,
    ) -> Result<usize> {
        let scaled: Vec<Option<f64>> = logits
            .iter()
            .enumerate()
            .map(|(i, &l)| keep(i).then(|| l as f64 / temperature))
            .collect();

        let max = scaled
            .iter()
            .flatten()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(Error::model_inference_failed(
                "No probability mass left after masking",
            ));
        }

        let weights: Vec<f64> = scaled
            .iter()
            .map(|s| s.map_or(0.0, |v| (v - max).exp()))
            .collect();

        let distribution = WeightedIndex::new(&weights).map_err(|e| {
            Error::model_inference_failed(format!("Invalid sampling distribution: {}", e))
        })?;

        Ok(distribution.sample(&mut self.rng))
    }
}

/// Event mask confining note events to one instrument cluster.
///
/// Note-ons are confined to the cluster's own note-on range, note-offs to
/// its note-off range; the three scalar events stay admissible so time can
/// still advance and the stream can still end.
#[derive(Debug, Clone, Copy)]
pub struct ClusterMask {
    on_lo: usize,
    on_hi: usize,
    off_lo: usize,
    off_hi: usize,
    other_lo: usize,
}

impl ClusterMask {
    /// Builds the mask for `cluster`.
    pub fn for_cluster(space: &IndexSpace, cluster: usize) -> Self {
        Self {
            on_lo: space.note_on_base(cluster) as usize,
            on_hi: space.note_on_base(cluster + 1) as usize,
            off_lo: space.note_off_base(cluster) as usize,
            off_hi: space.note_off_base(cluster + 1) as usize,
            other_lo: space.other_base() as usize,
        }
    }

    /// Whether `event` may keep probability mass under this mask.
    pub fn allows(&self, event: usize) -> bool {
        (self.on_lo..self.on_hi).contains(&event)
            || (self.off_lo..self.off_hi).contains(&event)
            || event >= self.other_lo
    }
}
