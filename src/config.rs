//! Generation run configuration.
//!
//! The shared control parameters of one generation run, mirroring the
//! generation entry point's CLI surface. Defaults match the reference
//! models' generation settings.

use serde::{Deserialize, Serialize};

/// Control parameters shared by the three generation passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Warm-up steps fed from the primer after the `n_primes`-fold replay,
    /// for the note and volume passes.
    pub priming_length: usize,

    /// Warm-up steps after the replay for the chord pass.
    pub chord_priming_length: usize,

    /// How many times the whole primer is fed forward before warm-up
    /// accounting starts.
    pub n_primes: usize,

    /// Hard cap on generated note steps beyond full priming.
    pub max_length: usize,

    /// Hard cap on generated chord steps beyond full priming.
    pub chord_max_length: usize,

    /// Note sampling temperature; logits are divided by this before
    /// exponentiation.
    pub temperature: f64,

    /// Chord sampling temperature.
    pub chord_temperature: f64,

    /// Confine note events to the first observed instrument cluster.
    pub single_instrument: bool,

    /// Seed of the run's shared RNG.
    pub seed: u64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            priming_length: 400,
            chord_priming_length: 20,
            n_primes: 2,
            max_length: 10_000,
            chord_max_length: 1_000,
            temperature: 0.95,
            chord_temperature: 1.0,
            single_instrument: false,
            seed: 42,
        }
    }
}

impl GenerationParams {
    /// Validates the parameters for consistency.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        if self.n_primes == 0 {
            return Some("n_primes must be at least 1".to_string());
        }
        if !(self.temperature > 0.0) {
            return Some(format!("temperature must be > 0, got {}", self.temperature));
        }
        if !(self.chord_temperature > 0.0) {
            return Some(format!(
                "chord_temperature must be > 0, got {}",
                self.chord_temperature
            ));
        }
        None
    }
}
