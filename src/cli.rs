//! CLI argument parser for the generation entry point.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::GenerationParams;

/// musegen: multi-model autoregressive music generation over .mus files
#[derive(Parser, Debug)]
#[command(name = "musegen")]
#[command(about = "Generate .mus music-event streams with chord/note/volume predictors")]
#[command(version)]
pub struct Cli {
    /// Directory of the note predictor model (model.onnx)
    #[arg(long)]
    pub note_model: PathBuf,

    /// Directory of the chord predictor model; when omitted or empty, the
    /// primer's own chords condition the generated notes
    #[arg(long)]
    pub chord_model: Option<PathBuf>,

    /// Directory of the volume predictor model; when omitted or empty,
    /// generated events get a constant volume of 0.5
    #[arg(long)]
    pub volume_model: Option<PathBuf>,

    /// Path to the priming .mus file
    #[arg(long)]
    pub primer: PathBuf,

    /// Number of events primed from the input after the primer replays
    #[arg(long, default_value = "400")]
    pub priming_length: usize,

    /// Number of chords primed from the input for the chord predictor
    #[arg(long, default_value = "20")]
    pub chord_priming_length: usize,

    /// How many times the whole primer is fed forward
    #[arg(long, default_value = "2")]
    pub n_primes: usize,

    /// Maximal length of the generated sequence
    #[arg(long, default_value = "10000")]
    pub max_length: usize,

    /// Maximal length of the generated chord track
    #[arg(long, default_value = "1000")]
    pub chord_max_length: usize,

    /// Temperature -- certainty of the note prediction
    #[arg(long, default_value = "0.95")]
    pub temperature: f64,

    /// Temperature -- certainty of the chord prediction
    #[arg(long, default_value = "1.0")]
    pub chord_temperature: f64,

    /// Filter output to generate only single-instrumental music
    #[arg(long)]
    pub single_instrument: bool,

    /// Folder the generated .mus file is written into
    #[arg(long, default_value = "samples")]
    pub output_folder: PathBuf,

    /// Random seed
    #[arg(long, default_value = "42")]
    pub seed: u64,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// The chord model directory, treating an empty path as disabled.
    pub fn chord_model_dir(&self) -> Option<&Path> {
        self.chord_model
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// The volume model directory, treating an empty path as disabled.
    pub fn volume_model_dir(&self) -> Option<&Path> {
        self.volume_model
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// The generation parameters of this invocation.
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            priming_length: self.priming_length,
            chord_priming_length: self.chord_priming_length,
            n_primes: self.n_primes,
            max_length: self.max_length,
            chord_max_length: self.chord_max_length,
            temperature: self.temperature,
            chord_temperature: self.chord_temperature,
            single_instrument: self.single_instrument,
            seed: self.seed,
        }
    }

    /// Where the generated stream is written: the output folder joined
    /// with the primer's file name.
    pub fn output_path(&self, primer_name: &str) -> PathBuf {
        self.output_folder.join(primer_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(
            ["musegen", "--note-model", "models/note", "--primer", "song.mus"]
                .iter()
                .chain(args)
                .copied(),
        )
        .unwrap()
    }

    #[test]
    fn defaults_match_generation_params_defaults() {
        let cli = parse(&[]);
        let params = cli.params();
        let defaults = GenerationParams::default();
        assert_eq!(params.priming_length, defaults.priming_length);
        assert_eq!(params.chord_priming_length, defaults.chord_priming_length);
        assert_eq!(params.n_primes, defaults.n_primes);
        assert_eq!(params.max_length, defaults.max_length);
        assert_eq!(params.chord_max_length, defaults.chord_max_length);
        assert_eq!(params.temperature, defaults.temperature);
        assert_eq!(params.chord_temperature, defaults.chord_temperature);
        assert_eq!(params.single_instrument, defaults.single_instrument);
        assert_eq!(params.seed, defaults.seed);
    }

    #[test]
    fn optional_models_default_to_disabled() {
        let cli = parse(&[]);
        assert!(cli.chord_model_dir().is_none());
        assert!(cli.volume_model_dir().is_none());
    }

    #[test]
    fn empty_model_path_counts_as_disabled() {
        let cli = parse(&["--chord-model", "", "--volume-model", ""]);
        assert!(cli.chord_model_dir().is_none());
        assert!(cli.volume_model_dir().is_none());
    }

    #[test]
    fn set_models_are_passed_through() {
        let cli = parse(&["--chord-model", "models/chord", "--volume-model", "models/volume"]);
        assert_eq!(
            cli.chord_model_dir(),
            Some(Path::new("models/chord"))
        );
        assert_eq!(
            cli.volume_model_dir(),
            Some(Path::new("models/volume"))
        );
    }

    #[test]
    fn output_path_joins_folder_and_primer_name() {
        let cli = parse(&["--output-folder", "out"]);
        assert_eq!(cli.output_path("song.mus"), PathBuf::from("out/song.mus"));
    }

    #[test]
    fn required_arguments_are_enforced() {
        assert!(Cli::try_parse_from(["musegen"]).is_err());
        assert!(Cli::try_parse_from(["musegen", "--note-model", "models/note"]).is_err());
    }
}
