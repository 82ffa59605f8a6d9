//! musegen: multi-model autoregressive music generation over .mus files.
//!
//! Primes up to three predictors (chord, note, volume) on a .mus song,
//! samples a new event stream, and writes it back out in .mus format.

use std::time::Instant;

use musegen::cli::Cli;
use musegen::codec::{write_mus, MusFile};
use musegen::error::Result;
use musegen::generation::{generate, Primer};
use musegen::models::PredictorSet;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();

    eprintln!("=== musegen ===");
    eprintln!("Primer: {}", cli.primer.display());
    eprintln!("Note model: {}", cli.note_model.display());
    match cli.chord_model_dir() {
        Some(dir) => eprintln!("Chord model: {}", dir.display()),
        None => eprintln!("Chord model: disabled (reusing primer chords)"),
    }
    match cli.volume_model_dir() {
        Some(dir) => eprintln!("Volume model: {}", dir.display()),
        None => eprintln!("Volume model: disabled (constant volume)"),
    }
    eprintln!("Seed: {}", cli.seed);
    eprintln!();

    let file = MusFile::open(&cli.primer)?;
    let primer = Primer::from_file(&file)?;
    eprintln!(
        "Primer decoded: {} events, {} chord beats.",
        primer.events.len(),
        primer.chord_track.len()
    );

    let mut predictors = PredictorSet::load(
        &cli.note_model,
        cli.chord_model_dir(),
        cli.volume_model_dir(),
    )?;
    eprintln!();

    let params = cli.params();
    let start_time = Instant::now();
    let result = generate(&mut predictors, &primer, &params)?;
    let generation_time = start_time.elapsed();

    eprintln!();
    eprintln!("Generation complete!");
    eprintln!("  Time: {:.2}s", generation_time.as_secs_f32());
    eprintln!("  Events: {}", result.len());
    eprintln!();

    std::fs::create_dir_all(&cli.output_folder).map_err(|e| {
        musegen::error::Error::unwritable_output(cli.output_folder.display().to_string(), e)
    })?;
    let output_path = cli.output_path(file.file_name());
    write_mus(&output_path, &result)?;
    eprintln!("Saved to: {}", output_path.display());

    Ok(())
}
