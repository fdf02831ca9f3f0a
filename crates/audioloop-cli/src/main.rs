//! audioloop - drive an external synthesis interpreter and hear with
//! numbers.
//!
//! Renders synthesis scripts to WAV offline, analyzes the result into
//! spectral/temporal/stereo/psychoacoustic features, compares iterations,
//! and rolls the whole loop into a single `iterate` call.
//!
//! Exit codes: 0 success, 1 content error (synthesis or analysis of the
//! input failed), 2 system error (interpreter missing, input file missing,
//! IO failure).

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use audioloop_cli::commands;

/// Render-and-analyze feedback loop for offline audio synthesis.
#[derive(Parser)]
#[command(name = "audioloop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a synthesis script to a WAV file
    Render {
        /// Script to render (.scd); a bare `{ ... }` function is wrapped
        /// automatically
        file: String,

        /// Output WAV path (default: input filename with .wav extension)
        #[arg(short, long)]
        output: Option<String>,

        /// Duration in seconds (required for the bare-function form)
        #[arg(short, long)]
        duration: Option<f64>,

        /// Timeout in seconds for the render
        #[arg(short, long, default_value_t = 120.0)]
        timeout: f64,

        /// Output machine-readable JSON
        #[arg(short, long)]
        json: bool,

        /// Include the interpreter console output
        #[arg(long)]
        verbose: bool,
    },

    /// Analyze a WAV file and extract acoustic features
    Analyze {
        /// WAV file to analyze
        file: String,

        /// Skip psychoacoustic metrics (faster)
        #[arg(long)]
        no_psychoacoustic: bool,

        /// Also write a spectrogram PNG to this path
        #[arg(long)]
        spectrogram: Option<String>,

        /// Output machine-readable JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Compare two audio files and show feature deltas
    Compare {
        /// First audio file (baseline)
        file_a: String,

        /// Second audio file (comparison)
        file_b: String,

        /// Percent-change magnitude that counts as significant
        #[arg(long)]
        threshold: Option<f64>,

        /// Skip psychoacoustic metrics
        #[arg(long)]
        no_psychoacoustic: bool,

        /// Output machine-readable JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Render, analyze, and optionally play in one call
    Iterate {
        /// Script to render (.scd)
        file: String,

        /// Output WAV path (default: a scratch file removed afterwards)
        #[arg(short, long)]
        output: Option<String>,

        /// Duration in seconds (required for the bare-function form)
        #[arg(short, long)]
        duration: Option<f64>,

        /// Timeout in seconds for the render
        #[arg(short, long, default_value_t = 120.0)]
        timeout: f64,

        /// Skip psychoacoustic metrics (faster)
        #[arg(long)]
        no_psychoacoustic: bool,

        /// Also write a spectrogram PNG to this path
        #[arg(long)]
        spectrogram: Option<String>,

        /// Play the rendered audio after analysis
        #[arg(long)]
        play: bool,

        /// Keep the rendered WAV (next to the input) when no --output is
        /// given
        #[arg(long)]
        keep: bool,

        /// Output machine-readable JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Play an audio file through the system player
    Play {
        /// Audio file to play (WAV)
        file: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            file,
            output,
            duration,
            timeout,
            json,
            verbose,
        } => commands::render::run(&file, output.as_deref(), duration, timeout, json, verbose),
        Commands::Analyze {
            file,
            no_psychoacoustic,
            spectrogram,
            json,
        } => commands::analyze::run(&file, no_psychoacoustic, spectrogram.as_deref(), json),
        Commands::Compare {
            file_a,
            file_b,
            threshold,
            no_psychoacoustic,
            json,
        } => commands::compare::run(&file_a, &file_b, threshold, no_psychoacoustic, json),
        Commands::Iterate {
            file,
            output,
            duration,
            timeout,
            no_psychoacoustic,
            spectrogram,
            play,
            keep,
            json,
        } => commands::iterate::run(&commands::iterate::IterateArgs {
            file: &file,
            output: output.as_deref(),
            duration,
            timeout_sec: timeout,
            skip_perceptual: no_psychoacoustic,
            spectrogram: spectrogram.as_deref(),
            play,
            keep,
            json,
        }),
        Commands::Play { file } => commands::play::run(&file),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e}", colored::Colorize::red("error"));
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_render_with_duration() {
        let cli = Cli::try_parse_from([
            "audioloop",
            "render",
            "patch.scd",
            "--duration",
            "2.5",
            "-o",
            "out.wav",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                file,
                output,
                duration,
                timeout,
                json,
                verbose,
            } => {
                assert_eq!(file, "patch.scd");
                assert_eq!(output.as_deref(), Some("out.wav"));
                assert_eq!(duration, Some(2.5));
                assert_eq!(timeout, 120.0);
                assert!(!json);
                assert!(!verbose);
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn parses_compare_with_threshold() {
        let cli = Cli::try_parse_from([
            "audioloop",
            "compare",
            "a.wav",
            "b.wav",
            "--threshold",
            "5",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Compare {
                file_a,
                file_b,
                threshold,
                json,
                ..
            } => {
                assert_eq!(file_a, "a.wav");
                assert_eq!(file_b, "b.wav");
                assert_eq!(threshold, Some(5.0));
                assert!(json);
            }
            _ => panic!("expected compare command"),
        }
    }

    #[test]
    fn parses_iterate_with_play_and_spectrogram() {
        let cli = Cli::try_parse_from([
            "audioloop",
            "iterate",
            "patch.scd",
            "--duration",
            "1",
            "--play",
            "--spectrogram",
            "spec.png",
        ])
        .unwrap();
        match cli.command {
            Commands::Iterate {
                file,
                play,
                spectrogram,
                keep,
                ..
            } => {
                assert_eq!(file, "patch.scd");
                assert!(play);
                assert_eq!(spectrogram.as_deref(), Some("spec.png"));
                assert!(!keep);
            }
            _ => panic!("expected iterate command"),
        }
    }
}
