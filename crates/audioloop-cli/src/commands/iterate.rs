//! Iterate command: render, analyze, and optionally play in one call.
//!
//! This exists because the feedback loop is dominated by round trips, not
//! by any single computation: one invocation hands back the render outcome
//! and the analysis of the result together.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use audioloop_analysis::{
    analyze_with_options, AnalysisError, AnalysisOptions, AnalysisResult,
};
use audioloop_render::{render, RenderRequest, RenderResult};

use crate::output::print_analysis_human;
use crate::play::play_file;

/// Combined outcome of one iteration.
#[derive(Debug, Serialize)]
pub struct IterateOutcome {
    /// True when both the render and the analysis succeeded.
    pub success: bool,
    pub render: RenderResult,
    /// Present when the render succeeded and the output was analyzable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
    /// Analysis failure message, when rendering succeeded but analysis
    /// did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_error: Option<String>,
    /// True when playback was requested and completed.
    pub played: bool,
    /// Playback failure message. Playback problems never fail the
    /// iteration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_error: Option<String>,
    /// Wall-clock time for the whole iteration.
    pub total_time_sec: f64,
}

/// Flags accepted by the iterate command.
pub struct IterateArgs<'a> {
    pub file: &'a str,
    pub output: Option<&'a str>,
    pub duration: Option<f64>,
    pub timeout_sec: f64,
    pub skip_perceptual: bool,
    pub spectrogram: Option<&'a str>,
    pub play: bool,
    /// Keep the rendered WAV when no explicit output path was given.
    pub keep: bool,
    pub json: bool,
}

/// Runs the iterate command.
pub fn run(args: &IterateArgs<'_>) -> Result<ExitCode> {
    let start = Instant::now();

    // Without an explicit output the WAV is a scratch artifact, removed
    // after analysis. With --keep it lands next to the input instead.
    let mut scratch_dir = None;
    let (output_path, is_scratch) = match args.output {
        Some(path) => (PathBuf::from(path), false),
        None if args.keep => (Path::new(args.file).with_extension("wav"), false),
        None => {
            let dir = tempfile::Builder::new()
                .prefix("audioloop_iterate_")
                .tempdir()?;
            let path = dir.path().join("render.wav");
            scratch_dir = Some(dir);
            (path, true)
        }
    };

    let mut request = RenderRequest::from_file(args.file, &output_path)
        .timeout(Duration::from_secs_f64(args.timeout_sec));
    if let Some(seconds) = args.duration {
        request = request.duration(seconds);
    }

    let render_result = render(&request)?;

    let (analysis, analysis_error) = if render_result.success {
        let options = AnalysisOptions {
            skip_perceptual: args.skip_perceptual,
            spectrogram_path: args.spectrogram.map(PathBuf::from),
        };
        match analyze_with_options(&output_path, &options) {
            Ok(result) => (Some(result), None),
            Err(e @ (AnalysisError::Unreadable { .. } | AnalysisError::EmptyAudio { .. })) => {
                (None, Some(e.to_string()))
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        (None, None)
    };

    let (played, play_error) = if args.play && render_result.success {
        match play_file(&output_path) {
            Ok(()) => (true, None),
            Err(e) => (false, Some(e.to_string())),
        }
    } else {
        (false, None)
    };

    if is_scratch {
        drop(scratch_dir);
    }

    let outcome = IterateOutcome {
        success: render_result.success && analysis.is_some(),
        render: render_result,
        analysis,
        analysis_error,
        played,
        play_error,
        total_time_sec: start.elapsed().as_secs_f64(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_human(&outcome, &output_path);
    }

    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_human(outcome: &IterateOutcome, output_path: &Path) {
    if !outcome.render.success {
        if outcome.render.timed_out {
            eprintln!("{} render exceeded the timeout", "Timed out:".red());
        } else {
            eprintln!("{}", "Render failed".red());
            if let Some(error) = &outcome.render.error {
                eprintln!("  {}", error.message);
            }
        }
        return;
    }

    println!("{} {}", "Rendered:".green(), output_path.display());
    println!();

    match &outcome.analysis {
        Some(analysis) => print_analysis_human(analysis),
        None => {
            if let Some(message) = &outcome.analysis_error {
                eprintln!("{} {message}", "Analysis failed:".red());
            }
        }
    }

    if let Some(message) = &outcome.play_error {
        eprintln!("{} {message}", "Playback error:".red());
    }

    println!();
    println!("Total time: {:.2}s", outcome.total_time_sec);
}
