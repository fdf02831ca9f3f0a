//! Analyze command implementation.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;

use audioloop_analysis::{analyze_with_options, AnalysisError, AnalysisOptions};

use crate::output::print_analysis_human;

/// Runs the analyze command.
pub fn run(
    file: &str,
    skip_perceptual: bool,
    spectrogram: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    let path = Path::new(file);
    if !path.is_file() {
        anyhow::bail!("file not found: {file}");
    }

    let options = AnalysisOptions {
        skip_perceptual,
        spectrogram_path: spectrogram.map(PathBuf::from),
    };

    let result = match analyze_with_options(path, &options) {
        Ok(result) => result,
        // Unreadable or empty audio is a content problem with the input,
        // not a failure of this tool.
        Err(e @ (AnalysisError::Unreadable { .. } | AnalysisError::EmptyAudio { .. })) => {
            eprintln!("{} {e}", "Analysis failed:".red());
            return Ok(ExitCode::from(1));
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_analysis_human(&result);
    }
    Ok(ExitCode::SUCCESS)
}
