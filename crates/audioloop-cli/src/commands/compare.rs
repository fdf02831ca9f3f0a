//! Compare command implementation.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;

use audioloop_analysis::{compare_files, AnalysisError, CompareOptions};

use crate::output::print_comparison_human;

/// Runs the compare command.
pub fn run(
    file_a: &str,
    file_b: &str,
    threshold_pct: Option<f64>,
    skip_perceptual: bool,
    json: bool,
) -> Result<ExitCode> {
    for file in [file_a, file_b] {
        if !Path::new(file).is_file() {
            anyhow::bail!("file not found: {file}");
        }
    }

    let mut options = CompareOptions {
        skip_perceptual,
        ..CompareOptions::default()
    };
    if let Some(threshold) = threshold_pct {
        options.significance_threshold_pct = threshold;
    }

    let result = match compare_files(Path::new(file_a), Path::new(file_b), &options) {
        Ok(result) => result,
        Err(e @ (AnalysisError::Unreadable { .. } | AnalysisError::EmptyAudio { .. })) => {
            eprintln!("{} {e}", "Comparison failed:".red());
            return Ok(ExitCode::from(1));
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_comparison_human(&result);
    }
    Ok(ExitCode::SUCCESS)
}
