//! Render command implementation.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use audioloop_render::{render, RenderRequest, RenderResult};

use crate::layout::row;

/// Runs the render command.
pub fn run(
    file: &str,
    output: Option<&str>,
    duration: Option<f64>,
    timeout_sec: f64,
    json: bool,
    verbose: bool,
) -> Result<ExitCode> {
    let output_path = resolve_output_path(file, output);

    // The output directory must exist; the interpreter silently renders
    // nothing into a missing one.
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut request = RenderRequest::from_file(file, &output_path)
        .timeout(Duration::from_secs_f64(timeout_sec));
    if let Some(seconds) = duration {
        request = request.duration(seconds);
    }

    let result = render(&request)?;

    if json {
        print_json(&result, verbose)?;
    } else {
        print_human(&result, verbose);
    }

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Default output path: the input with its extension swapped to `.wav`.
fn resolve_output_path(file: &str, output: Option<&str>) -> PathBuf {
    match output {
        Some(path) => PathBuf::from(path),
        None => Path::new(file).with_extension("wav"),
    }
}

fn print_json(result: &RenderResult, verbose: bool) -> Result<()> {
    let mut value = serde_json::to_value(result)?;
    if !verbose {
        // The raw console text is large and rarely wanted in JSON mode.
        if let Some(map) = value.as_object_mut() {
            map.remove("console");
        }
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_human(result: &RenderResult, verbose: bool) {
    if result.success {
        println!(
            "{} {}",
            "Rendered:".green(),
            result
                .output_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        );
        if let Some(duration) = result.duration_sec {
            row(
                "Duration",
                &format!("{duration:.2}s (rendered in {:.2}s)", result.render_time_sec),
            );
        }
        row("Mode", result.mode.as_str());
    } else if result.timed_out {
        eprintln!(
            "{} render exceeded {:.0}s",
            "Timed out:".red(),
            result.render_time_sec
        );
    } else {
        eprintln!("{}", "Render failed".red());
        if let Some(error) = &result.error {
            eprintln!("  {}", error.message);
            if let (Some(file), Some(line)) = (&error.file, error.line) {
                let column = error.column.unwrap_or(0);
                eprintln!("  in {file} line {line} char {column}");
            }
        }
    }

    if verbose && !result.console.is_empty() {
        println!("\n{}", "--- sclang output ---".dimmed());
        println!("{}", result.console);
    }
}
