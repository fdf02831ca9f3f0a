//! Play command implementation.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;

use crate::play::{play_file, PlaybackError};

/// Runs the play command.
pub fn run(file: &str) -> Result<ExitCode> {
    let path = Path::new(file);
    println!("Playing: {file}");

    match play_file(path) {
        Ok(()) => {
            println!("Played: {file}");
            Ok(ExitCode::SUCCESS)
        }
        // A player that started but failed is a problem with the file.
        Err(e @ PlaybackError::Failed { .. }) => {
            eprintln!("{} {e}", "Playback error:".red());
            Ok(ExitCode::from(1))
        }
        Err(e) => Err(e.into()),
    }
}
