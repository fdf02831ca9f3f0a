//! Error types for the render driver.
//!
//! [`RenderError`] covers system-level failures only: the interpreter being
//! absent, unreadable input, missing duration, I/O. Synthesis-level failures
//! (compile errors, server failures, timeouts, missing output) are data, not
//! errors - they live on [`crate::RenderResult`] so a caller can inspect the
//! captured console text and the structured diagnostic.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur before or outside the interpreter run itself.
#[derive(Debug, Error)]
pub enum RenderError {
    /// sclang executable not found.
    #[error(
        "sclang not found. Install SuperCollider from https://supercollider.github.io/downloads, \
         or set AUDIOLOOP_SC_APP to the SuperCollider app root"
    )]
    SclangNotFound,

    /// sclang was found but the installation looks broken.
    #[error("sclang installation invalid at {path}: {reason}")]
    SclangInvalid { path: PathBuf, reason: String },

    /// Input script file does not exist.
    #[error("input script not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Failed to read the input script.
    #[error("failed to read input script {path}: {source}")]
    ReadInputFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A bare snippet was supplied without an explicit duration.
    #[error("duration required for bare synth-function input (no recordNRT found); pass an explicit duration")]
    MissingDuration,

    /// Failed to write the prepared script to a scratch file.
    #[error("failed to write prepared script: {0}")]
    WriteScriptFailed(#[source] std::io::Error),

    /// Failed to spawn the sclang process.
    #[error("failed to spawn sclang: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Creates an installation-invalid error.
    pub fn sclang_invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::SclangInvalid {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
