//! Error types for audio analysis.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or analyzing audio.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Audio file does not exist.
    #[error("audio file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// File exists but could not be decoded as WAV.
    #[error("failed to read audio file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    /// File decoded but contains no samples.
    #[error("audio file contains no samples: {path}")]
    EmptyAudio { path: PathBuf },

    /// IO error while writing an analysis artifact (e.g. the spectrogram).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding error from the spectrogram writer.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),
}
