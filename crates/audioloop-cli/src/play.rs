//! System audio playback.
//!
//! Delegates to the host's command-line player and blocks until playback
//! completes. There is no audio path of our own; a missing player is a
//! system error, a player that starts and fails is a content error.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Players probed in order. afplay on macOS, aplay/paplay on Linux.
const PLAYER_CANDIDATES: &[&str] = &["afplay", "aplay", "paplay"];

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("audio file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("no system audio player found (tried {tried})")]
    PlayerNotFound { tried: String },

    #[error("playback failed: {message}")]
    Failed { message: String },

    #[error("failed to start player {player}: {source}")]
    SpawnFailed {
        player: String,
        #[source]
        source: std::io::Error,
    },
}

/// Finds the first available system player.
fn find_player() -> Result<PathBuf, PlaybackError> {
    for candidate in PLAYER_CANDIDATES {
        if let Ok(path) = which::which(candidate) {
            return Ok(path);
        }
    }
    Err(PlaybackError::PlayerNotFound {
        tried: PLAYER_CANDIDATES.join(", "),
    })
}

/// Plays an audio file, blocking until playback finishes.
pub fn play_file(path: &Path) -> Result<(), PlaybackError> {
    if !path.is_file() {
        return Err(PlaybackError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let player = find_player()?;
    let output = Command::new(&player)
        .arg(path)
        .output()
        .map_err(|e| PlaybackError::SpawnFailed {
            player: player.display().to_string(),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = match stderr.trim() {
            "" => "Unknown error".to_owned(),
            text => text.to_owned(),
        };
        return Err(PlaybackError::Failed { message });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported_before_probing_players() {
        let err = play_file(Path::new("/no/such/file.wav")).unwrap_err();
        assert!(matches!(err, PlaybackError::FileNotFound { .. }));
    }
}
