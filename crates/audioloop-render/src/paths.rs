//! Interpreter discovery and installation validation.
//!
//! sclang's location is resolved once into a [`SclangConfig`] and threaded
//! through the driver rather than re-read from the environment on every call.
//! The interpreter must be run with its working directory set to its own
//! install location (its GUI toolkit initializes relative to that directory),
//! so the config also exposes the forced working directory.

use std::path::{Path, PathBuf};

use crate::error::RenderError;

/// Environment variable pointing at the SuperCollider app root
/// (e.g. `/Applications/SuperCollider.app`).
pub const SC_APP_ENV: &str = "AUDIOLOOP_SC_APP";

/// Resolved sclang configuration.
#[derive(Debug, Clone)]
pub struct SclangConfig {
    /// Path to the sclang executable.
    sclang_path: PathBuf,
}

impl SclangConfig {
    /// Uses an explicit sclang executable path, bypassing discovery.
    pub fn with_sclang_path(path: impl Into<PathBuf>) -> Self {
        Self {
            sclang_path: path.into(),
        }
    }

    /// Resolves the sclang executable.
    ///
    /// Search order:
    ///
    /// 1. `AUDIOLOOP_SC_APP` environment variable (app-bundle root)
    /// 2. `sclang` on PATH
    /// 3. Platform-conventional install locations
    pub fn resolve() -> Result<Self, RenderError> {
        if let Ok(app_root) = std::env::var(SC_APP_ENV) {
            let app_root = PathBuf::from(app_root);
            let sclang = sclang_in_app(&app_root);
            if sclang.exists() {
                return Ok(Self::with_sclang_path(sclang));
            }
            return Err(RenderError::sclang_invalid(
                app_root,
                format!("no sclang executable under the path set by {}", SC_APP_ENV),
            ));
        }

        let sclang_names = if cfg!(windows) {
            vec!["sclang.exe", "sclang"]
        } else {
            vec!["sclang"]
        };

        for name in sclang_names {
            if let Ok(path) = which::which(name) {
                return Ok(Self::with_sclang_path(path));
            }
        }

        let common_paths = if cfg!(windows) {
            vec![
                "C:\\Program Files\\SuperCollider\\sclang.exe",
                "C:\\Program Files (x86)\\SuperCollider\\sclang.exe",
            ]
        } else if cfg!(target_os = "macos") {
            vec!["/Applications/SuperCollider.app/Contents/MacOS/sclang"]
        } else {
            vec!["/usr/bin/sclang", "/usr/local/bin/sclang"]
        };

        for path_str in common_paths {
            let path = PathBuf::from(path_str);
            if path.exists() {
                return Ok(Self::with_sclang_path(path));
            }
        }

        Err(RenderError::SclangNotFound)
    }

    /// Path to the sclang executable.
    pub fn sclang_path(&self) -> &Path {
        &self.sclang_path
    }

    /// Directory the interpreter must be run from.
    pub fn working_dir(&self) -> &Path {
        self.sclang_path.parent().unwrap_or(Path::new("."))
    }

    /// Checks that the resolved executable actually exists.
    pub fn validate(&self) -> Result<(), RenderError> {
        if !self.sclang_path.exists() {
            return Err(RenderError::sclang_invalid(
                self.sclang_path.clone(),
                "executable does not exist",
            ));
        }
        Ok(())
    }
}

/// sclang location inside a SuperCollider app bundle / install root.
fn sclang_in_app(app_root: &Path) -> PathBuf {
    if cfg!(target_os = "macos") {
        app_root.join("Contents").join("MacOS").join("sclang")
    } else if cfg!(windows) {
        app_root.join("sclang.exe")
    } else {
        app_root.join("bin").join("sclang")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_is_kept_verbatim() {
        let config = SclangConfig::with_sclang_path("/opt/sc/sclang");
        assert_eq!(config.sclang_path(), Path::new("/opt/sc/sclang"));
        assert_eq!(config.working_dir(), Path::new("/opt/sc"));
    }

    #[test]
    fn validate_rejects_missing_executable() {
        let config = SclangConfig::with_sclang_path("/definitely/not/here/sclang");
        assert!(config.validate().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn validate_accepts_existing_executable() {
        // /bin/sh exists everywhere we run tests.
        let config = SclangConfig::with_sclang_path("/bin/sh");
        assert!(config.validate().is_ok());
        assert_eq!(config.working_dir(), Path::new("/bin"));
    }
}
