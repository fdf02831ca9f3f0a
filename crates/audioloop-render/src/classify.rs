//! Console-output error classification.
//!
//! sclang does not reliably signal failure through its exit code, so the
//! driver scans the captured console text for known error markers and, when
//! the standard diagnostic shape is present, extracts a structured
//! `(message, file, line, column)` tuple:
//!
//! ```text
//! ERROR: syntax error, unexpected BINOP
//!   in file '/path/to/patch.scd'
//!   line 12 char 5
//! ```
//!
//! Extraction never fails: when the structured shape does not match, the
//! classifier degrades to a message-only diagnostic.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Structured diagnostic parsed from sclang console output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SclangDiagnostic {
    /// Error message text.
    pub message: String,
    /// Source file the interpreter attributed the error to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Line number within that file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Character column within that line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl SclangDiagnostic {
    /// Creates a message-only diagnostic.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: None,
            line: None,
            column: None,
        }
    }
}

const LIBRARY_COMPILE_FAILURE: &str = "Library has not been compiled successfully";
const SERVER_FAILURE: &str = "FAILURE IN SERVER";

fn error_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)\bERROR\b|{}|{}",
            LIBRARY_COMPILE_FAILURE, SERVER_FAILURE
        ))
        .unwrap()
    })
}

fn structured_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"ERROR:\s*(.+?)\n\s+in file '([^']+)'\n\s+line (\d+) char (\d+)").unwrap()
    })
}

fn simple_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"ERROR:\s*(.+)").unwrap())
}

fn server_failure_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"FAILURE IN SERVER\s+(.+)").unwrap())
}

/// Returns true if the console text contains any known error marker.
pub fn has_error_markers(output: &str) -> bool {
    error_marker_re().is_match(output)
}

/// Extracts the most structured diagnostic available from console text.
///
/// Returns `None` only when no error marker is present at all.
pub fn extract_diagnostic(output: &str) -> Option<SclangDiagnostic> {
    if let Some(caps) = structured_re().captures(output) {
        return Some(SclangDiagnostic {
            message: caps[1].trim().to_string(),
            file: Some(caps[2].to_string()),
            line: caps[3].parse().ok(),
            column: caps[4].parse().ok(),
        });
    }

    if let Some(caps) = simple_re().captures(output) {
        return Some(SclangDiagnostic::message_only(caps[1].trim()));
    }

    if output.contains(LIBRARY_COMPILE_FAILURE) {
        return Some(SclangDiagnostic::message_only("Library compilation failed"));
    }

    if output.contains(SERVER_FAILURE) {
        let message = server_failure_re()
            .captures(output)
            .map(|caps| caps[1].trim().to_string())
            .unwrap_or_else(|| "Server failure".to_string());
        return Some(SclangDiagnostic::message_only(message));
    }

    None
}
