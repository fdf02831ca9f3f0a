//! Render pipeline: prepare, execute, classify.
//!
//! The outcome of a render is classified in a fixed order, and the
//! interpreter's exit code is never part of it:
//!
//! 1. Timeout - the process was killed. No diagnostic is parsed: a hang most
//!    often means the script never finished compiling, and partial console
//!    text would misattribute the cause. Timeout and content error are
//!    mutually exclusive classifications.
//! 2. Error markers in the captured console text - routed through
//!    [`crate::classify`] for structured extraction.
//! 3. Expected output file missing or empty despite an apparently clean run.
//! 4. Success - the rendered duration is probed from the output WAV header.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::classify::{extract_diagnostic, has_error_markers, SclangDiagnostic};
use crate::error::RenderError;
use crate::paths::SclangConfig;
use crate::sclang::{run_sclang, DEFAULT_TIMEOUT};
use crate::wrapper::{needs_wrapping, replace_placeholders, wrap_function};

/// Where the synthesis source comes from.
#[derive(Debug, Clone)]
pub enum ScriptSource {
    /// Read the script from a file.
    File(PathBuf),
    /// Use the given text directly.
    Inline(String),
}

/// One render request. Immutable; owned by the caller.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Script file or inline snippet.
    pub source: ScriptSource,
    /// Where the WAV must land. Made absolute before substitution.
    pub output_path: PathBuf,
    /// Explicit duration in seconds. Required for bare snippets.
    pub duration_sec: Option<f64>,
    /// Hard limit on interpreter wall time.
    pub timeout: Duration,
}

impl RenderRequest {
    /// Render a script file to `output_path`.
    pub fn from_file(input: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            source: ScriptSource::File(input.into()),
            output_path: output_path.into(),
            duration_sec: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Render inline script text to `output_path`.
    pub fn from_inline(code: impl Into<String>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            source: ScriptSource::Inline(code.into()),
            output_path: output_path.into(),
            duration_sec: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the explicit render duration.
    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration_sec = Some(seconds);
        self
    }

    /// Sets the render timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// How the input was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Input already contained the offline-render idiom.
    CompleteScript,
    /// Input was a bare synth function, wrapped in the NRT harness.
    Wrapped,
}

impl RenderMode {
    /// String identifier used in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::CompleteScript => "complete_script",
            RenderMode::Wrapped => "wrapped",
        }
    }
}

/// Outcome of one render. Produced once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// True only when the output file exists with content and no error was
    /// detected.
    pub success: bool,
    /// Resolved output path, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    /// Rendered audio duration probed from the output WAV header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_sec: Option<f64>,
    /// Wall-clock time spent rendering.
    pub render_time_sec: f64,
    /// True if the interpreter was killed on timeout. Mutually exclusive
    /// with a parsed diagnostic.
    pub timed_out: bool,
    /// Classified synthesis error, absent on success and on timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SclangDiagnostic>,
    /// Raw interpreter console text (stdout + stderr).
    pub console: String,
    /// Detected input mode.
    pub mode: RenderMode,
}

impl RenderResult {
    fn failure(
        mode: RenderMode,
        timed_out: bool,
        error: Option<SclangDiagnostic>,
        console: String,
        elapsed: Duration,
    ) -> Self {
        Self {
            success: false,
            output_path: None,
            duration_sec: None,
            render_time_sec: elapsed.as_secs_f64(),
            timed_out,
            error,
            console,
            mode,
        }
    }
}

/// Renders with interpreter discovery performed on the spot.
pub fn render(request: &RenderRequest) -> Result<RenderResult, RenderError> {
    let config = SclangConfig::resolve()?;
    render_with_config(&config, request)
}

/// Renders against an already-resolved interpreter configuration.
pub fn render_with_config(
    config: &SclangConfig,
    request: &RenderRequest,
) -> Result<RenderResult, RenderError> {
    let start = Instant::now();

    // The interpreter runs with cwd fixed to its install dir, so a relative
    // output path would land there. Anchor it to the caller's cwd instead.
    let output_path = absolutize(&request.output_path)?;

    let code = match &request.source {
        ScriptSource::File(path) => {
            if !path.exists() {
                return Err(RenderError::InputNotFound { path: path.clone() });
            }
            std::fs::read_to_string(path).map_err(|e| RenderError::ReadInputFailed {
                path: path.clone(),
                source: e,
            })?
        }
        ScriptSource::Inline(code) => code.clone(),
    };

    let (mode, prepared) = if needs_wrapping(&code) {
        let duration = request.duration_sec.ok_or(RenderError::MissingDuration)?;
        (RenderMode::Wrapped, wrap_function(&code, duration, &output_path))
    } else {
        (
            RenderMode::CompleteScript,
            replace_placeholders(&code, &output_path, request.duration_sec),
        )
    };

    let mut script_file = tempfile::Builder::new()
        .prefix("audioloop_render_")
        .suffix(".scd")
        .tempfile()
        .map_err(RenderError::WriteScriptFailed)?;
    script_file
        .write_all(prepared.as_bytes())
        .map_err(RenderError::WriteScriptFailed)?;
    script_file.flush().map_err(RenderError::WriteScriptFailed)?;

    let output = run_sclang(config, script_file.path(), request.timeout)?;
    let console = output.combined();

    if output.timed_out {
        return Ok(RenderResult::failure(
            mode,
            true,
            None,
            console,
            start.elapsed(),
        ));
    }

    if has_error_markers(&console) {
        let diagnostic = extract_diagnostic(&console)
            .unwrap_or_else(|| SclangDiagnostic::message_only("Unknown error in sclang output"));
        return Ok(RenderResult::failure(
            mode,
            false,
            Some(diagnostic),
            console,
            start.elapsed(),
        ));
    }

    // A clean-looking exit is not trusted: the output file must exist with
    // content for the render to count as a success.
    match std::fs::metadata(&output_path) {
        Err(_) => {
            return Ok(RenderResult::failure(
                mode,
                false,
                Some(SclangDiagnostic::message_only("Output file was not created")),
                console,
                start.elapsed(),
            ));
        }
        Ok(meta) if meta.len() == 0 => {
            return Ok(RenderResult::failure(
                mode,
                false,
                Some(SclangDiagnostic::message_only("Output file is empty")),
                console,
                start.elapsed(),
            ));
        }
        Ok(_) => {}
    }

    let duration_sec = probe_wav_duration(&output_path);

    Ok(RenderResult {
        success: true,
        output_path: Some(output_path),
        duration_sec,
        render_time_sec: start.elapsed().as_secs_f64(),
        timed_out: false,
        error: None,
        console,
        mode,
    })
}

/// Duration of a WAV file in seconds, from its own header.
pub fn probe_wav_duration(path: &Path) -> Option<f64> {
    let reader = hound::WavReader::open(path).ok()?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return None;
    }
    Some(reader.duration() as f64 / spec.sample_rate as f64)
}

fn absolutize(path: &Path) -> Result<PathBuf, RenderError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_file_is_a_system_error() {
        let config = SclangConfig::with_sclang_path("/bin/sh");
        let request = RenderRequest::from_file("/no/such/patch.scd", "/tmp/out.wav");
        let err = render_with_config(&config, &request).unwrap_err();
        assert!(matches!(err, RenderError::InputNotFound { .. }));
    }

    #[test]
    fn bare_snippet_without_duration_is_rejected() {
        let config = SclangConfig::with_sclang_path("/bin/sh");
        let request = RenderRequest::from_inline("{ SinOsc.ar(440) }", "/tmp/out.wav");
        let err = render_with_config(&config, &request).unwrap_err();
        assert!(matches!(err, RenderError::MissingDuration));
    }

    #[test]
    fn render_mode_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&RenderMode::CompleteScript).unwrap(),
            "\"complete_script\""
        );
        assert_eq!(RenderMode::Wrapped.as_str(), "wrapped");
    }
}
