//! audioloop render driver
//!
//! This crate drives the SuperCollider interpreter (`sclang`) as an offline
//! renderer. It turns a synthesis script (or a bare synth-function snippet)
//! into a bounded WAV artifact and classifies the outcome.
//!
//! # Overview
//!
//! Rendering has three stages:
//!
//! 1. **Prepare** - [`wrapper`] detects whether the input is a complete NRT
//!    script or a bare function. Bare functions are embedded in a fixed NRT
//!    harness; both forms get the `__OUTPUT_PATH__` placeholder substituted.
//! 2. **Execute** - [`sclang`] spawns the interpreter with a forced working
//!    directory and an explicit timeout, killing the process on expiry.
//! 3. **Classify** - [`render`] inspects the outcome in a fixed order:
//!    timeout, error markers in console text ([`classify`]), missing/empty
//!    output file, success. The interpreter's exit code is never consulted;
//!    it is not a reliable success signal in any covered release line.
//!
//! # Interpreter discovery
//!
//! The orchestrator searches for sclang in:
//!
//! 1. An explicit [`SclangConfig`] override
//! 2. `AUDIOLOOP_SC_APP` environment variable (SuperCollider app root)
//! 3. System PATH
//! 4. Common installation locations (platform-specific)
//!
//! # Example
//!
//! ```ignore
//! use audioloop_render::{render, RenderRequest};
//! use std::time::Duration;
//!
//! let request = RenderRequest::from_file("patch.scd", "out.wav")
//!     .duration(2.0)
//!     .timeout(Duration::from_secs(60));
//! let result = render(&request)?;
//!
//! println!("rendered: {:?}", result.output_path);
//! ```

pub mod classify;
pub mod error;
pub mod paths;
pub mod render;
pub mod sclang;
pub mod wrapper;

pub use classify::{extract_diagnostic, has_error_markers, SclangDiagnostic};
pub use error::RenderError;
pub use paths::SclangConfig;
pub use render::{
    probe_wav_duration, render, render_with_config, RenderMode, RenderRequest, RenderResult,
    ScriptSource,
};
pub use sclang::{run_sclang, SclangOutput};
pub use wrapper::{needs_wrapping, replace_placeholders, wrap_function, OUTPUT_PATH_PLACEHOLDER};
