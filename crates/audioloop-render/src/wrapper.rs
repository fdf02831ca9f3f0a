//! NRT (non-real-time) script preparation.
//!
//! A complete render script contains a `recordNRT` call and writes its output
//! to the `__OUTPUT_PATH__` placeholder. A bare synth function such as
//! `{ SinOsc.ar(440) }` is instead embedded in a fixed harness that declares
//! a SynthDef, schedules it for the requested duration, and exits the host
//! process on completion.
//!
//! Both paths are pure text transforms. The placeholder token is the sole
//! contract between this crate and the interpreter's file-writing behavior;
//! a complete script that omits it is not rejected here - the render will
//! fail later with a missing-output classification instead.

use std::path::Path;

/// Literal token substituted with the resolved absolute output path.
pub const OUTPUT_PATH_PLACEHOLDER: &str = "__OUTPUT_PATH__";

/// Token substituted with the requested duration in wrapped mode.
pub const DURATION_PLACEHOLDER: &str = "__DURATION__";

/// Token substituted with the user's synth function in wrapped mode.
const USER_CODE_PLACEHOLDER: &str = "__USER_CODE__";

/// Fixed NRT harness for bare synth functions.
///
/// Declares the user's function as a SynthDef, schedules it for the requested
/// duration via a Score, records offline to `__OUTPUT_PATH__` as stereo
/// 24-bit WAV, and exits sclang when the render action fires.
const NRT_HARNESS_TEMPLATE: &str = r#"// Auto-generated NRT harness by audioloop
(
var userFunc = __USER_CODE__;
var duration = __DURATION__;
var outputPath = "__OUTPUT_PATH__";

SynthDef(\audioloop_render, { |out=0|
    Out.ar(out, userFunc.value);
}).store;

var score = Score([
    [0.0, [\s_new, \audioloop_render, 1000, 0, 0]],
    [duration, [\n_free, 1000]],
]);

score.recordNRT(
    outputFilePath: outputPath,
    headerFormat: "WAV",
    sampleFormat: "int24",
    options: ServerOptions.new.numOutputBusChannels_(2),
    duration: duration,
    action: { "Render complete".postln; 0.exit; }
);
)
"#;

/// Returns true if the source is a bare synth function that needs the NRT
/// harness wrapped around it.
///
/// Presence of `recordNRT` anywhere in the source marks it as a complete
/// offline-render script.
pub fn needs_wrapping(code: &str) -> bool {
    !code.contains("recordNRT")
}

/// Embeds a bare synth function in the NRT harness.
///
/// `output_path` must be absolute: the interpreter runs with its working
/// directory forced to its own install location, so relative paths would
/// resolve somewhere the caller does not expect.
pub fn wrap_function(code: &str, duration_sec: f64, output_path: &Path) -> String {
    NRT_HARNESS_TEMPLATE
        .replace(USER_CODE_PLACEHOLDER, code.trim())
        .replace(DURATION_PLACEHOLDER, &duration_sec.to_string())
        .replace(OUTPUT_PATH_PLACEHOLDER, &output_path.to_string_lossy())
}

/// Substitutes placeholders in a complete NRT script.
///
/// Always replaces `__OUTPUT_PATH__`; additionally replaces `__DURATION__`
/// when a duration was supplied. Absence of the output placeholder is not an
/// error at this layer.
pub fn replace_placeholders(code: &str, output_path: &Path, duration_sec: Option<f64>) -> String {
    let mut result = code.replace(OUTPUT_PATH_PLACEHOLDER, &output_path.to_string_lossy());

    if let Some(duration) = duration_sec {
        result = result.replace(DURATION_PLACEHOLDER, &duration.to_string());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn bare_function_needs_wrapping() {
        assert!(needs_wrapping("{ SinOsc.ar(440) }"));
        assert!(needs_wrapping("{ Saw.ar(110) * 0.2 }"));
    }

    #[test]
    fn complete_script_does_not_need_wrapping() {
        let script = r#"score.recordNRT(outputFilePath: "__OUTPUT_PATH__");"#;
        assert!(!needs_wrapping(script));
    }

    #[test]
    fn wrap_function_leaves_no_placeholders() {
        let out = PathBuf::from("/tmp/render.wav");
        let wrapped = wrap_function("{ SinOsc.ar(440) }", 2.0, &out);

        assert!(!wrapped.contains(OUTPUT_PATH_PLACEHOLDER));
        assert!(!wrapped.contains(DURATION_PLACEHOLDER));
        assert!(!wrapped.contains("__USER_CODE__"));
        assert!(wrapped.contains("{ SinOsc.ar(440) }"));
        assert!(wrapped.contains("/tmp/render.wav"));
        assert!(wrapped.contains("recordNRT"));
    }

    #[test]
    fn wrap_function_trims_user_code() {
        let out = PathBuf::from("/tmp/out.wav");
        let wrapped = wrap_function("  { Pulse.ar(220) }\n", 1.0, &out);
        assert!(wrapped.contains("var userFunc = { Pulse.ar(220) };"));
    }

    #[test]
    fn replace_placeholders_substitutes_output_path() {
        let code = r#"recordNRT(outputFilePath: "__OUTPUT_PATH__")"#;
        let out = PathBuf::from("/abs/out.wav");
        let prepared = replace_placeholders(code, &out, None);
        assert_eq!(prepared, r#"recordNRT(outputFilePath: "/abs/out.wav")"#);
    }

    #[test]
    fn replace_placeholders_substitutes_duration_when_given() {
        let code = "dur = __DURATION__; path = \"__OUTPUT_PATH__\";";
        let out = PathBuf::from("/abs/out.wav");
        let prepared = replace_placeholders(code, &out, Some(1.5));
        assert_eq!(prepared, "dur = 1.5; path = \"/abs/out.wav\";");
    }

    #[test]
    fn replace_placeholders_without_placeholder_is_identity() {
        let code = "recordNRT(outputFilePath: \"/hardcoded.wav\")";
        let out = PathBuf::from("/abs/out.wav");
        assert_eq!(replace_placeholders(code, &out, None), code);
    }
}
