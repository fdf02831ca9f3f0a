//! Human-readable renderings of analysis and comparison results.
//!
//! Raw measurements are annotated with reference ranges, never judgments:
//! whether "very bright" is good depends entirely on what the caller was
//! trying to synthesize.

use colored::Colorize;

use audioloop_analysis::{
    AnalysisResult, ComparisonResult, Direction, FeatureDelta, SpectralFeatures,
};

use crate::layout::{down, num, row, row3, same, section, up, INDENT};

/// Reference context for a spectral centroid.
pub fn describe_centroid(hz: f64) -> String {
    let desc = if hz < 300.0 {
        "very dark"
    } else if hz < 800.0 {
        "dark/warm"
    } else if hz < 2000.0 {
        "neutral"
    } else if hz < 4000.0 {
        "bright"
    } else {
        "very bright"
    };
    format!("{} Hz ({desc})", num(format!("{hz:.0}")))
}

/// Reference context for a crest factor.
pub fn describe_crest_factor(cf: f64) -> String {
    let desc = if cf < 3.0 {
        "very compressed"
    } else if cf < 10.0 {
        "moderate dynamics"
    } else if cf < 20.0 {
        "punchy/dynamic"
    } else {
        "very dynamic"
    };
    format!("{} ({desc})", num(format!("{cf:.1}")))
}

/// Reference context for stereo width.
pub fn describe_stereo_width(width: f64) -> String {
    let desc = if width < 0.1 {
        "mono"
    } else if width < 0.3 {
        "narrow"
    } else if width < 0.6 {
        "moderate"
    } else if width < 0.8 {
        "wide"
    } else {
        "very wide"
    };
    format!("{} ({desc})", num(format!("{width:.2}")))
}

/// Reference context for integrated loudness.
pub fn describe_loudness(lufs: f64) -> String {
    let desc = if lufs > -10.0 {
        "very loud, likely clipping"
    } else if lufs > -14.0 {
        "loud, streaming target"
    } else if lufs > -18.0 {
        "moderate"
    } else if lufs > -24.0 {
        "quiet, broadcast range"
    } else {
        "very quiet"
    };
    format!("{} LUFS ({desc})", num(format!("{lufs:.1}")))
}

/// Reference context for Zwicker loudness. Sones are relative here; the
/// playback calibration is fixed, not measured.
pub fn describe_sone(sones: f64) -> String {
    let desc = if sones < 5.0 {
        "quiet"
    } else if sones < 20.0 {
        "moderate"
    } else if sones < 50.0 {
        "loud"
    } else {
        "very loud"
    };
    format!("{} sone ({desc})", num(format!("{sones:.1}")))
}

/// Reference context for sharpness (1 acum = narrow-band noise at 1 kHz).
pub fn describe_sharpness(acum: f64) -> String {
    let desc = if acum < 1.0 {
        "dull/warm"
    } else if acum < 2.0 {
        "neutral"
    } else if acum < 3.0 {
        "bright"
    } else {
        "harsh/piercing"
    };
    format!("{} acum ({desc})", num(format!("{acum:.2}")))
}

/// Reference context for roughness.
pub fn describe_roughness(asper: f64) -> String {
    let desc = if asper < 0.1 {
        "smooth"
    } else if asper < 0.5 {
        "slight texture"
    } else if asper < 1.0 {
        "noticeable modulation"
    } else {
        "rough/gritty"
    };
    format!("{} asper ({desc})", num(format!("{asper:.3}")))
}

/// Prints the full annotated analysis.
pub fn print_analysis_human(result: &AnalysisResult) {
    section("FILE INFO");
    row("File", &result.file.magenta().to_string());
    row("Duration", &format!("{}s", num(format!("{:.2}", result.duration_sec))));
    row("Sample Rate", &format!("{} Hz", num(result.sample_rate)));
    row("Channels", &num(result.channels));
    println!();

    section("SPECTRAL");
    row3("", "Left", "Right");
    let (l, r) = (&result.spectral.left, &result.spectral.right);
    row3(
        "Centroid",
        &describe_centroid(l.centroid_hz),
        &describe_centroid(r.centroid_hz),
    );
    let rolloff = hz(l, r, |s| s.rolloff_hz);
    row3("Rolloff (85%)", &rolloff.0, &rolloff.1);
    row3(
        "Flatness",
        &num(format!("{:.3}", l.flatness)),
        &num(format!("{:.3}", r.flatness)),
    );
    let bandwidth = hz(l, r, |s| s.bandwidth_hz);
    row3("Bandwidth", &bandwidth.0, &bandwidth.1);
    println!();

    section("DYNAMICS");
    row("RMS", &num(format!("{:.4}", result.temporal.rms)));
    row("Crest Factor", &describe_crest_factor(result.temporal.crest_factor));
    row("Attack", &format!("{} ms", num(format!("{:.1}", result.temporal.attack_ms))));
    println!();

    section("STEREO");
    row("Width", &describe_stereo_width(result.stereo.width));
    row("Correlation", &num(format!("{:.2}", result.stereo.correlation)));
    println!();

    section("LOUDNESS");
    match result.loudness_lufs {
        Some(lufs) => row("Integrated", &describe_loudness(lufs)),
        None => row("Integrated", &"n/a (too short or silent)".dimmed().to_string()),
    }

    if let Some(perceptual) = &result.perceptual {
        println!();
        section("PSYCHOACOUSTIC");
        row("Zwicker", &describe_sone(perceptual.loudness_sone));
        row("Sharpness", &describe_sharpness(perceptual.sharpness_acum));
        row("Roughness", &describe_roughness(perceptual.roughness_asper));
    }

    println!();
    section("BANDS");
    for (name, value) in result.band_energies.rows() {
        let bar_len = (value * 20.0).round() as usize;
        let bar = "█".repeat(bar_len);
        row(name, &format!("{} {}", bar.cyan(), num(format!("{value:.2}"))));
    }
    row("meter", &result.band_energies.meter());

    if let Some(path) = &result.spectrogram_path {
        println!();
        row("Spectrogram", &path.magenta().to_string());
    }
}

fn hz(
    l: &SpectralFeatures,
    r: &SpectralFeatures,
    field: impl Fn(&SpectralFeatures) -> f64,
) -> (String, String) {
    (
        format!("{} Hz", num(format!("{:.0}", field(l)))),
        format!("{} Hz", num(format!("{:.0}", field(r)))),
    )
}

/// Prints the comparison grouped by feature category.
pub fn print_comparison_human(result: &ComparisonResult) {
    println!(
        "{} {} -> {}",
        "Comparison:".bold(),
        result.file_a,
        result.file_b
    );
    println!(
        "Duration: {:.2}s -> {:.2}s",
        result.duration_a, result.duration_b
    );
    println!();

    for prefix in ["spectral", "temporal", "stereo", "loudness", "perceptual", "band_energies"] {
        let group: Vec<(&String, &FeatureDelta)> = result
            .deltas
            .iter()
            .filter(|(key, _)| matches_group(key, prefix))
            .collect();
        if group.is_empty() {
            continue;
        }

        let mut title = prefix.to_uppercase();
        if group.iter().any(|(_, d)| d.significant) {
            title.push_str(" (changes)");
        }
        section(&title);

        for (key, delta) in group {
            print_delta_row(key, delta);
        }
        println!();
    }

    if !result.summary.interpretations.is_empty() {
        println!(
            "{} {}",
            "Summary:".bold(),
            result.summary.interpretations.join(", ")
        );
    }
}

fn matches_group(key: &str, prefix: &str) -> bool {
    if prefix == "loudness" {
        return key.contains("lufs");
    }
    key.starts_with(prefix)
}

fn print_delta_row(key: &str, delta: &FeatureDelta) {
    let mut name = key.rsplit('.').next().unwrap_or(key).to_owned();
    if key.contains(".left.") {
        name.push_str(" (L)");
    } else if key.contains(".right.") {
        name.push_str(" (R)");
    }

    let (a, b, d) = format_values(delta);
    let arrow = match delta.direction {
        Direction::Increase => up(),
        Direction::Decrease => down(),
        Direction::Unchanged => same(),
    };

    let pct = match delta.percent_change {
        Some(pct) if pct.abs() < 10000.0 => format!(" ({pct:+.1}%)"),
        _ => String::new(),
    };

    println!("{INDENT}{name:<18} {a:<12} → {b:<12} {arrow} {d}{pct}");
}

/// Value formatting scales precision with magnitude.
fn format_values(delta: &FeatureDelta) -> (String, String, String) {
    let (a, b, d) = if delta.value_a.abs() > 100.0 {
        (
            format!("{:.0}", delta.value_a),
            format!("{:.0}", delta.value_b),
            format!("{:+.0}", delta.delta),
        )
    } else if delta.value_a.abs() > 1.0 {
        (
            format!("{:.2}", delta.value_a),
            format!("{:.2}", delta.value_b),
            format!("{:+.2}", delta.delta),
        )
    } else {
        (
            format!("{:.4}", delta.value_a),
            format!("{:.4}", delta.value_b),
            format!("{:+.4}", delta.delta),
        )
    };

    if delta.unit.is_empty() {
        (a, b, d)
    } else {
        (
            format!("{a} {}", delta.unit),
            format!("{b} {}", delta.unit),
            format!("{d} {}", delta.unit),
        )
    }
}
