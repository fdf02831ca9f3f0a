//! Feature-delta comparison between two analyses.
//!
//! Both feature trees are flattened to dotted keys and every numeric key
//! present in both sides gets a delta, percent change, direction, and
//! significance flag. A small interpretation table maps significant
//! movement of well-known metrics to a short descriptive phrase; metrics
//! outside the table carry no interpretation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyze::{analyze_with_options, AnalysisOptions};
use crate::error::AnalysisError;
use crate::types::AnalysisResult;

/// Baseline magnitudes below this make percent change undefined.
const ZERO_GUARD: f64 = 1e-10;

/// Default percent-change magnitude above which a delta is significant.
pub const DEFAULT_SIGNIFICANCE_THRESHOLD_PCT: f64 = 10.0;

/// Metadata keys that are not features.
const SKIP_KEYS: [&str; 3] = ["file", "sample_rate", "channels"];

/// (metric, on decrease, on increase). Heuristic defaults, keyed by the
/// last segment of the dotted path.
const INTERPRETATIONS: [(&str, &str, &str); 13] = [
    ("centroid_hz", "darker/warmer", "brighter"),
    (
        "rolloff_hz",
        "less high frequency content",
        "more high frequency content",
    ),
    ("bandwidth_hz", "narrower spectrum", "wider spectrum"),
    ("attack_ms", "snappier attack", "slower attack"),
    ("rms", "quieter", "louder"),
    ("crest_factor", "more compressed", "more dynamic"),
    ("width", "narrower stereo", "wider stereo"),
    ("correlation", "less correlated L/R", "more correlated L/R"),
    ("loudness_lufs", "quieter", "louder"),
    ("loudness_sone", "quieter (perceived)", "louder (perceived)"),
    (
        "loudness_sone_max",
        "lower peak loudness",
        "higher peak loudness",
    ),
    ("sharpness_acum", "duller/softer", "sharper/brighter"),
    ("roughness_asper", "smoother", "rougher/grittier"),
];

/// Unit label per metric name.
const UNITS: [(&str, &str); 9] = [
    ("centroid_hz", "Hz"),
    ("rolloff_hz", "Hz"),
    ("bandwidth_hz", "Hz"),
    ("attack_ms", "ms"),
    ("loudness_lufs", "LUFS"),
    ("duration_sec", "s"),
    ("loudness_sone", "sone"),
    ("loudness_sone_max", "sone"),
    ("sharpness_acum", "acum"),
];

/// Direction of a feature's movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increase,
    Decrease,
    Unchanged,
}

/// Delta of one feature between baseline and comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDelta {
    /// Dotted feature path, e.g. `spectral.left.centroid_hz`.
    pub metric: String,
    pub value_a: f64,
    pub value_b: f64,
    /// `value_b - value_a`.
    pub delta: f64,
    /// Percent change relative to `|value_a|`; absent when the baseline is
    /// effectively zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
    pub direction: Direction,
    /// True when `|percent_change|` exceeds the significance threshold.
    pub significant: bool,
    /// Unit label, empty for dimensionless metrics.
    pub unit: String,
    /// Short descriptive phrase, only for significant movement of known
    /// metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
}

/// Roll-up over all deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Dotted paths of significantly changed features, in key order.
    pub significant_changes: Vec<String>,
    pub total_metrics: usize,
    pub changed_count: usize,
    pub significant_count: usize,
    /// Interpretation phrases collected from significant deltas.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub interpretations: Vec<String>,
}

/// Full comparison between two audio files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub file_a: String,
    pub file_b: String,
    pub duration_a: f64,
    pub duration_b: f64,
    pub summary: ComparisonSummary,
    /// Deltas keyed by dotted feature path, in lexicographic order.
    pub deltas: BTreeMap<String, FeatureDelta>,
}

/// Tunables for a comparison.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Percent-change magnitude above which a delta is significant.
    pub significance_threshold_pct: f64,
    /// Skip the psychoacoustic block when analyzing the inputs.
    pub skip_perceptual: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            significance_threshold_pct: DEFAULT_SIGNIFICANCE_THRESHOLD_PCT,
            skip_perceptual: false,
        }
    }
}

/// Analyzes two files and compares them.
pub fn compare_files(
    file_a: &Path,
    file_b: &Path,
    options: &CompareOptions,
) -> Result<ComparisonResult, AnalysisError> {
    let analysis_options = AnalysisOptions {
        skip_perceptual: options.skip_perceptual,
        ..AnalysisOptions::default()
    };
    let a = analyze_with_options(file_a, &analysis_options)?;
    let b = analyze_with_options(file_b, &analysis_options)?;
    Ok(compare_results(&a, &b, options))
}

/// Compares two existing analyses.
pub fn compare_results(
    a: &AnalysisResult,
    b: &AnalysisResult,
    options: &CompareOptions,
) -> ComparisonResult {
    let flat_a = flatten(a);
    let flat_b = flatten(b);

    let mut deltas = BTreeMap::new();
    let mut significant_changes = Vec::new();
    let mut interpretations = Vec::new();
    let mut changed_count = 0;
    let mut significant_count = 0;

    for (key, &value_a) in &flat_a {
        let Some(&value_b) = flat_b.get(key) else {
            continue;
        };

        let delta = value_b - value_a;
        let percent_change = (value_a.abs() > ZERO_GUARD)
            .then(|| delta / value_a.abs() * 100.0);

        let direction = if delta.abs() < ZERO_GUARD {
            Direction::Unchanged
        } else if delta > 0.0 {
            Direction::Increase
        } else {
            Direction::Decrease
        };

        let significant = percent_change
            .is_some_and(|pct| pct.abs() > options.significance_threshold_pct);

        let interpretation = if significant && direction != Direction::Unchanged {
            significant_changes.push(key.clone());
            interpret(key, direction).map(str::to_owned)
        } else {
            None
        };

        if direction != Direction::Unchanged {
            changed_count += 1;
        }
        if significant {
            significant_count += 1;
        }
        if let Some(phrase) = &interpretation {
            interpretations.push(phrase.clone());
        }

        deltas.insert(
            key.clone(),
            FeatureDelta {
                metric: key.clone(),
                value_a,
                value_b,
                delta,
                percent_change,
                direction,
                significant,
                unit: unit_for(key).to_owned(),
                interpretation,
            },
        );
    }

    ComparisonResult {
        file_a: a.file.clone(),
        file_b: b.file.clone(),
        duration_a: a.duration_sec,
        duration_b: b.duration_sec,
        summary: ComparisonSummary {
            significant_changes,
            total_metrics: deltas.len(),
            changed_count,
            significant_count,
            interpretations,
        },
        deltas,
    }
}

/// Flattens the analysis to dotted numeric keys, dropping metadata fields.
fn flatten(analysis: &AnalysisResult) -> BTreeMap<String, f64> {
    let mut out = BTreeMap::new();
    // The serde view is the comparison contract: anything the analysis
    // serializes as a number is comparable.
    if let Ok(value) = serde_json::to_value(analysis) {
        flatten_value(&value, "", &mut out);
    }
    for key in SKIP_KEYS {
        out.remove(key);
    }
    out
}

fn flatten_value(value: &serde_json::Value, prefix: &str, out: &mut BTreeMap<String, f64>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                let full = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_value(child, &full, out);
            }
        }
        serde_json::Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                out.insert(prefix.to_owned(), f);
            }
        }
        _ => {}
    }
}

fn metric_name(key: &str) -> &str {
    key.rsplit('.').next().unwrap_or(key)
}

fn unit_for(key: &str) -> &'static str {
    let name = metric_name(key);
    UNITS
        .iter()
        .find(|(metric, _)| *metric == name)
        .map(|(_, unit)| *unit)
        .unwrap_or("")
}

fn interpret(key: &str, direction: Direction) -> Option<&'static str> {
    let name = metric_name(key);
    let &(_, down, up) = INTERPRETATIONS.iter().find(|(metric, _, _)| *metric == name)?;
    match direction {
        Direction::Decrease => Some(down),
        Direction::Increase => Some(up),
        Direction::Unchanged => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::{
        BandEnergies, ChannelSpectral, SpectralFeatures, StereoFeatures, TemporalFeatures,
    };

    fn result_with_centroid(centroid_hz: f64) -> AnalysisResult {
        let spectral = SpectralFeatures {
            centroid_hz,
            rolloff_hz: 4000.0,
            flatness: 0.02,
            bandwidth_hz: 1200.0,
        };
        AnalysisResult {
            file: format!("tone_{centroid_hz}.wav"),
            duration_sec: 2.0,
            sample_rate: 44100,
            channels: 2,
            spectral: ChannelSpectral {
                left: spectral.clone(),
                right: spectral,
            },
            temporal: TemporalFeatures {
                attack_ms: 10.0,
                rms: 0.2,
                crest_factor: 3.0,
            },
            stereo: StereoFeatures {
                width: 0.3,
                correlation: 0.9,
            },
            loudness_lufs: Some(-14.0),
            perceptual: None,
            band_energies: BandEnergies {
                sub: 0.1,
                bass: 0.4,
                low_mid: 0.6,
                mid: 1.0,
                high_mid: 0.5,
                high: 0.2,
            },
            spectrogram_path: None,
        }
    }

    #[test]
    fn identical_analyses_have_no_changes() {
        let a = result_with_centroid(1000.0);
        let result = compare_results(&a, &a, &CompareOptions::default());
        assert_eq!(result.summary.changed_count, 0);
        assert_eq!(result.summary.significant_count, 0);
        assert!(result.summary.significant_changes.is_empty());
        for delta in result.deltas.values() {
            assert_eq!(delta.direction, Direction::Unchanged);
            assert_eq!(delta.delta, 0.0);
            assert!(!delta.significant);
        }
    }

    #[test]
    fn centroid_drop_is_interpreted_as_darker() {
        let a = result_with_centroid(1847.0);
        let b = result_with_centroid(823.0);
        let result = compare_results(&a, &b, &CompareOptions::default());

        let delta = &result.deltas["spectral.left.centroid_hz"];
        assert!((delta.delta + 1024.0).abs() < 1e-9);
        let pct = delta.percent_change.unwrap();
        assert!((pct + 55.44).abs() < 0.1, "pct {}", pct);
        assert_eq!(delta.direction, Direction::Decrease);
        assert!(delta.significant);
        assert_eq!(delta.interpretation.as_deref(), Some("darker/warmer"));
        assert_eq!(delta.unit, "Hz");
        assert!(result
            .summary
            .interpretations
            .contains(&"darker/warmer".to_owned()));
    }

    #[test]
    fn zero_baseline_has_no_percent_change() {
        let mut a = result_with_centroid(1000.0);
        a.temporal.rms = 0.0;
        let mut b = result_with_centroid(1000.0);
        b.temporal.rms = 0.5;
        let result = compare_results(&a, &b, &CompareOptions::default());

        let delta = &result.deltas["temporal.rms"];
        assert_eq!(delta.percent_change, None);
        assert_eq!(delta.direction, Direction::Increase);
        // No percent means no significance call either.
        assert!(!delta.significant);
    }

    #[test]
    fn metadata_keys_are_not_compared() {
        let a = result_with_centroid(1000.0);
        let result = compare_results(&a, &a, &CompareOptions::default());
        assert!(!result.deltas.contains_key("sample_rate"));
        assert!(!result.deltas.contains_key("channels"));
        assert!(result.deltas.contains_key("duration_sec"));
    }

    #[test]
    fn threshold_is_configurable() {
        let a = result_with_centroid(1000.0);
        let b = result_with_centroid(1050.0);
        let strict = compare_results(&a, &b, &CompareOptions::default());
        assert!(!strict.deltas["spectral.left.centroid_hz"].significant);

        let loose = compare_results(
            &a,
            &b,
            &CompareOptions {
                significance_threshold_pct: 2.0,
                ..CompareOptions::default()
            },
        );
        assert!(loose.deltas["spectral.left.centroid_hz"].significant);
    }

    #[test]
    fn perceptual_block_is_compared_only_when_present_on_both_sides() {
        let a = result_with_centroid(1000.0);
        let result = compare_results(&a, &a, &CompareOptions::default());
        assert!(result
            .deltas
            .keys()
            .all(|k| !k.starts_with("perceptual")));
    }

    #[test]
    fn direction_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Direction::Increase).unwrap(),
            "\"increase\""
        );
    }
}
