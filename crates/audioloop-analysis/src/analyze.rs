//! Top-level analysis entry point.

use std::path::{Path, PathBuf};

use crate::bands::band_energies;
use crate::error::AnalysisError;
use crate::lufs::integrated_lufs;
use crate::spectral::spectral_features;
use crate::spectrogram::write_spectrogram;
use crate::stereo::stereo_features;
use crate::temporal::temporal_features;
use crate::types::{AnalysisResult, ChannelSpectral, SpectralFeatures};
use crate::wav::Waveform;

/// Options for an analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Skip the psychoacoustic block (it dominates analysis time).
    pub skip_perceptual: bool,
    /// Also render a spectrogram PNG to this path.
    pub spectrogram_path: Option<PathBuf>,
}

/// Analyzes an audio file with default options.
pub fn analyze(path: &Path) -> Result<AnalysisResult, AnalysisError> {
    analyze_with_options(path, &AnalysisOptions::default())
}

/// Analyzes an audio file.
///
/// All reported floats are rounded to six decimal places so results are
/// stable across serialization round trips.
pub fn analyze_with_options(
    path: &Path,
    options: &AnalysisOptions,
) -> Result<AnalysisResult, AnalysisError> {
    let wave = Waveform::load(path)?;
    let mono = wave.mono_mix();

    let spectral = ChannelSpectral {
        left: round_spectral(spectral_features(&wave.left, wave.sample_rate)),
        right: round_spectral(spectral_features(&wave.right, wave.sample_rate)),
    };

    let mut temporal = temporal_features(&mono, wave.sample_rate);
    temporal.attack_ms = round_f64(temporal.attack_ms);
    temporal.rms = round_f64(temporal.rms);
    temporal.crest_factor = round_f64(temporal.crest_factor);

    let mut stereo = stereo_features(&wave.left, &wave.right);
    stereo.width = round_f64(stereo.width);
    stereo.correlation = round_f64(stereo.correlation);

    let loudness_lufs =
        integrated_lufs(&wave.left, &wave.right, wave.sample_rate).map(round_f64);

    let perceptual = if options.skip_perceptual {
        None
    } else {
        perceptual_block(&wave)
    };

    let mut bands = band_energies(&mono, wave.sample_rate);
    bands.sub = round_f64(bands.sub);
    bands.bass = round_f64(bands.bass);
    bands.low_mid = round_f64(bands.low_mid);
    bands.mid = round_f64(bands.mid);
    bands.high_mid = round_f64(bands.high_mid);
    bands.high = round_f64(bands.high);

    let spectrogram_path = match &options.spectrogram_path {
        Some(out) => {
            write_spectrogram(&wave, out)?;
            Some(out.display().to_string())
        }
        None => None,
    };

    Ok(AnalysisResult {
        file: path.display().to_string(),
        duration_sec: round_f64(wave.duration_sec()),
        sample_rate: wave.sample_rate,
        channels: wave.source_channels,
        spectral,
        temporal,
        stereo,
        loudness_lufs,
        perceptual,
        band_energies: bands,
        spectrogram_path,
    })
}

#[cfg(feature = "psychoacoustics")]
fn perceptual_block(wave: &Waveform) -> Option<crate::types::PerceptualFeatures> {
    crate::perceptual::compute(&wave.left, &wave.right, wave.sample_rate).map(|p| {
        crate::types::PerceptualFeatures {
            loudness_sone: round_f64(p.loudness_sone),
            loudness_sone_max: round_f64(p.loudness_sone_max),
            sharpness_acum: round_f64(p.sharpness_acum),
            roughness_asper: round_f64(p.roughness_asper),
        }
    })
}

#[cfg(not(feature = "psychoacoustics"))]
fn perceptual_block(_wave: &Waveform) -> Option<crate::types::PerceptualFeatures> {
    None
}

fn round_spectral(features: SpectralFeatures) -> SpectralFeatures {
    SpectralFeatures {
        centroid_hz: round_f64(features.centroid_hz),
        rolloff_hz: round_f64(features.rolloff_hz),
        flatness: round_f64(features.flatness),
        bandwidth_hz: round_f64(features.bandwidth_hz),
    }
}

/// Rounds to 6 decimal places.
pub(crate) fn round_f64(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
