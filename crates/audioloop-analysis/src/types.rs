//! Serializable result types for audio analysis.

use serde::{Deserialize, Serialize};

/// Spectral shape of one channel, aggregated over frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralFeatures {
    /// Magnitude-weighted mean frequency ("brightness"), Hz.
    pub centroid_hz: f64,
    /// Frequency below which 85% of spectral energy lies, Hz.
    pub rolloff_hz: f64,
    /// Geometric/arithmetic mean ratio of the power spectrum; 0 = tonal,
    /// 1 = noise-like.
    pub flatness: f64,
    /// Magnitude-weighted standard deviation around the centroid, Hz.
    pub bandwidth_hz: f64,
}

/// Per-channel spectral features. Mono input is analyzed as two identical
/// channels so downstream consumers always see the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpectral {
    pub left: SpectralFeatures,
    pub right: SpectralFeatures,
}

/// Dynamics features of the mono mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalFeatures {
    /// Time to first reach 90% of peak amplitude, milliseconds.
    pub attack_ms: f64,
    /// Root mean square amplitude, linear full scale.
    pub rms: f64,
    /// Peak / RMS ratio; higher means more transient material.
    pub crest_factor: f64,
}

/// Stereo image features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StereoFeatures {
    /// Side-energy share of total mid+side energy, 0 (mono) to ~1 (out of
    /// phase).
    pub width: f64,
    /// Pearson correlation of L and R, -1 to 1.
    pub correlation: f64,
}

/// Psychoacoustic metrics. Absent as a block when the audio is too short
/// or silent for the models to be meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptualFeatures {
    /// Mean Zwicker loudness, sone.
    pub loudness_sone: f64,
    /// Maximum per-frame loudness, sone.
    pub loudness_sone_max: f64,
    /// DIN 45692 sharpness, acum.
    pub sharpness_acum: f64,
    /// Modulation-based roughness estimate, asper.
    pub roughness_asper: f64,
}

/// Energy per fixed frequency band, normalized so the loudest band is 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandEnergies {
    /// 20-60 Hz.
    pub sub: f64,
    /// 60-250 Hz.
    pub bass: f64,
    /// 250-500 Hz.
    pub low_mid: f64,
    /// 500-2000 Hz.
    pub mid: f64,
    /// 2000-4000 Hz.
    pub high_mid: f64,
    /// 4000-20000 Hz.
    pub high: f64,
}

/// Complete analysis of one audio file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Path of the analyzed file as given by the caller.
    pub file: String,
    /// Duration in seconds.
    pub duration_sec: f64,
    /// Sample rate of the source file, Hz.
    pub sample_rate: u32,
    /// Channel count of the source file (analysis always runs on a stereo
    /// pair; mono is duplicated).
    pub channels: u16,
    pub spectral: ChannelSpectral,
    pub temporal: TemporalFeatures,
    pub stereo: StereoFeatures,
    /// Integrated loudness per BS.1770; absent for silent or very short
    /// audio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loudness_lufs: Option<f64>,
    /// Psychoacoustic block; absent when unavailable for this input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perceptual: Option<PerceptualFeatures>,
    pub band_energies: BandEnergies,
    /// Path of the spectrogram PNG, when one was rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectrogram_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> AnalysisResult {
        let spectral = SpectralFeatures {
            centroid_hz: 1847.0,
            rolloff_hz: 4200.0,
            flatness: 0.02,
            bandwidth_hz: 1500.0,
        };
        AnalysisResult {
            file: "out.wav".into(),
            duration_sec: 2.0,
            sample_rate: 44100,
            channels: 2,
            spectral: ChannelSpectral {
                left: spectral.clone(),
                right: spectral,
            },
            temporal: TemporalFeatures {
                attack_ms: 12.0,
                rms: 0.2,
                crest_factor: 3.1,
            },
            stereo: StereoFeatures {
                width: 0.3,
                correlation: 0.8,
            },
            loudness_lufs: None,
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
    fn absent_options_are_omitted_from_json() {
        let json = serde_json::to_string(&sample_result()).unwrap();
        assert!(!json.contains("loudness_lufs"));
        assert!(!json.contains("perceptual"));
        assert!(!json.contains("spectrogram_path"));
    }

    #[test]
    fn result_round_trips_through_json() {
        let mut result = sample_result();
        result.loudness_lufs = Some(-14.2);
        let json = serde_json::to_string(&result).unwrap();
        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
