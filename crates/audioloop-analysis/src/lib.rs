//! Audio analysis for the render feedback loop.
//!
//! Loads rendered WAV files and produces a fixed schema of spectral,
//! temporal, stereo-imaging, loudness, and band-energy features, plus an
//! optional psychoacoustic block (Zwicker loudness, sharpness, roughness)
//! behind the `psychoacoustics` feature. Two analyses can be compared into
//! per-feature deltas with direction, percent change, and significance
//! flags, and any waveform can be rendered as a stacked spectrogram PNG.
//!
//! Analysis is stateless: every call loads the file fresh and returns an
//! immutable [`AnalysisResult`]. Mono input is analyzed as a duplicated
//! stereo pair so the result schema never changes shape with channel
//! count.

mod analyze;
mod bands;
mod compare;
mod error;
mod lufs;
#[cfg(feature = "psychoacoustics")]
mod perceptual;
mod spectral;
mod spectrogram;
mod stereo;
mod stft;
mod temporal;
mod types;
mod wav;

pub use analyze::{analyze, analyze_with_options, AnalysisOptions};
pub use bands::{band_energies, BAND_RANGES, METER_GLYPHS};
pub use compare::{
    compare_files, compare_results, CompareOptions, ComparisonResult, ComparisonSummary,
    Direction, FeatureDelta, DEFAULT_SIGNIFICANCE_THRESHOLD_PCT,
};
pub use error::AnalysisError;
pub use spectrogram::write_spectrogram;
pub use types::{
    AnalysisResult, BandEnergies, ChannelSpectral, PerceptualFeatures, SpectralFeatures,
    StereoFeatures, TemporalFeatures,
};
pub use wav::Waveform;
