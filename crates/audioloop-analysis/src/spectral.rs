//! Spectral feature extraction.
//!
//! Centroid, rolloff, flatness, and bandwidth are computed per frame and
//! aggregated by mean, producing one scalar per feature per channel.

use crate::stft::{bin_hz, magnitude_frames, WINDOW_SIZE};
use crate::types::SpectralFeatures;

/// Rolloff point: fraction of total spectral energy below the reported
/// frequency.
const ROLLOFF_FRACTION: f64 = 0.85;

/// Extracts spectral features for one channel.
pub fn spectral_features(samples: &[f32], sample_rate: u32) -> SpectralFeatures {
    let frames = magnitude_frames(samples);

    let mut centroid_sum = 0.0;
    let mut rolloff_sum = 0.0;
    let mut flatness_sum = 0.0;
    let mut bandwidth_sum = 0.0;
    let mut counted = 0usize;

    for frame in &frames {
        let magnitude_sum: f64 = frame.iter().sum();
        if magnitude_sum <= 0.0 {
            // Silent frame: contributes zeros rather than NaNs.
            counted += 1;
            continue;
        }

        let centroid = frame
            .iter()
            .enumerate()
            .map(|(i, &m)| bin_hz(i, sample_rate, WINDOW_SIZE) * m)
            .sum::<f64>()
            / magnitude_sum;

        let rolloff = rolloff_hz(frame, magnitude_sum, sample_rate);

        let bandwidth = (frame
            .iter()
            .enumerate()
            .map(|(i, &m)| {
                let d = bin_hz(i, sample_rate, WINDOW_SIZE) - centroid;
                d * d * m
            })
            .sum::<f64>()
            / magnitude_sum)
            .sqrt();

        centroid_sum += centroid;
        rolloff_sum += rolloff;
        flatness_sum += flatness(frame);
        bandwidth_sum += bandwidth;
        counted += 1;
    }

    if counted == 0 {
        return SpectralFeatures {
            centroid_hz: 0.0,
            rolloff_hz: 0.0,
            flatness: 0.0,
            bandwidth_hz: 0.0,
        };
    }

    let n = counted as f64;
    SpectralFeatures {
        centroid_hz: centroid_sum / n,
        rolloff_hz: rolloff_sum / n,
        flatness: flatness_sum / n,
        bandwidth_hz: bandwidth_sum / n,
    }
}

/// Frequency below which `ROLLOFF_FRACTION` of the frame's energy lies.
fn rolloff_hz(frame: &[f64], magnitude_sum: f64, sample_rate: u32) -> f64 {
    let target = ROLLOFF_FRACTION * magnitude_sum;
    let mut cumulative = 0.0;
    for (i, &m) in frame.iter().enumerate() {
        cumulative += m;
        if cumulative >= target {
            return bin_hz(i, sample_rate, WINDOW_SIZE);
        }
    }
    bin_hz(frame.len().saturating_sub(1), sample_rate, WINDOW_SIZE)
}

/// Spectral flatness: geometric mean / arithmetic mean of the power
/// spectrum. 1.0 for white noise, near 0 for a pure tone.
fn flatness(frame: &[f64]) -> f64 {
    if frame.is_empty() {
        return 0.0;
    }

    const FLOOR: f64 = 1e-20;
    let n = frame.len() as f64;
    let mut log_sum = 0.0;
    let mut mean = 0.0;
    for &m in frame {
        let power = (m * m).max(FLOOR);
        log_sum += power.ln();
        mean += power;
    }
    mean /= n;
    if mean <= 0.0 {
        return 0.0;
    }
    let geometric = (log_sum / n).exp();
    (geometric / mean).min(1.0)
}
