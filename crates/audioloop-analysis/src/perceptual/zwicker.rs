//! Zwicker loudness on the Bark scale.
//!
//! Per frame, bin power is pooled into 24 critical bands, converted to an
//! excitation level against a fixed playback calibration, and mapped to
//! specific loudness with Zwicker's power-law formula. Total loudness is
//! the specific loudness integrated over the Bark axis (dz = 1 per band).

use crate::stft::{bin_hz, magnitude_frames_with};

use super::MODEL_SAMPLE_RATE;

const WINDOW_SIZE: usize = 2048;
const HOP_SIZE: usize = 1024;

/// Number of critical bands covering 0-24 Bark.
pub(crate) const BARK_BANDS: usize = 24;

/// Assumed playback level of a full-scale sine, dB SPL. Digital audio has
/// no inherent SPL; this anchor makes loudness comparable across renders.
const FULL_SCALE_SPL_DB: f64 = 90.0;

/// Per-frame and time-averaged loudness.
pub(crate) struct LoudnessSummary {
    /// Mean total loudness over frames, sone.
    pub mean_sone: f64,
    /// Maximum per-frame total loudness, sone.
    pub max_sone: f64,
    /// Time-averaged specific loudness per Bark band, sone/Bark.
    pub mean_specific: [f64; BARK_BANDS],
}

/// Critical band rate for a frequency in Hz (Zwicker & Terhardt).
pub(crate) fn bark(hz: f64) -> f64 {
    13.0 * (0.00076 * hz).atan() + 3.5 * ((hz / 7500.0) * (hz / 7500.0)).atan()
}

/// Threshold in quiet at a frequency, dB SPL (Terhardt's approximation).
fn threshold_in_quiet_db(hz: f64) -> f64 {
    let khz = (hz / 1000.0).max(0.02);
    3.64 * khz.powf(-0.8) - 6.5 * (-0.6 * (khz - 3.3) * (khz - 3.3)).exp()
        + 1e-3 * khz.powi(4)
}

/// Specific loudness for one band given its excitation level in dB SPL.
fn specific_loudness(level_db: f64, threshold_db: f64) -> f64 {
    let e_tq = 10.0_f64.powf(threshold_db / 10.0);
    let e = 10.0_f64.powf(level_db / 10.0);
    let n = 0.08 * e_tq.powf(0.23) * ((0.5 + 0.5 * e / e_tq).powf(0.23) - 1.0);
    n.max(0.0)
}

pub(crate) fn loudness(mono: &[f32]) -> Option<LoudnessSummary> {
    let frames = magnitude_frames_with(mono, WINDOW_SIZE, HOP_SIZE);
    if frames.is_empty() {
        return None;
    }

    // Hann coherent gain: a full-scale sine contributes amplitude
    // 2 * mag / (N/2) at its bin.
    let amplitude_scale = 4.0 / WINDOW_SIZE as f64;

    let band_centers: [f64; BARK_BANDS] = band_center_frequencies();
    let mut totals = Vec::with_capacity(frames.len());
    let mut specific_sum = [0.0f64; BARK_BANDS];

    for frame in &frames {
        let mut band_power = [0.0f64; BARK_BANDS];
        for (i, &mag) in frame.iter().enumerate() {
            let hz = bin_hz(i, MODEL_SAMPLE_RATE, WINDOW_SIZE);
            if hz < 20.0 {
                continue;
            }
            let z = bark(hz) as usize;
            if z < BARK_BANDS {
                let amplitude = mag * amplitude_scale;
                band_power[z] += amplitude * amplitude * 0.5;
            }
        }

        let mut frame_total = 0.0;
        for (z, &power) in band_power.iter().enumerate() {
            if power <= 0.0 {
                continue;
            }
            let level_db = 10.0 * power.log10() + FULL_SCALE_SPL_DB;
            let threshold_db = threshold_in_quiet_db(band_centers[z]);
            let n = specific_loudness(level_db, threshold_db);
            specific_sum[z] += n;
            frame_total += n;
        }
        totals.push(frame_total);
    }

    let frame_count = totals.len() as f64;
    let mean_sone = totals.iter().sum::<f64>() / frame_count;
    let max_sone = totals.iter().copied().fold(0.0f64, f64::max);
    let mut mean_specific = [0.0f64; BARK_BANDS];
    for (slot, sum) in mean_specific.iter_mut().zip(&specific_sum) {
        *slot = sum / frame_count;
    }

    Some(LoudnessSummary {
        mean_sone,
        max_sone,
        mean_specific,
    })
}

/// Center frequency of each Bark band, found by bisecting the Bark curve.
fn band_center_frequencies() -> [f64; BARK_BANDS] {
    let mut centers = [0.0f64; BARK_BANDS];
    for (z, slot) in centers.iter_mut().enumerate() {
        let target = z as f64 + 0.5;
        let mut low = 20.0f64;
        let mut high = 24000.0f64;
        for _ in 0..60 {
            let mid = (low + high) * 0.5;
            if bark(mid) < target {
                low = mid;
            } else {
                high = mid;
            }
        }
        *slot = (low + high) * 0.5;
    }
    centers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, amplitude: f32, seconds: f32) -> Vec<f32> {
        let len = (MODEL_SAMPLE_RATE as f32 * seconds) as usize;
        (0..len)
            .map(|i| {
                (2.0 * std::f32::consts::PI * freq * i as f32 / MODEL_SAMPLE_RATE as f32)
                    .sin()
                    * amplitude
            })
            .collect()
    }

    #[test]
    fn bark_scale_is_monotonic() {
        let mut last = bark(20.0);
        for hz in [100.0, 500.0, 1000.0, 4000.0, 10000.0, 20000.0] {
            let z = bark(hz);
            assert!(z > last);
            last = z;
        }
        assert!(bark(20000.0) < 25.0);
    }

    #[test]
    fn loudness_grows_with_level() {
        let loud = loudness(&sine(1000.0, 0.5, 0.5)).unwrap();
        let quiet = loudness(&sine(1000.0, 0.05, 0.5)).unwrap();
        assert!(loud.mean_sone > quiet.mean_sone);
    }

    #[test]
    fn tone_energy_lands_in_its_bark_band() {
        let summary = loudness(&sine(1000.0, 0.5, 0.5)).unwrap();
        // 1 kHz is ~8.5 Bark.
        let peak_band = summary
            .mean_specific
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(z, _)| z)
            .unwrap();
        assert!((7..=10).contains(&peak_band), "peak band {}", peak_band);
    }

    #[test]
    fn max_is_at_least_mean() {
        let summary = loudness(&sine(1000.0, 0.3, 0.5)).unwrap();
        assert!(summary.max_sone >= summary.mean_sone);
    }
}
