//! Temporal / dynamics feature extraction.

use crate::types::TemporalFeatures;

/// Peak levels below this are treated as silence for attack detection.
const SILENCE_PEAK: f32 = 1e-6;

/// Extracts temporal features from the mono mix.
pub fn temporal_features(samples: &[f32], sample_rate: u32) -> TemporalFeatures {
    let rms = rms(samples);
    let peak = peak(samples);

    let crest_factor = if rms > 1e-10 { peak as f64 / rms } else { 0.0 };

    TemporalFeatures {
        attack_ms: attack_ms(samples, sample_rate, peak),
        rms,
        crest_factor,
    }
}

/// Root mean square amplitude.
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_of_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_of_squares / samples.len() as f64).sqrt()
}

/// Peak absolute amplitude.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// Time in milliseconds until the signal first reaches 90% of its peak
/// absolute amplitude.
fn attack_ms(samples: &[f32], sample_rate: u32, peak: f32) -> f64 {
    if peak < SILENCE_PEAK || sample_rate == 0 {
        return 0.0;
    }

    let threshold = 0.9 * peak;
    match samples.iter().position(|s| s.abs() >= threshold) {
        Some(index) => index as f64 / sample_rate as f64 * 1000.0,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_of_full_scale_square_is_one() {
        let samples: Vec<f32> = (0..1000).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert!((rms(&samples) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn crest_factor_of_sine_is_sqrt_two() {
        let samples: Vec<f32> = (0..44100)
            .map(|i| (2.0 * std::f32::consts::PI * 441.0 * i as f32 / 44100.0).sin())
            .collect();
        let features = temporal_features(&samples, 44100);
        assert!(
            (features.crest_factor - std::f64::consts::SQRT_2).abs() < 0.01,
            "crest {}",
            features.crest_factor
        );
    }

    #[test]
    fn attack_measures_ramp_time() {
        let sample_rate = 1000;
        // 100-sample linear ramp to full scale, then sustain: 90% of peak is
        // reached at sample 90, i.e. 90 ms at 1 kHz.
        let mut samples: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        samples.extend(std::iter::repeat(1.0).take(400));

        let features = temporal_features(&samples, sample_rate);
        assert!(
            (features.attack_ms - 90.0).abs() <= 1.0,
            "attack {} ms",
            features.attack_ms
        );
    }

    #[test]
    fn silence_has_zero_attack_and_crest() {
        let features = temporal_features(&vec![0.0; 1000], 44100);
        assert_eq!(features.attack_ms, 0.0);
        assert_eq!(features.crest_factor, 0.0);
        assert_eq!(features.rms, 0.0);
    }
}
