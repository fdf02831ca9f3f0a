//! Psychoacoustic metrics: Zwicker loudness, DIN 45692 sharpness, and a
//! modulation-based roughness estimate.
//!
//! All three run on a 48 kHz mono reduction of the input. They are soft
//! metrics: for audio that is too short (< 100 ms) or effectively silent
//! the whole block is reported absent rather than as zeros, so consumers
//! can distinguish "not measurable" from "measured quiet".

mod preprocess;
mod roughness;
mod sharpness;
mod zwicker;

use crate::types::PerceptualFeatures;

/// Working sample rate for all psychoacoustic models.
pub(crate) const MODEL_SAMPLE_RATE: u32 = 48000;

/// Minimum input length for the models to be meaningful.
const MIN_DURATION_SEC: f64 = 0.1;

/// Computes the perceptual feature block, or `None` when the input is too
/// short or silent.
pub fn compute(left: &[f32], right: &[f32], sample_rate: u32) -> Option<PerceptualFeatures> {
    if sample_rate == 0 {
        return None;
    }
    let frames = left.len().min(right.len());
    if (frames as f64 / sample_rate as f64) < MIN_DURATION_SEC {
        return None;
    }

    let mono = preprocess::to_model_rate_mono(left, right, sample_rate);
    let peak = mono.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
    if peak < 1e-10 {
        return None;
    }

    let loudness = zwicker::loudness(&mono)?;
    let sharpness_acum = sharpness::sharpness_acum(&loudness.mean_specific);
    let roughness_asper = roughness::roughness_asper(&mono);

    Some(PerceptualFeatures {
        loudness_sone: loudness.mean_sone,
        loudness_sone_max: loudness.max_sone,
        sharpness_acum,
        roughness_asper,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, amplitude: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
        let len = (sample_rate as f32 * seconds) as usize;
        (0..len)
            .map(|i| {
                (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin()
                    * amplitude
            })
            .collect()
    }

    #[test]
    fn louder_signal_has_higher_loudness() {
        let loud = sine(1000.0, 0.5, 48000, 1.0);
        let quiet = sine(1000.0, 0.05, 48000, 1.0);
        let l = compute(&loud, &loud, 48000).unwrap();
        let q = compute(&quiet, &quiet, 48000).unwrap();
        assert!(
            l.loudness_sone > q.loudness_sone,
            "loud {} quiet {}",
            l.loudness_sone,
            q.loudness_sone
        );
    }

    #[test]
    fn brighter_signal_is_sharper() {
        let high = sine(6000.0, 0.3, 48000, 1.0);
        let low = sine(200.0, 0.3, 48000, 1.0);
        let h = compute(&high, &high, 48000).unwrap();
        let l = compute(&low, &low, 48000).unwrap();
        assert!(
            h.sharpness_acum > l.sharpness_acum,
            "high {} low {}",
            h.sharpness_acum,
            l.sharpness_acum
        );
    }

    #[test]
    fn amplitude_modulation_raises_roughness() {
        let sr = 48000u32;
        let carrier = sine(1000.0, 0.5, sr, 1.0);
        let modulated: Vec<f32> = carrier
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let m = 1.0
                    + (2.0 * std::f32::consts::PI * 70.0 * i as f32 / sr as f32).sin();
                s * m * 0.5
            })
            .collect();
        let steady = compute(&carrier, &carrier, sr).unwrap();
        let rough = compute(&modulated, &modulated, sr).unwrap();
        assert!(
            rough.roughness_asper > steady.roughness_asper,
            "rough {} steady {}",
            rough.roughness_asper,
            steady.roughness_asper
        );
    }

    #[test]
    fn silence_is_absent() {
        let z = vec![0.0f32; 48000];
        assert_eq!(compute(&z, &z, 48000), None);
    }

    #[test]
    fn short_audio_is_absent() {
        let s = sine(440.0, 0.5, 48000, 0.05);
        assert_eq!(compute(&s, &s, 48000), None);
    }

    #[test]
    fn works_at_non_model_sample_rates() {
        let s = sine(1000.0, 0.5, 44100, 1.0);
        assert!(compute(&s, &s, 44100).is_some());
    }
}
