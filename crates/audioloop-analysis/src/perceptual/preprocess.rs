//! Input conditioning for the psychoacoustic models.

use super::MODEL_SAMPLE_RATE;

/// Mixes a stereo pair to mono and linearly resamples to the model rate.
///
/// Linear interpolation is sufficient here: the models integrate over Bark
/// bands and short frames, so resampler imaging well below the band
/// resolution does not affect the results.
pub(crate) fn to_model_rate_mono(left: &[f32], right: &[f32], sample_rate: u32) -> Vec<f32> {
    let frames = left.len().min(right.len());
    let mono: Vec<f32> = (0..frames)
        .map(|i| (left[i] + right[i]) * 0.5)
        .collect();

    if sample_rate == MODEL_SAMPLE_RATE {
        return mono;
    }
    resample_linear(&mono, sample_rate, MODEL_SAMPLE_RATE)
}

fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if samples.is_empty() || from_rate == 0 {
        return Vec::new();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = ((samples.len() as f64) / ratio).floor() as usize;
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let pos = i as f64 * ratio;
        let index = pos as usize;
        let frac = (pos - index as f64) as f32;
        let a = samples[index];
        let b = if index + 1 < samples.len() {
            samples[index + 1]
        } else {
            a
        };
        out.push(a + (b - a) * frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_rate_input_passes_through() {
        let s = vec![0.1f32, 0.2, 0.3];
        let out = to_model_rate_mono(&s, &s, MODEL_SAMPLE_RATE);
        assert_eq!(out, s);
    }

    #[test]
    fn channels_are_averaged() {
        let l = vec![1.0f32; 4];
        let r = vec![0.0f32; 4];
        let out = to_model_rate_mono(&l, &r, MODEL_SAMPLE_RATE);
        assert!(out.iter().all(|&s| (s - 0.5).abs() < 1e-9));
    }

    #[test]
    fn resampling_scales_length_by_rate_ratio() {
        let s = vec![0.5f32; 44100];
        let out = to_model_rate_mono(&s, &s, 44100);
        let expected = 48000;
        assert!(
            (out.len() as i64 - expected).unsigned_abs() <= 2,
            "len {}",
            out.len()
        );
    }

    #[test]
    fn resampling_preserves_a_constant_signal() {
        let s = vec![0.25f32; 22050];
        let out = to_model_rate_mono(&s, &s, 22050);
        assert!(out.iter().all(|&v| (v - 0.25).abs() < 1e-6));
    }
}
