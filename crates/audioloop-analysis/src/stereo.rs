//! Stereo imaging features.

use crate::types::StereoFeatures;

/// Extracts width and L/R correlation.
///
/// Width is the side-energy share of total mid+side energy: 0 for identical
/// channels, approaching 1 for fully out-of-phase material. Correlation is
/// the Pearson coefficient over samples; when either channel is effectively
/// constant the channels are treated as identical (correlation 1.0).
pub fn stereo_features(left: &[f32], right: &[f32]) -> StereoFeatures {
    let frames = left.len().min(right.len());
    if frames == 0 {
        return StereoFeatures {
            width: 0.0,
            correlation: 1.0,
        };
    }

    let mut mid_energy = 0.0f64;
    let mut side_energy = 0.0f64;
    for i in 0..frames {
        let l = left[i] as f64;
        let r = right[i] as f64;
        let mid = (l + r) * 0.5;
        let side = (l - r) * 0.5;
        mid_energy += mid * mid;
        side_energy += side * side;
    }

    let total = mid_energy + side_energy;
    let width = if total > 1e-10 { side_energy / total } else { 0.0 };

    StereoFeatures {
        width,
        correlation: correlation(&left[..frames], &right[..frames]),
    }
}

fn correlation(left: &[f32], right: &[f32]) -> f64 {
    let n = left.len() as f64;
    let mean_l: f64 = left.iter().map(|&s| s as f64).sum::<f64>() / n;
    let mean_r: f64 = right.iter().map(|&s| s as f64).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_l = 0.0;
    let mut var_r = 0.0;
    for (&l, &r) in left.iter().zip(right) {
        let dl = l as f64 - mean_l;
        let dr = r as f64 - mean_r;
        cov += dl * dr;
        var_l += dl * dl;
        var_r += dr * dr;
    }

    if var_l.sqrt() > 1e-10 && var_r.sqrt() > 1e-10 {
        cov / (var_l.sqrt() * var_r.sqrt())
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / 44100.0).sin() * 0.5)
            .collect()
    }

    #[test]
    fn identical_channels_are_mono() {
        let s = sine(440.0, 44100);
        let features = stereo_features(&s, &s);
        assert!(features.width < 1e-9, "width {}", features.width);
        assert!((features.correlation - 1.0).abs() < 1e-9);
    }

    #[test]
    fn inverted_channels_are_fully_wide() {
        let s = sine(440.0, 44100);
        let inverted: Vec<f32> = s.iter().map(|v| -v).collect();
        let features = stereo_features(&s, &inverted);
        assert!(features.width > 0.999, "width {}", features.width);
        assert!((features.correlation + 1.0).abs() < 1e-6);
    }

    #[test]
    fn uncorrelated_channels_sit_in_between() {
        let l = sine(440.0, 44100);
        let r = sine(443.0, 44100);
        let features = stereo_features(&l, &r);
        assert!(features.width > 0.1 && features.width < 0.9);
    }

    #[test]
    fn silence_is_treated_as_mono() {
        let z = vec![0.0f32; 1000];
        let features = stereo_features(&z, &z);
        assert_eq!(features.width, 0.0);
        assert_eq!(features.correlation, 1.0);
    }
}
