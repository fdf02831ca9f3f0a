//! DIN 45692 sharpness from a specific loudness profile.

use super::zwicker::BARK_BANDS;

/// Weighting that emphasizes loudness above ~16 Bark.
fn weighting(z: f64) -> f64 {
    if z <= 15.8 {
        1.0
    } else {
        0.15 * (0.42 * (z - 15.8)).exp() + 0.85
    }
}

/// Sharpness in acum: the weighted first moment of specific loudness over
/// the Bark axis. A 1 kHz narrow-band reference lands near 1 acum.
pub(crate) fn sharpness_acum(specific: &[f64; BARK_BANDS]) -> f64 {
    let total: f64 = specific.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let weighted: f64 = specific
        .iter()
        .enumerate()
        .map(|(band, &n)| {
            let z = band as f64 + 0.5;
            n * weighting(z) * z
        })
        .sum();

    0.11 * weighted / total
}
