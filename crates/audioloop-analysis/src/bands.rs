//! Fixed six-band frequency energy summary.
//!
//! Band boundaries follow conventional audio-engineering ranges. Energies are
//! normalized so the loudest band reads 1.0, making the summary useful as a
//! compact balance check independent of absolute level.

use crate::stft::{accumulated_power, bin_hz, WINDOW_SIZE};
use crate::types::BandEnergies;

/// (name, low Hz, high Hz) for the six fixed bands.
pub const BAND_RANGES: [(&str, f64, f64); 6] = [
    ("sub", 20.0, 60.0),
    ("bass", 60.0, 250.0),
    ("low_mid", 250.0, 500.0),
    ("mid", 500.0, 2000.0),
    ("high_mid", 2000.0, 4000.0),
    ("high", 4000.0, 20000.0),
];

/// Block glyphs used for the terminal band meter, quietest to loudest.
pub const METER_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Computes normalized band energies from the mono mix.
pub fn band_energies(samples: &[f32], sample_rate: u32) -> BandEnergies {
    let power = accumulated_power(samples);

    let mut totals = [0.0f64; 6];
    for (i, &p) in power.iter().enumerate() {
        let hz = bin_hz(i, sample_rate, WINDOW_SIZE);
        for (slot, &(_, low, high)) in totals.iter_mut().zip(&BAND_RANGES) {
            if hz >= low && hz < high {
                *slot += p;
                break;
            }
        }
    }

    let max = totals.iter().copied().fold(0.0f64, f64::max);
    if max > 0.0 {
        for slot in &mut totals {
            *slot /= max;
        }
    }

    BandEnergies {
        sub: totals[0],
        bass: totals[1],
        low_mid: totals[2],
        mid: totals[3],
        high_mid: totals[4],
        high: totals[5],
    }
}

impl BandEnergies {
    /// Band values paired with their names, in ascending frequency order.
    pub fn rows(&self) -> [(&'static str, f64); 6] {
        [
            ("sub", self.sub),
            ("bass", self.bass),
            ("low_mid", self.low_mid),
            ("mid", self.mid),
            ("high_mid", self.high_mid),
            ("high", self.high),
        ]
    }

    /// Compact block-glyph meter, one glyph per band.
    pub fn meter(&self) -> String {
        self.rows()
            .iter()
            .map(|&(_, v)| glyph_for(v))
            .collect()
    }
}

fn glyph_for(value: f64) -> char {
    let clamped = value.clamp(0.0, 1.0);
    let index = (clamped * (METER_GLYPHS.len() - 1) as f64).round() as usize;
    METER_GLYPHS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32) -> Vec<f32> {
        (0..sample_rate as usize)
            .map(|i| {
                (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin() * 0.5
            })
            .collect()
    }

    #[test]
    fn sine_at_440_peaks_the_low_mid_band() {
        let bands = band_energies(&sine(440.0, 44100), 44100);
        assert_eq!(bands.low_mid, 1.0);
        assert!(bands.sub < 0.1);
        assert!(bands.high < 0.1);
    }

    #[test]
    fn sine_at_1k_peaks_the_mid_band() {
        let bands = band_energies(&sine(1000.0, 44100), 44100);
        assert_eq!(bands.mid, 1.0);
    }

    #[test]
    fn loudest_band_is_exactly_one() {
        let bands = band_energies(&sine(100.0, 44100), 44100);
        let max = bands
            .rows()
            .iter()
            .map(|&(_, v)| v)
            .fold(0.0f64, f64::max);
        assert_eq!(max, 1.0);
        assert_eq!(bands.bass, 1.0);
    }

    #[test]
    fn silence_yields_all_zero_bands() {
        let bands = band_energies(&vec![0.0; 44100], 44100);
        assert!(bands.rows().iter().all(|&(_, v)| v == 0.0));
    }

    #[test]
    fn meter_is_one_glyph_per_band() {
        let bands = band_energies(&sine(1000.0, 44100), 44100);
        assert_eq!(bands.meter().chars().count(), 6);
    }
}
