//! ITU-R BS.1770 integrated loudness (LUFS).
//!
//! K-weighting (high-shelf pre-filter plus RLB high-pass) is applied per
//! channel, mean-square energy is summed across channels per 400 ms block
//! with 75% overlap, and the blocks are gated at -70 LUFS absolute and
//! ungated-minus-10-dB relative thresholds.
//!
//! Returns `None` for audio shorter than one block or effectively silent -
//! the caller reports the metric as absent rather than failing.

/// Gate thresholds (BS.1770-4).
const ABSOLUTE_GATE_DB: f64 = -70.0;
const RELATIVE_GATE_OFFSET_DB: f64 = -10.0;

/// BS.1770 reference offset.
const LUFS_REFERENCE_OFFSET: f64 = -0.691;

/// Direct-form-I biquad with fixed coefficients.
#[derive(Debug, Clone)]
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    fn new(coeffs: (f64, f64, f64, f64, f64)) -> Self {
        let (b0, b1, b2, a1, a2) = coeffs;
        Self {
            b0,
            b1,
            b2,
            a1,
            a2,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

/// Pre-filter: high shelf near 1.5 kHz with +4 dB gain.
fn pre_filter_coefficients(sample_rate: u32) -> (f64, f64, f64, f64, f64) {
    let fs = sample_rate as f64;

    if (fs - 48000.0).abs() < 1.0 {
        // Reference coefficients from the standard.
        (
            1.53512485958697,
            -2.69169618940638,
            1.19839281085285,
            -1.69065929318241,
            0.73248077421585,
        )
    } else if (fs - 44100.0).abs() < 1.0 {
        (
            1.53085156824536,
            -2.65067242430902,
            1.16911633949740,
            -1.66363194078698,
            0.71251089073889,
        )
    } else {
        // Re-derive via bilinear transform for other rates.
        let f0 = 1681.974450955533;
        let g = 3.999843853973347_f64;
        let q = 0.7071752369554196;

        let k = (std::f64::consts::PI * f0 / fs).tan();
        let vg = 10.0_f64.powf(g / 20.0);
        let k2 = k * k;
        let a0 = 1.0 + k / q + k2;

        (
            (vg + vg.sqrt() * k / q + k2) / a0,
            2.0 * (k2 - vg) / a0,
            (vg - vg.sqrt() * k / q + k2) / a0,
            2.0 * (k2 - 1.0) / a0,
            (1.0 - k / q + k2) / a0,
        )
    }
}

/// RLB filter: high-pass near 38 Hz.
fn rlb_filter_coefficients(sample_rate: u32) -> (f64, f64, f64, f64, f64) {
    let fs = sample_rate as f64;

    if (fs - 48000.0).abs() < 1.0 {
        (1.0, -2.0, 1.0, -1.99004745483398, 0.99007225036621)
    } else if (fs - 44100.0).abs() < 1.0 {
        (
            0.99977198108520,
            -1.99954396217041,
            0.99977198108520,
            -1.99891572199493,
            0.99891622176588,
        )
    } else {
        let fc = 38.13547087602444;
        let q = 0.5003270373238773;

        let k = (std::f64::consts::PI * fc / fs).tan();
        let k2 = k * k;
        let a0 = 1.0 + k / q + k2;

        (
            1.0 / a0,
            -2.0 / a0,
            1.0 / a0,
            2.0 * (k2 - 1.0) / a0,
            (1.0 - k / q + k2) / a0,
        )
    }
}

fn k_weight(samples: &[f32], sample_rate: u32) -> Vec<f64> {
    let mut pre = Biquad::new(pre_filter_coefficients(sample_rate));
    let mut rlb = Biquad::new(rlb_filter_coefficients(sample_rate));
    samples
        .iter()
        .map(|&s| rlb.process(pre.process(s as f64)))
        .collect()
}

fn mean_square(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64
}

fn mean_square_to_lufs(ms: f64) -> f64 {
    if ms <= 0.0 {
        return f64::NEG_INFINITY;
    }
    LUFS_REFERENCE_OFFSET + 10.0 * ms.log10()
}

/// Integrated loudness of a stereo pair.
pub fn integrated_lufs(left: &[f32], right: &[f32], sample_rate: u32) -> Option<f64> {
    if sample_rate == 0 {
        return None;
    }
    let block_size = (sample_rate as f64 * 0.4).round() as usize;
    let hop_size = block_size / 4;
    let frames = left.len().min(right.len());
    if frames < block_size || hop_size == 0 {
        return None;
    }

    let weighted_l = k_weight(&left[..frames], sample_rate);
    let weighted_r = k_weight(&right[..frames], sample_rate);

    // Channel weights are 1.0 for L and R; block energy is the sum of
    // per-channel mean squares.
    let mut block_energy = Vec::new();
    let mut pos = 0;
    while pos + block_size <= frames {
        let ms = mean_square(&weighted_l[pos..pos + block_size])
            + mean_square(&weighted_r[pos..pos + block_size]);
        block_energy.push(ms);
        pos += hop_size;
    }

    if block_energy.is_empty() {
        return None;
    }

    let absolute_threshold =
        10.0_f64.powf((ABSOLUTE_GATE_DB - LUFS_REFERENCE_OFFSET) / 10.0);
    let gated: Vec<f64> = block_energy
        .iter()
        .copied()
        .filter(|&ms| ms > absolute_threshold)
        .collect();

    if gated.is_empty() {
        return None; // Essentially silent.
    }

    let ungated_mean = gated.iter().sum::<f64>() / gated.len() as f64;
    let relative_threshold_lufs = mean_square_to_lufs(ungated_mean) + RELATIVE_GATE_OFFSET_DB;
    let relative_threshold =
        10.0_f64.powf((relative_threshold_lufs - LUFS_REFERENCE_OFFSET) / 10.0);

    let final_blocks: Vec<f64> = gated
        .into_iter()
        .filter(|&ms| ms >= relative_threshold)
        .collect();

    if final_blocks.is_empty() {
        return None;
    }

    let lufs =
        mean_square_to_lufs(final_blocks.iter().sum::<f64>() / final_blocks.len() as f64);
    lufs.is_finite().then_some(lufs)
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
    fn full_scale_1khz_sine_lands_near_minus_three_lufs() {
        // A 0 dBFS 1 kHz sine in one channel measures ~-3.01 LUFS (BS.1770
        // test vector territory); allow a generous tolerance for the shelf
        // edge. The same tone in both channels reads 3 dB higher.
        let s = sine(1000.0, 1.0, 48000, 2.0);
        let z = vec![0.0f32; s.len()];
        let lufs = integrated_lufs(&s, &z, 48000).unwrap();
        assert!((lufs + 3.0).abs() < 1.0, "measured {} LUFS", lufs);

        let both = integrated_lufs(&s, &s, 48000).unwrap();
        assert!((both - lufs - 3.0).abs() < 0.1, "dual {} single {}", both, lufs);
    }

    #[test]
    fn quieter_signal_measures_lower() {
        let loud = sine(440.0, 0.5, 44100, 1.0);
        let quiet = sine(440.0, 0.05, 44100, 1.0);
        let l = integrated_lufs(&loud, &loud, 44100).unwrap();
        let q = integrated_lufs(&quiet, &quiet, 44100).unwrap();
        assert!(l > q + 15.0, "loud {} quiet {}", l, q);
    }

    #[test]
    fn silence_is_absent() {
        let z = vec![0.0f32; 48000];
        assert_eq!(integrated_lufs(&z, &z, 48000), None);
    }

    #[test]
    fn too_short_is_absent() {
        let s = sine(440.0, 0.5, 48000, 0.1);
        assert_eq!(integrated_lufs(&s, &s, 48000), None);
    }
}
