//! Shared short-time FFT plumbing.
//!
//! All spectral features work from Hann-windowed magnitude frames with a
//! fixed window and hop. Signals shorter than one window are analyzed as a
//! single zero-padded frame so short renders still produce a full schema.

use rustfft::{num_complex::Complex, FftPlanner};

/// Analysis window length in samples.
pub(crate) const WINDOW_SIZE: usize = 2048;

/// Hop between successive frames.
pub(crate) const HOP_SIZE: usize = 512;

/// Frequency of an FFT bin in Hz.
pub(crate) fn bin_hz(bin: usize, sample_rate: u32, fft_size: usize) -> f64 {
    bin as f64 * sample_rate as f64 / fft_size as f64
}

/// Computes Hann-windowed magnitude spectra over the signal.
///
/// Each frame holds `WINDOW_SIZE / 2` positive-frequency magnitudes.
pub(crate) fn magnitude_frames(samples: &[f32]) -> Vec<Vec<f64>> {
    magnitude_frames_with(samples, WINDOW_SIZE, HOP_SIZE)
}

/// Like [`magnitude_frames`] with explicit framing parameters.
pub(crate) fn magnitude_frames_with(
    samples: &[f32],
    window_size: usize,
    hop_size: usize,
) -> Vec<Vec<f64>> {
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(window_size);
    let window = hann_window(window_size);

    let mut frames = Vec::new();
    let mut buffer: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); window_size];

    let mut emit = |frame: &[f32], buffer: &mut Vec<Complex<f32>>, frames: &mut Vec<Vec<f64>>| {
        for (i, slot) in buffer.iter_mut().enumerate() {
            let s = frame.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(s * window[i], 0.0);
        }
        fft.process(buffer);
        frames.push(
            buffer
                .iter()
                .take(window_size / 2)
                .map(|c| ((c.re * c.re + c.im * c.im) as f64).sqrt())
                .collect(),
        );
    };

    if samples.len() < window_size {
        emit(samples, &mut buffer, &mut frames);
        return frames;
    }

    let mut pos = 0;
    while pos + window_size <= samples.len() {
        emit(&samples[pos..pos + window_size], &mut buffer, &mut frames);
        pos += hop_size;
    }

    frames
}

/// Total power spectrum accumulated over all frames.
pub(crate) fn accumulated_power(samples: &[f32]) -> Vec<f64> {
    let frames = magnitude_frames(samples);
    let bins = frames.first().map(|f| f.len()).unwrap_or(0);
    let mut power = vec![0.0f64; bins];
    for frame in &frames {
        for (slot, &m) in power.iter_mut().zip(frame) {
            *slot += m * m;
        }
    }
    power
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos()))
        .collect()
}
