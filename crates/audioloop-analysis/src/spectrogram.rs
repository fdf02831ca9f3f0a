//! Static spectrogram rendering.
//!
//! The image stacks three panels on a shared time axis: a waveform
//! overview, a mel-scaled magnitude spectrogram, and a chroma (pitch-class)
//! view. Encoding uses fixed compression settings so the same audio always
//! produces a byte-identical file.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};

use crate::error::AnalysisError;
use crate::stft::{bin_hz, magnitude_frames, WINDOW_SIZE};
use crate::wav::Waveform;

/// Image width in pixels; one column covers `frames / WIDTH` STFT frames.
const WIDTH: usize = 1024;

const WAVEFORM_HEIGHT: usize = 160;
const MEL_HEIGHT: usize = 256;
const CHROMA_HEIGHT: usize = 96;

/// Number of mel filters; each maps to two pixel rows.
const MEL_BANDS: usize = 128;

const PITCH_CLASSES: usize = 12;

const BACKGROUND: [u8; 3] = [14, 16, 24];
const WAVEFORM_COLOR: [u8; 3] = [120, 190, 255];

/// Renders the stacked spectrogram PNG.
pub fn write_spectrogram(wave: &Waveform, path: &Path) -> Result<(), AnalysisError> {
    let mono = wave.mono_mix();
    let frames = magnitude_frames(&mono);

    let height = WAVEFORM_HEIGHT + MEL_HEIGHT + CHROMA_HEIGHT;
    let mut pixels = vec![0u8; WIDTH * height * 3];
    for chunk in pixels.chunks_exact_mut(3) {
        chunk.copy_from_slice(&BACKGROUND);
    }

    draw_waveform(&mut pixels, &mono);
    draw_mel(&mut pixels, &frames, wave.sample_rate, WAVEFORM_HEIGHT);
    draw_chroma(
        &mut pixels,
        &frames,
        wave.sample_rate,
        WAVEFORM_HEIGHT + MEL_HEIGHT,
    );

    let file = File::create(path)?;
    let mut encoder = Encoder::new(BufWriter::new(file), WIDTH as u32, height as u32);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);
    // Fixed settings for determinism.
    encoder.set_compression(Compression::Default);
    encoder.set_filter(FilterType::NoFilter);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&pixels)?;
    Ok(())
}

fn put_pixel(pixels: &mut [u8], x: usize, y: usize, color: [u8; 3]) {
    let offset = (y * WIDTH + x) * 3;
    pixels[offset..offset + 3].copy_from_slice(&color);
}

/// Min/max envelope of the samples covered by each pixel column.
fn draw_waveform(pixels: &mut [u8], mono: &[f32]) {
    if mono.is_empty() {
        return;
    }
    let peak = mono.iter().map(|s| s.abs()).fold(0.0f32, f32::max).max(1e-6);
    let mid = WAVEFORM_HEIGHT as f64 / 2.0;

    for x in 0..WIDTH {
        let start = x * mono.len() / WIDTH;
        let end = (((x + 1) * mono.len()) / WIDTH).max(start + 1).min(mono.len());
        let slice = &mono[start..end];
        let lo = slice.iter().copied().fold(f32::INFINITY, f32::min) / peak;
        let hi = slice.iter().copied().fold(f32::NEG_INFINITY, f32::max) / peak;

        let y_top = (mid - hi as f64 * (mid - 1.0)).round() as usize;
        let y_bottom = (mid - lo as f64 * (mid - 1.0)).round() as usize;
        for y in y_top.min(WAVEFORM_HEIGHT - 1)..=y_bottom.min(WAVEFORM_HEIGHT - 1) {
            put_pixel(pixels, x, y, WAVEFORM_COLOR);
        }
    }
}

fn draw_mel(pixels: &mut [u8], frames: &[Vec<f64>], sample_rate: u32, y_offset: usize) {
    if frames.is_empty() {
        return;
    }

    let filters = mel_filterbank(sample_rate);
    // Column-major mel magnitudes, log-compressed.
    let mut columns: Vec<[f64; MEL_BANDS]> = Vec::with_capacity(WIDTH);
    let mut max_value = 0.0f64;
    for x in 0..WIDTH {
        let frame = &frames[x * frames.len() / WIDTH];
        let mut column = [0.0f64; MEL_BANDS];
        for (band, filter) in filters.iter().enumerate() {
            let energy: f64 = filter.iter().map(|&(bin, w)| {
                let m = frame.get(bin).copied().unwrap_or(0.0);
                m * m * w
            }).sum();
            let value = (1.0 + energy).ln();
            column[band] = value;
            max_value = max_value.max(value);
        }
        columns.push(column);
    }
    if max_value <= 0.0 {
        return;
    }

    let rows_per_band = MEL_HEIGHT / MEL_BANDS;
    for (x, column) in columns.iter().enumerate() {
        for (band, &value) in column.iter().enumerate() {
            let color = heat_color(value / max_value);
            // Low frequencies at the bottom.
            let base = y_offset + MEL_HEIGHT - (band + 1) * rows_per_band;
            for row in 0..rows_per_band {
                put_pixel(pixels, x, base + row, color);
            }
        }
    }
}

fn draw_chroma(pixels: &mut [u8], frames: &[Vec<f64>], sample_rate: u32, y_offset: usize) {
    if frames.is_empty() {
        return;
    }

    let rows_per_class = CHROMA_HEIGHT / PITCH_CLASSES;
    for x in 0..WIDTH {
        let frame = &frames[x * frames.len() / WIDTH];
        let mut classes = [0.0f64; PITCH_CLASSES];
        for (bin, &mag) in frame.iter().enumerate() {
            let hz = bin_hz(bin, sample_rate, WINDOW_SIZE);
            if hz < 27.5 || hz > 8000.0 {
                continue;
            }
            // Semitones above A4, folded to a pitch class with C = 0.
            let semitones = 12.0 * (hz / 440.0).log2();
            let class = (semitones.round() as i64 + 9).rem_euclid(12) as usize;
            classes[class] += mag;
        }

        let max = classes.iter().copied().fold(0.0f64, f64::max);
        for (class, &value) in classes.iter().enumerate() {
            let normalized = if max > 0.0 { value / max } else { 0.0 };
            let color = heat_color(normalized);
            // C at the bottom.
            let base = y_offset + CHROMA_HEIGHT - (class + 1) * rows_per_class;
            for row in 0..rows_per_class {
                put_pixel(pixels, x, base + row, color);
            }
        }
    }
}

/// Triangular mel filters as sparse (bin, weight) lists.
fn mel_filterbank(sample_rate: u32) -> Vec<Vec<(usize, f64)>> {
    let bins = WINDOW_SIZE / 2;
    let mel_low = hz_to_mel(0.0);
    let mel_high = hz_to_mel(sample_rate as f64 / 2.0);

    // MEL_BANDS + 2 edge points.
    let edges: Vec<f64> = (0..MEL_BANDS + 2)
        .map(|i| {
            let mel = mel_low + (mel_high - mel_low) * i as f64 / (MEL_BANDS + 1) as f64;
            mel_to_hz(mel)
        })
        .collect();

    (0..MEL_BANDS)
        .map(|band| {
            let (low, center, high) = (edges[band], edges[band + 1], edges[band + 2]);
            let mut filter = Vec::new();
            for bin in 0..bins {
                let hz = bin_hz(bin, sample_rate, WINDOW_SIZE);
                let weight = if hz > low && hz < center {
                    (hz - low) / (center - low)
                } else if hz >= center && hz < high {
                    (high - hz) / (high - center)
                } else {
                    0.0
                };
                if weight > 0.0 {
                    filter.push((bin, weight));
                }
            }
            filter
        })
        .collect()
}

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Dark-blue to yellow heat gradient.
fn heat_color(value: f64) -> [u8; 3] {
    let v = value.clamp(0.0, 1.0);
    let anchors: [(f64, [f64; 3]); 4] = [
        (0.0, [14.0, 16.0, 24.0]),
        (0.35, [59.0, 28.0, 140.0]),
        (0.7, [217.0, 70.0, 90.0]),
        (1.0, [250.0, 230.0, 120.0]),
    ];

    for pair in anchors.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if v <= t1 {
            let t = (v - t0) / (t1 - t0);
            return [
                (c0[0] + (c1[0] - c0[0]) * t).round() as u8,
                (c0[1] + (c1[1] - c0[1]) * t).round() as u8,
                (c0[2] + (c1[2] - c0[2]) * t).round() as u8,
            ];
        }
    }
    [250, 230, 120]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f32, sample_rate: u32, seconds: f32) -> Waveform {
        let samples: Vec<f32> = (0..(sample_rate as f32 * seconds) as usize)
            .map(|i| {
                (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin() * 0.5
            })
            .collect();
        Waveform::from_mono(samples, sample_rate)
    }

    #[test]
    fn writes_a_decodable_png_with_expected_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.png");
        write_spectrogram(&tone(440.0, 44100, 1.0), &path).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!(info.width, WIDTH as u32);
        assert_eq!(
            info.height,
            (WAVEFORM_HEIGHT + MEL_HEIGHT + CHROMA_HEIGHT) as u32
        );
    }

    #[test]
    fn output_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let wave = tone(440.0, 44100, 0.5);
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        write_spectrogram(&wave, &a).unwrap();
        write_spectrogram(&wave, &b).unwrap();
        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }

    #[test]
    fn short_audio_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.png");
        write_spectrogram(&tone(440.0, 44100, 0.01), &path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn mel_scale_round_trips() {
        for hz in [100.0, 1000.0, 8000.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() < 1e-6);
        }
    }
}
