//! WAV loading into a stereo-shaped waveform.
//!
//! Every waveform is stereo-shaped regardless of the file's channel count:
//! mono input is duplicated into both slots so downstream feature code never
//! special-cases channel count. Files with more than two channels keep their
//! first two.

use std::path::Path;

use crate::error::AnalysisError;

/// Decoded audio, normalized to [-1.0, 1.0] per channel.
#[derive(Debug, Clone)]
pub struct Waveform {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples (a copy of left for mono input).
    pub right: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count of the source file (1 for mono, before duplication).
    pub source_channels: u16,
}

impl Waveform {
    /// Loads a WAV file.
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        if !path.exists() {
            return Err(AnalysisError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut reader = hound::WavReader::open(path).map_err(|e| AnalysisError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| AnalysisError::Unreadable {
                    path: path.to_path_buf(),
                    source: e,
                })?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()
                    .map_err(|e| AnalysisError::Unreadable {
                        path: path.to_path_buf(),
                        source: e,
                    })?
            }
        };

        if interleaved.is_empty() {
            return Err(AnalysisError::EmptyAudio {
                path: path.to_path_buf(),
            });
        }

        Ok(Self::from_interleaved(
            &interleaved,
            spec.channels,
            spec.sample_rate,
        ))
    }

    /// Builds a waveform from interleaved samples.
    pub fn from_interleaved(interleaved: &[f32], channels: u16, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        if channels == 1 {
            return Self::from_mono(interleaved.to_vec(), sample_rate);
        }

        let step = channels as usize;
        let frames = interleaved.len() / step;
        let mut left = Vec::with_capacity(frames);
        let mut right = Vec::with_capacity(frames);
        for frame in interleaved.chunks_exact(step) {
            left.push(frame[0]);
            right.push(frame[1]);
        }

        Self {
            left,
            right,
            sample_rate,
            source_channels: channels,
        }
    }

    /// Builds a stereo-shaped waveform from a mono signal.
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            right: samples.clone(),
            left: samples,
            sample_rate,
            source_channels: 1,
        }
    }

    /// Builds a waveform from explicit channels.
    pub fn from_channels(left: Vec<f32>, right: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            left,
            right,
            sample_rate,
            source_channels: 2,
        }
    }

    /// Number of sample frames.
    pub fn frames(&self) -> usize {
        self.left.len()
    }

    /// Duration in seconds.
    pub fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// (L+R)/2 mono mix.
    pub fn mono_mix(&self) -> Vec<f32> {
        self.left
            .iter()
            .zip(&self.right)
            .map(|(&l, &r)| (l + r) * 0.5)
            .collect()
    }

    /// Peak absolute amplitude across both channels.
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(&self.right)
            .map(|s| s.abs())
            .fold(0.0f32, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_is_duplicated_into_both_slots() {
        let wave = Waveform::from_mono(vec![0.1, -0.2, 0.3], 44100);
        assert_eq!(wave.left, wave.right);
        assert_eq!(wave.source_channels, 1);
        assert_eq!(wave.frames(), 3);
    }

    #[test]
    fn interleaved_stereo_is_split() {
        let wave = Waveform::from_interleaved(&[0.1, -0.1, 0.2, -0.2], 2, 48000);
        assert_eq!(wave.left, vec![0.1, 0.2]);
        assert_eq!(wave.right, vec![-0.1, -0.2]);
        assert_eq!(wave.source_channels, 2);
    }

    #[test]
    fn mono_mix_averages_channels() {
        let wave = Waveform::from_channels(vec![1.0, 0.0], vec![0.0, 1.0], 44100);
        assert_eq!(wave.mono_mix(), vec![0.5, 0.5]);
    }

    #[test]
    fn duration_follows_sample_rate() {
        let wave = Waveform::from_mono(vec![0.0; 44100], 44100);
        assert!((wave.duration_sec() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn load_rejects_missing_file() {
        let err = Waveform::load(Path::new("/no/such/file.wav")).unwrap_err();
        assert!(matches!(err, AnalysisError::FileNotFound { .. }));
    }

    #[test]
    fn load_round_trips_a_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..2205 {
            let s = ((i as f32 * 0.05).sin() * 0.5 * i16::MAX as f32) as i16;
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let wave = Waveform::load(&path).unwrap();
        assert_eq!(wave.sample_rate, 22050);
        assert_eq!(wave.source_channels, 1);
        assert_eq!(wave.frames(), 2205);
        assert!(wave.peak() <= 0.51);
    }
}
