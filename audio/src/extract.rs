use std::path::Path;

use crate::{wav, AudioError, SampleRate};

/// Fraction of the peak frame energy a frame must reach to count as
/// active when locating the activity boundary.
const ACTIVITY_THRESHOLD_RATIO: f32 = 0.1;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WindowMethod {
    Square,
    Hann,
}

/// The feature-extraction capability the reporters are written against.
///
/// Per-frame curves (`conv1d`, `avg_zero_rate`, `energy`) are sampled at
/// one value per kernel-length frame, so they live at the extractor's
/// frame rate rather than the native sample rate.
pub trait FeatureExtractor {
    /// The raw decoded signal, mono, full scale [-1, 1].
    fn audio_data(&self) -> &[f32];

    /// A window kernel one frame long, normalized to unit sum.
    fn window(&self, method: WindowMethod) -> Vec<f32>;

    /// Frame-strided convolution of `kernel` with `signal`: one
    /// kernel-weighted sum per non-overlapping frame.
    fn conv1d(&self, kernel: &[f32], signal: &[f32]) -> Vec<f32>;

    /// Per-frame rate of sign changes; the kernel only defines the
    /// frame length.
    fn avg_zero_rate(&self, signal: &[f32], kernel: &[f32]) -> Vec<f32>;

    /// Per-frame kernel-weighted sum of squared samples.
    fn energy(&self, signal: &[f32], kernel: &[f32]) -> Vec<f32>;

    /// Inclusive (start, end) frame range of the active region of an
    /// energy curve.
    fn boundary(&self, energy: &[f32]) -> Result<(usize, usize), AudioError>;

    /// Fixed-length summary of the active region: one feature vector
    /// per time bin.
    fn global_features(&self) -> Result<Vec<Vec<f32>>, AudioError>;
}

/// `FeatureExtractor` backed by a decoded .wav clip.
pub struct WavFeatureExtractor {
    samples: Vec<f32>,
    native_rate: SampleRate,
    frame_len: usize,
    feature_length: usize,
}

impl WavFeatureExtractor {
    /// Decodes `path` and fixes the frame length so that per-frame
    /// curves come out at `frame_per_second` values per second.
    pub fn open(
        path: &Path,
        feature_length: usize,
        frame_per_second: u32,
    ) -> Result<WavFeatureExtractor, AudioError> {
        let (samples, native_rate) = wav::read_wav(path)?;
        if samples.is_empty() {
            return Err(AudioError::DegenerateSignal);
        }
        let frame_len = (u32::from(native_rate) / frame_per_second.max(1)).max(1) as usize;
        Ok(WavFeatureExtractor {
            samples,
            native_rate,
            frame_len,
            feature_length,
        })
    }

    pub fn native_rate(&self) -> SampleRate {
        self.native_rate
    }
}

impl FeatureExtractor for WavFeatureExtractor {
    fn audio_data(&self) -> &[f32] {
        &self.samples
    }

    fn window(&self, method: WindowMethod) -> Vec<f32> {
        match method {
            WindowMethod::Square => square_window(self.frame_len),
            WindowMethod::Hann => hann_window(self.frame_len),
        }
    }

    fn conv1d(&self, kernel: &[f32], signal: &[f32]) -> Vec<f32> {
        frames(signal, kernel.len())
            .map(|frame| {
                frame
                    .iter()
                    .zip(kernel.iter())
                    .map(|(s, k)| s * k)
                    .sum::<f32>()
            })
            .collect()
    }

    fn avg_zero_rate(&self, signal: &[f32], kernel: &[f32]) -> Vec<f32> {
        frames(signal, kernel.len()).map(zero_rate).collect()
    }

    fn energy(&self, signal: &[f32], kernel: &[f32]) -> Vec<f32> {
        frames(signal, kernel.len())
            .map(|frame| {
                frame
                    .iter()
                    .zip(kernel.iter())
                    .map(|(s, k)| s * s * k)
                    .sum::<f32>()
            })
            .collect()
    }

    fn boundary(&self, energy: &[f32]) -> Result<(usize, usize), AudioError> {
        let peak = energy.iter().cloned().fold(0.0f32, f32::max);
        if energy.is_empty() || peak <= 0.0 {
            return Err(AudioError::DegenerateSignal);
        }
        let threshold = peak * ACTIVITY_THRESHOLD_RATIO;
        let start = energy.iter().position(|&e| e >= threshold);
        let end = energy.iter().rposition(|&e| e >= threshold);
        match (start, end) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(AudioError::DegenerateSignal),
        }
    }

    fn global_features(&self) -> Result<Vec<Vec<f32>>, AudioError> {
        let kernel = self.window(WindowMethod::Square);
        let envelope = self.conv1d(&kernel, &self.samples);
        let energy = self.energy(&self.samples, &kernel);
        let zero_rate = self.avg_zero_rate(&self.samples, &kernel);

        let (start, end) = self.boundary(&energy)?;
        let envelope = resample_bins(&envelope[start..=end], self.feature_length);
        let energy = resample_bins(&energy[start..=end], self.feature_length);
        let zero_rate = resample_bins(&zero_rate[start..=end], self.feature_length);

        Ok(envelope
            .into_iter()
            .zip(energy)
            .zip(zero_rate)
            .map(|((v, e), z)| vec![v, e, z])
            .collect())
    }
}

fn frames(signal: &[f32], frame_len: usize) -> impl Iterator<Item = &[f32]> {
    signal.chunks_exact(frame_len.max(1))
}

pub fn square_window(len: usize) -> Vec<f32> {
    let len = len.max(1);
    vec![1.0 / len as f32; len]
}

pub fn hann_window(len: usize) -> Vec<f32> {
    use std::f32::consts::PI;
    let len = len.max(1);
    if len == 1 {
        return vec![1.0];
    }
    let raw: Vec<f32> = (0..len)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / (len - 1) as f32).cos()))
        .collect();
    let sum: f32 = raw.iter().sum();
    raw.iter().map(|w| w / sum).collect()
}

fn zero_rate(frame: &[f32]) -> f32 {
    if frame.len() < 2 {
        return 0.0;
    }
    let crossings = frame
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();
    crossings as f32 / (frame.len() - 1) as f32
}

/// Reduces `curve` to `bins` values by averaging. Bins always cover at
/// least one sample, so curves shorter than `bins` repeat samples
/// instead of producing empty bins.
fn resample_bins(curve: &[f32], bins: usize) -> Vec<f32> {
    let n = curve.len();
    if n == 0 {
        return vec![0.0; bins];
    }
    (0..bins)
        .map(|b| {
            let lo = (b * n / bins).min(n - 1);
            let hi = (((b + 1) * n / bins).max(lo + 1)).min(n);
            curve[lo..hi].iter().sum::<f32>() / (hi - lo) as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Extractor over a synthetic signal, bypassing file I/O.
    fn extractor(samples: Vec<f32>, frame_len: usize) -> WavFeatureExtractor {
        WavFeatureExtractor {
            samples,
            native_rate: SampleRate::new(8000),
            frame_len,
            feature_length: 4,
        }
    }

    /// 0.25 s silence, 0.5 s loud alternating tone, 0.25 s silence,
    /// at 16 samples per frame.
    fn silence_tone_silence() -> Vec<f32> {
        let mut s = vec![0.0; 64];
        s.extend((0..128).map(|i| if i % 2 == 0 { 0.8 } else { -0.8 }));
        s.extend(vec![0.0; 64]);
        s
    }

    #[test]
    fn square_window_sums_to_one() {
        let w = square_window(16);
        assert_eq!(w.len(), 16);
        assert_relative_eq!(w.iter().sum::<f32>(), 1.0);
    }

    #[test]
    fn hann_window_sums_to_one() {
        let w = hann_window(16);
        assert_relative_eq!(w.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        // tapered at the edges, full in the middle
        assert!(w[0] < w[8]);
    }

    #[test]
    fn conv1d_averages_each_frame() {
        let ex = extractor(vec![1.0; 8], 4);
        let kernel = square_window(4);
        let out = ex.conv1d(&kernel, &[2.0, 2.0, 2.0, 2.0, 4.0, 4.0, 4.0, 4.0]);
        assert_eq!(out.len(), 2);
        assert_relative_eq!(out[0], 2.0);
        assert_relative_eq!(out[1], 4.0);
    }

    #[test]
    fn conv1d_drops_partial_trailing_frame() {
        let ex = extractor(vec![0.0; 10], 4);
        let kernel = square_window(4);
        assert_eq!(ex.conv1d(&kernel, &vec![1.0; 10]).len(), 2);
    }

    #[test]
    fn zero_rate_of_alternating_signal_is_one() {
        let ex = extractor(vec![0.0; 16], 8);
        let kernel = square_window(8);
        let alternating: Vec<f32> = (0..16).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let zcr = ex.avg_zero_rate(&alternating, &kernel);
        assert_eq!(zcr.len(), 2);
        assert_relative_eq!(zcr[0], 1.0);
        assert_relative_eq!(zcr[1], 1.0);
    }

    #[test]
    fn zero_rate_of_constant_signal_is_zero() {
        let ex = extractor(vec![0.0; 16], 8);
        let kernel = square_window(8);
        let zcr = ex.avg_zero_rate(&[0.5; 16], &kernel);
        assert_relative_eq!(zcr[0], 0.0);
    }

    #[test]
    fn energy_localizes_a_burst() {
        let signal = silence_tone_silence();
        let ex = extractor(signal.clone(), 16);
        let kernel = square_window(16);
        let energy = ex.energy(&signal, &kernel);
        assert_eq!(energy.len(), 16);
        assert_relative_eq!(energy[0], 0.0);
        assert!(energy[8] > 0.5);
        assert_relative_eq!(energy[15], 0.0);
    }

    #[test]
    fn boundary_brackets_the_tone() {
        let signal = silence_tone_silence();
        let ex = extractor(signal.clone(), 16);
        let kernel = square_window(16);
        let energy = ex.energy(&signal, &kernel);
        let (start, end) = ex.boundary(&energy).unwrap();
        assert_eq!((start, end), (4, 11));
    }

    #[test]
    fn boundary_of_silence_is_degenerate() {
        let ex = extractor(vec![0.0; 64], 16);
        let kernel = square_window(16);
        let energy = ex.energy(&vec![0.0; 64], &kernel);
        assert!(matches!(
            ex.boundary(&energy),
            Err(AudioError::DegenerateSignal)
        ));
    }

    #[test]
    fn global_features_are_rectangular() {
        let ex = extractor(silence_tone_silence(), 16);
        let features = ex.global_features().unwrap();
        assert_eq!(features.len(), 4);
        assert!(features.iter().all(|f| f.len() == 3));
    }

    #[test]
    fn resample_bins_shrinks_and_stretches() {
        assert_eq!(resample_bins(&[1.0, 1.0, 3.0, 3.0], 2), vec![1.0, 3.0]);
        assert_eq!(resample_bins(&[2.0], 3), vec![2.0, 2.0, 2.0]);
    }
}
