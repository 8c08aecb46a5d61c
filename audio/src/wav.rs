use std::path::Path;

use hound::SampleFormat;

use crate::{AudioError, SampleRate};

/// Decodes a .wav file into a mono f32 signal in [-1, 1]. Multi-channel
/// input is mixed down by averaging across channels per frame.
pub fn read_wav(path: &Path) -> Result<(Vec<f32>, SampleRate), AudioError> {
    let mut reader = hound::WavReader::open(path).map_err(|e| AudioError::UnreadableAudio {
        path: path.to_path_buf(),
        source: e,
    })?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<hound::Result<Vec<f32>>>()
            .map_err(|e| AudioError::UnreadableAudio {
                path: path.to_path_buf(),
                source: e,
            })?,
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| f32::from(v) / 32768.0))
            .collect::<hound::Result<Vec<f32>>>()
            .map_err(|e| AudioError::UnreadableAudio {
                path: path.to_path_buf(),
                source: e,
            })?,
        (format, bits) => {
            return Err(AudioError::UnsupportedFormat {
                path: path.to_path_buf(),
                bits,
                format,
            })
        }
    };

    let samples = mix_down(&interleaved, spec.channels);
    log::debug!(
        "decoded {} frames at {} Hz from {}",
        samples.len(),
        spec.sample_rate,
        path.display()
    );
    Ok((samples, SampleRate::new(spec.sample_rate)))
}

fn mix_down(interleaved: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    let channels = channels as usize;
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_wav(path: &Path, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn reads_mono_i16() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        write_test_wav(&path, 1, &[0, 16384, -16384, 32767]);

        let (samples, rate) = read_wav(&path).unwrap();
        assert_eq!(rate, SampleRate::new(8000));
        assert_eq!(samples.len(), 4);
        assert_relative_eq!(samples[1], 0.5);
        assert_relative_eq!(samples[2], -0.5);
    }

    #[test]
    fn mixes_stereo_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        // Two frames: (L=0.5, R=-0.5) and (L=0.5, R=0.5)
        write_test_wav(&path, 2, &[16384, -16384, 16384, 16384]);

        let (samples, _) = read_wav(&path).unwrap();
        assert_eq!(samples.len(), 2);
        assert_relative_eq!(samples[0], 0.0);
        assert_relative_eq!(samples[1], 0.5);
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = read_wav(Path::new("/nonexistent/clip.wav")).unwrap_err();
        assert!(matches!(err, AudioError::UnreadableAudio { .. }));
    }
}
