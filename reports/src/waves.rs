use std::path::Path;

use audio::extract::{FeatureExtractor, WavFeatureExtractor, WindowMethod};
use audio::{AudioError, SampleRate};
use charts::{Figure, FigureSink, SinkError};
use ndarray::Array2;
use thiserror::Error;

/// Sample rate the raw-signal figure is plotted against. Clips are
/// recorded at this rate; derived curves use the caller's frame rate.
pub const NATIVE_SAMPLE_RATE: SampleRate = SampleRate::new(48000);

/// Number of time bins in the global feature summary.
pub const FEATURE_LENGTH: usize = 30;

#[derive(Debug, Error)]
pub enum WavesError {
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("extractor produced no global features")]
    NoFeatures,
    #[error("global feature vectors are ragged")]
    RaggedFeatures,
}

/// Renders the full waveform diagnostic report for one audio clip: six
/// figures (windowed signal, raw signal, zero-crossing rate, energy,
/// and the two activity-boundary crops) followed by feature statistics
/// on stdout.
pub fn visualize_waves<S: FigureSink>(
    path: &Path,
    frame_per_second: u32,
    sink: &mut S,
) -> Result<(), WavesError> {
    let extractor = WavFeatureExtractor::open(path, FEATURE_LENGTH, frame_per_second)?;
    report_waves(&extractor, SampleRate::new(frame_per_second), sink)
}

/// The reporting half of `visualize_waves`, generic over the extractor
/// so it can run against test doubles.
pub fn report_waves<E: FeatureExtractor, S: FigureSink>(
    extractor: &E,
    frame_rate: SampleRate,
    sink: &mut S,
) -> Result<(), WavesError> {
    let origin = extractor.audio_data();
    let kernel = extractor.window(WindowMethod::Square);
    let windowed = extractor.conv1d(&kernel, origin);
    let zero_rate = extractor.avg_zero_rate(origin, &kernel);
    let energy = extractor.energy(origin, &kernel);
    let (start, end) = extractor.boundary(&energy)?;
    log::debug!(
        "activity boundary {start}..={end} over {} frames",
        energy.len()
    );
    let features = extractor.global_features()?;

    sink.show(&Figure::Waveform {
        title: "windowed",
        samples: &windowed,
        sample_rate: frame_rate,
    })?;
    sink.show(&Figure::Waveform {
        title: "origin",
        samples: origin,
        sample_rate: NATIVE_SAMPLE_RATE,
    })?;
    sink.show(&Figure::Waveform {
        title: "azr",
        samples: &zero_rate,
        sample_rate: frame_rate,
    })?;
    sink.show(&Figure::Waveform {
        title: "energy",
        samples: &energy,
        sample_rate: frame_rate,
    })?;
    sink.show(&Figure::Waveform {
        title: "cropped_avg",
        samples: crop(&windowed, start, end)?,
        sample_rate: frame_rate,
    })?;
    sink.show(&Figure::Waveform {
        title: "cropped energy",
        samples: crop(&energy, start, end)?,
        sample_rate: frame_rate,
    })?;

    println!("{}", windowed.len());
    println!("number of features {}", features.len());
    let first = features.first().ok_or(WavesError::NoFeatures)?;
    println!("{first:?}");

    // A total-length check alone would miss ragged rows that happen to
    // flatten to the right size, so every row is compared to the first.
    if features.iter().any(|f| f.len() != first.len()) {
        return Err(WavesError::RaggedFeatures);
    }
    let shape = (features.len(), first.len());
    let flat: Vec<f32> = features.into_iter().flatten().collect();
    let features =
        Array2::from_shape_vec(shape, flat).map_err(|_| WavesError::RaggedFeatures)?;
    println!("{:?}", features.shape());

    Ok(())
}

/// End-inclusive boundary crop; rejects ranges that fall outside the
/// curve instead of silently clamping.
fn crop(curve: &[f32], start: usize, end: usize) -> Result<&[f32], AudioError> {
    if start > end || end >= curve.len() {
        return Err(AudioError::Boundary {
            start,
            end,
            len: curve.len(),
        });
    }
    Ok(&curve[start..=end])
}
