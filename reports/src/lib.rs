//! Reporting helpers layered on the `audio` feature extractor and the
//! `charts` figure sinks: array persistence, waveform diagnostics for a
//! single clip, and confusion-matrix evaluation reports.

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod confusion;
pub mod save;
pub mod waves;

#[cfg(test)]
pub(crate) mod testing;

pub use confusion::{confusion_matrix, plot_confusion_matrix, ConfusionError};
pub use save::{save_data, SaveError, DEFAULT_DATA_FILE};
pub use waves::{visualize_waves, WavesError, FEATURE_LENGTH, NATIVE_SAMPLE_RATE};
