pub mod heatmap;
pub mod sink;
pub mod waveform;

pub use sink::{BitmapSink, Figure, FigureSink, SinkError};
