//! Test doubles shared by the reporter tests.

use charts::{Figure, FigureSink, SinkError};
use ndarray::Array2;

/// A figure as seen by the sink, with enough detail for assertions.
pub struct RecordedFigure {
    pub title: String,
    pub samples: Option<Vec<f32>>,
    pub sample_rate: Option<u32>,
    pub matrix: Option<Array2<f64>>,
    pub classes: Option<Vec<String>>,
    pub integer_cells: Option<bool>,
}

/// A `FigureSink` that renders nothing and remembers everything.
#[derive(Default)]
pub struct RecordingSink {
    pub figures: Vec<RecordedFigure>,
}

impl FigureSink for RecordingSink {
    fn show(&mut self, figure: &Figure<'_>) -> Result<(), SinkError> {
        let recorded = match figure {
            Figure::Waveform {
                title,
                samples,
                sample_rate,
            } => RecordedFigure {
                title: (*title).to_string(),
                samples: Some(samples.to_vec()),
                sample_rate: Some(u32::from(*sample_rate)),
                matrix: None,
                classes: None,
                integer_cells: None,
            },
            Figure::Heatmap {
                title,
                matrix,
                classes,
                integer_cells,
            } => RecordedFigure {
                title: (*title).to_string(),
                samples: None,
                sample_rate: None,
                matrix: Some(matrix.to_owned()),
                classes: Some(classes.to_vec()),
                integer_cells: Some(*integer_cells),
            },
        };
        self.figures.push(recorded);
        Ok(())
    }
}
