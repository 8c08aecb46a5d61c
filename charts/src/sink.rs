use std::io;
use std::path::{Path, PathBuf};

use audio::SampleRate;
use ndarray::ArrayView2;
use plotters::prelude::*;
use thiserror::Error;

use crate::{heatmap, waveform};

/// One figure, fully described by data. Replaces the implicit
/// current-figure state of typical plotting environments: every figure
/// is an explicit value handed to a sink.
pub enum Figure<'a> {
    Waveform {
        title: &'a str,
        samples: &'a [f32],
        sample_rate: SampleRate,
    },
    Heatmap {
        title: &'a str,
        matrix: ArrayView2<'a, f64>,
        classes: &'a [String],
        integer_cells: bool,
    },
}

impl Figure<'_> {
    pub fn title(&self) -> &str {
        match self {
            Figure::Waveform { title, .. } => title,
            Figure::Heatmap { title, .. } => title,
        }
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("drawing failed: {0}")]
    Draw(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A display destination for figures. `show` blocks until the figure
/// has been fully rendered (written to disk, or dismissed by whatever
/// interactive frontend an implementation wraps), so callers can rely
/// on figures appearing strictly in call order.
pub trait FigureSink {
    fn show(&mut self, figure: &Figure<'_>) -> Result<(), SinkError>;
}

/// Renders each figure to a numbered PNG file in one directory.
pub struct BitmapSink {
    dir: PathBuf,
    size: (u32, u32),
    rendered: usize,
}

impl BitmapSink {
    pub fn new(dir: &Path) -> io::Result<BitmapSink> {
        BitmapSink::with_size(dir, (800, 600))
    }

    pub fn with_size(dir: &Path, size: (u32, u32)) -> io::Result<BitmapSink> {
        std::fs::create_dir_all(dir)?;
        Ok(BitmapSink {
            dir: dir.to_path_buf(),
            size,
            rendered: 0,
        })
    }
}

impl FigureSink for BitmapSink {
    fn show(&mut self, figure: &Figure<'_>) -> Result<(), SinkError> {
        let path = self.dir.join(figure_file_name(self.rendered, figure.title()));
        {
            let root = BitMapBackend::new(&path, self.size).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;
            match figure {
                Figure::Waveform {
                    title,
                    samples,
                    sample_rate,
                } => waveform::build_waveform_chart(
                    ChartBuilder::on(&root),
                    samples,
                    *sample_rate,
                    title,
                )
                .map_err(draw_err)?,
                Figure::Heatmap {
                    title,
                    matrix,
                    classes,
                    integer_cells,
                } => heatmap::build_heatmap_chart(
                    &root,
                    matrix.view(),
                    classes,
                    title,
                    *integer_cells,
                )
                .map_err(draw_err)?,
            }
            root.present().map_err(draw_err)?;
        }
        log::info!("figure '{}' written to {}", figure.title(), path.display());
        self.rendered += 1;
        Ok(())
    }
}

fn draw_err<E: std::error::Error>(e: E) -> SinkError {
    SinkError::Draw(e.to_string())
}

/// `02-cropped-energy.png` for the second figure titled "cropped energy".
fn figure_file_name(index: usize, title: &str) -> String {
    let slug: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!("{:02}-{}.png", index + 1, slug.trim_matches('-'))
}
