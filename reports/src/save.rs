use std::path::Path;

use ndarray::{Array1, Array2, Axis};
use ndarray_npy::{write_npy, WriteNpyError};
use thiserror::Error;

pub const DEFAULT_DATA_FILE: &str = "data.npy";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("arrays cannot be stacked: {0}")]
    ShapeMismatch(ndarray::ShapeError),
    #[error("nothing to save")]
    Empty,
    #[error("failed to write array file: {0}")]
    Io(#[from] WriteNpyError),
}

/// Stacks `data` into one (N, len) array and writes it to
/// `save_dir/fname` in .npy format. The stack happens before any file
/// is touched, so a shape mismatch leaves no file behind.
pub fn save_data(save_dir: &Path, data: &[Array1<f32>], fname: &str) -> Result<(), SaveError> {
    if data.is_empty() {
        return Err(SaveError::Empty);
    }
    let views: Vec<_> = data.iter().map(Array1::view).collect();
    let stacked: Array2<f32> = ndarray::stack(Axis(0), &views).map_err(SaveError::ShapeMismatch)?;
    log::debug!("stacked {} arrays into {:?}", data.len(), stacked.shape());

    write_npy(save_dir.join(fname), &stacked)?;
    println!("Data has been saved to {}/{}", save_dir.display(), fname);
    Ok(())
}
