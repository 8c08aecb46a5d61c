use std::collections::BTreeMap;

use charts::{Figure, FigureSink, SinkError};
use ndarray::{Array2, Axis};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfusionError {
    #[error("label sequences differ in length: {left} true vs {right} predicted")]
    LengthMismatch { left: usize, right: usize },
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Counts true-vs-predicted labels into a K×K matrix, where K is the
/// number of distinct labels observed in either sequence and rows and
/// columns follow the labels' sort order. Entry `[i][j]` is the number
/// of samples with true label i predicted as j.
pub fn confusion_matrix<L: Ord>(y_true: &[L], y_pred: &[L]) -> Result<Array2<f64>, ConfusionError> {
    if y_true.len() != y_pred.len() {
        return Err(ConfusionError::LengthMismatch {
            left: y_true.len(),
            right: y_pred.len(),
        });
    }

    let index: BTreeMap<&L, usize> = y_true
        .iter()
        .chain(y_pred.iter())
        .collect::<std::collections::BTreeSet<&L>>()
        .into_iter()
        .zip(0..)
        .collect();

    let k = index.len();
    let mut cm = Array2::<f64>::zeros((k, k));
    for (t, p) in y_true.iter().zip(y_pred.iter()) {
        cm[[index[t], index[p]]] += 1.0;
    }
    Ok(cm)
}

/// Prints and plots a confusion matrix for an evaluation run, returning
/// the (possibly normalized) matrix for further inspection.
///
/// `classes` labels the axis ticks in the given order. It is NOT
/// reordered to match the labels observed in the data: callers must
/// pass class names aligned with the sorted order of distinct labels,
/// or the ticks will be mislabeled.
///
/// With `normalize`, each row is divided by its sum; a true-label class
/// with no samples divides by zero and shows up as NaN in both the
/// printed matrix and the figure. That degeneracy is deliberately left
/// unguarded.
pub fn plot_confusion_matrix<L: Ord, S: FigureSink>(
    y_true: &[L],
    y_pred: &[L],
    classes: &[String],
    normalize: bool,
    title: Option<&str>,
    sink: &mut S,
) -> Result<Array2<f64>, ConfusionError> {
    let mut cm = confusion_matrix(y_true, y_pred)?;

    if normalize {
        let sums = cm.sum_axis(Axis(1));
        for (mut row, sum) in cm.rows_mut().into_iter().zip(sums.iter()) {
            row.mapv_inplace(|v| v / sum);
        }
        println!("Normalized confusion matrix");
    } else {
        println!("Confusion matrix, without normalization");
    }
    print_truncated(&cm);

    let title = title.unwrap_or(if normalize {
        "Normalized confusion matrix"
    } else {
        "Confusion matrix, without normalization"
    });
    sink.show(&Figure::Heatmap {
        title,
        matrix: cm.view(),
        classes,
        integer_cells: !normalize,
    })?;

    Ok(cm)
}

/// Truncates to two decimal digits of the percentage scale without
/// rounding: floor(x * 10000) / 100.
fn truncate_hundredths(v: f64) -> f64 {
    (v * 10000.0).floor() / 100.0
}

fn print_truncated(cm: &Array2<f64>) {
    for row in cm.rows() {
        let cells: Vec<String> = row.iter().map(|&v| truncate_hundredths(v).to_string()).collect();
        println!("[{}]", cells.join(" "));
    }
}
