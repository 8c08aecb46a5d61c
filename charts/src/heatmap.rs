use ndarray::ArrayView2;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const COLORBAR_WIDTH: u32 = 70;
const COLORBAR_STEPS: usize = 64;

/// Draws an annotated heat map of a square matrix, with a colorbar on
/// the right and one tick per class on each axis.
///
/// `classes` is used in the given order; it is NOT reordered to match
/// the labels observed in the data, so callers must align it with the
/// ordering used to build the matrix.
pub fn build_heatmap_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    matrix: ArrayView2<f64>,
    classes: &[String],
    title: &str,
    integer_cells: bool,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let k = matrix.nrows();
    if k == 0 {
        return Ok(());
    }
    let max = finite_max(matrix);

    let (w, _) = root.dim_in_pixel();
    let (main, bar) = root.split_horizontally(w.saturating_sub(COLORBAR_WIDTH) as i32);

    // Cells are centered on integer coordinates, matrix row 0 at the
    // top (descending y range).
    let extent = k as f64 - 0.5;
    let mut chart = ChartBuilder::on(&main)
        .margin(15)
        .caption(title, ("sans-serif", 24))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..extent, extent..-0.5f64)?;

    let class_label = |v: &f64| -> String {
        let i = v.round();
        if (v - i).abs() > 0.25 || i < 0.0 {
            return String::new();
        }
        classes.get(i as usize).cloned().unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(k + 1)
        .y_labels(k + 1)
        .x_label_formatter(&class_label)
        .y_label_formatter(&class_label)
        .x_desc("Predicted label")
        .y_desc("True label")
        .draw()?;

    chart.draw_series(matrix.indexed_iter().map(|((i, j), &v)| {
        let t = if v.is_finite() && max > 0.0 {
            (v / max).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Rectangle::new(
            [
                (j as f64 - 0.5, i as f64 - 0.5),
                (j as f64 + 0.5, i as f64 + 0.5),
            ],
            blues(t).filled(),
        )
    }))?;

    for ((i, j), &v) in matrix.indexed_iter() {
        let text_color = cell_text_color(v, max);
        let style = TextStyle::from(("sans-serif", 16).into_font())
            .color(&text_color)
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart.draw_series(std::iter::once(Text::new(
            format_cell(v, integer_cells),
            (j as f64, i as f64),
            style,
        )))?;
    }

    draw_colorbar(&bar, max)?;
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    max: f64,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let top = if max > 0.0 { max } else { 1.0 };
    let mut chart = ChartBuilder::on(area)
        .margin_top(50)
        .margin_bottom(40)
        .margin_right(10)
        .y_label_area_size(35)
        .build_cartesian_2d(0f64..1f64, 0f64..top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(1)
        .y_labels(6)
        .draw()?;

    chart.draw_series((0..COLORBAR_STEPS).map(|i| {
        let t0 = i as f64 / COLORBAR_STEPS as f64;
        let t1 = (i + 1) as f64 / COLORBAR_STEPS as f64;
        Rectangle::new([(0.0, t0 * top), (1.0, t1 * top)], blues(t0).filled())
    }))?;

    Ok(())
}

/// White text on dark cells, black on light ones. The low side is
/// inclusive: a value of exactly max/2 stays black.
pub fn cell_text_color(value: f64, max: f64) -> RGBColor {
    if value > max / 2.0 {
        WHITE
    } else {
        BLACK
    }
}

pub fn format_cell(value: f64, integer_cells: bool) -> String {
    if integer_cells {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

/// Sequential white-to-blue ramp, light at 0 and dark at 1.
fn blues(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: f64, b: f64| (a + t * (b - a)).round() as u8;
    RGBColor(lerp(247.0, 8.0), lerp(251.0, 48.0), lerp(255.0, 107.0))
}

fn finite_max(matrix: ArrayView2<f64>) -> f64 {
    matrix
        .iter()
        .filter(|v| v.is_finite())
        .fold(0.0f64, |acc, &v| acc.max(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use plotters::backend::RGBPixel;

    #[test]
    fn text_contrast_threshold_is_inclusive_below() {
        assert_eq!(cell_text_color(2.0, 4.0), BLACK);
        assert_eq!(cell_text_color(2.1, 4.0), WHITE);
        assert_eq!(cell_text_color(0.0, 4.0), BLACK);
        // NaN cells never compare greater, so they stay black
        assert_eq!(cell_text_color(f64::NAN, 4.0), BLACK);
    }

    #[test]
    fn cells_format_like_counts_or_fractions() {
        assert_eq!(format_cell(3.0, true), "3");
        assert_eq!(format_cell(0.5, false), "0.50");
        assert_eq!(format_cell(f64::NAN, false), "NaN");
    }

    #[test]
    fn ramp_runs_light_to_dark() {
        assert_eq!(blues(0.0), RGBColor(247, 251, 255));
        assert_eq!(blues(1.0), RGBColor(8, 48, 107));
    }

    #[test]
    fn renders_a_matrix() {
        let cm = array![[1.0, 1.0], [0.0, 2.0]];
        let classes = vec!["yes".to_string(), "no".to_string()];
        let mut buffer = vec![0u8; 480 * 360 * 3];
        let root = BitMapBackend::<RGBPixel>::with_buffer_and_format(&mut buffer, (480, 360))
            .unwrap()
            .into_drawing_area();
        root.fill(&WHITE).unwrap();
        build_heatmap_chart(&root, cm.view(), &classes, "Confusion matrix", true).unwrap();
        root.present().unwrap();
    }

    #[test]
    fn tolerates_nan_entries() {
        let cm = array![[f64::NAN, f64::NAN], [0.0, 1.0]];
        let classes = vec!["a".to_string(), "b".to_string()];
        let mut buffer = vec![0u8; 480 * 360 * 3];
        let root = BitMapBackend::<RGBPixel>::with_buffer_and_format(&mut buffer, (480, 360))
            .unwrap()
            .into_drawing_area();
        root.fill(&WHITE).unwrap();
        build_heatmap_chart(&root, cm.view(), &classes, "Normalized confusion matrix", false)
            .unwrap();
    }
}
