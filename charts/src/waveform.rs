use audio::SampleRate;
use plotters::prelude::*;

pub fn build_waveform_chart<DB: DrawingBackend>(
    mut builder: ChartBuilder<DB>,
    samples: &[f32],
    sample_rate: SampleRate,
    title: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let rate = f32::from(sample_rate);
    let duration = samples.len().max(1) as f32 / rate;
    // Symmetric y range padded a little past the peak, so flat signals
    // still get a visible axis.
    let amp = samples
        .iter()
        .fold(0f32, |acc, s| acc.max(s.abs()))
        .max(1e-3)
        * 1.1;

    let mut chart = builder
        .margin(20)
        .caption(title, ("sans-serif", 24))
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0f32..duration, -amp..amp)?;

    chart
        .configure_mesh()
        .x_max_light_lines(0)
        .y_max_light_lines(0)
        .y_desc("Amplitude (FS)")
        .x_desc("Time (s)")
        .draw()?;

    let series = samples
        .iter()
        .enumerate()
        .map(|(i, &y)| (i as f32 / rate, y));
    chart.draw_series(LineSeries::new(series, &RED))?;

    Ok(())
}
