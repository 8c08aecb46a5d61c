use std::path::PathBuf;

use charts::BitmapSink;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(about = "Render waveform diagnostics and classifier evaluation figures")]
struct Args {
    /// Directory the rendered figures are written to
    #[arg(short, long, default_value = "figures")]
    out: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the six-figure waveform diagnostic report for a clip
    Waves {
        /// The .wav file to analyze
        path: PathBuf,
        /// Frame rate (Hz) for the derived per-frame curves
        #[arg(short, long, default_value_t = 100)]
        frame_per_second: u32,
    },
    /// Print and render a confusion matrix for an evaluation run
    Confusion {
        /// True labels, comma separated
        #[arg(long, value_delimiter = ',')]
        y_true: Vec<String>,
        /// Predicted labels, comma separated
        #[arg(long, value_delimiter = ',')]
        y_pred: Vec<String>,
        /// Class names for the axis ticks, in sorted label order
        #[arg(long, value_delimiter = ',')]
        classes: Vec<String>,
        /// Divide each row by its sum
        #[arg(long)]
        normalize: bool,
        /// Figure title (defaults by normalization mode)
        #[arg(long)]
        title: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut sink = BitmapSink::new(&args.out)?;

    match args.command {
        Command::Waves {
            path,
            frame_per_second,
        } => {
            reports::visualize_waves(&path, frame_per_second, &mut sink)?;
        }
        Command::Confusion {
            y_true,
            y_pred,
            classes,
            normalize,
            title,
        } => {
            reports::plot_confusion_matrix(
                &y_true,
                &y_pred,
                &classes,
                normalize,
                title.as_deref(),
                &mut sink,
            )?;
        }
    }
    Ok(())
}
