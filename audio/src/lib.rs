use std::path::PathBuf;

use thiserror::Error;

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod extract;
pub mod wav;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("cannot read audio at {path}: {source}")]
    UnreadableAudio {
        path: PathBuf,
        source: hound::Error,
    },
    #[error("unsupported sample format ({bits} bit {format:?}) in {path}")]
    UnsupportedFormat {
        path: PathBuf,
        bits: u16,
        format: hound::SampleFormat,
    },
    #[error("signal is empty or entirely silent")]
    DegenerateSignal,
    #[error("boundary {start}..={end} is out of range for a curve of length {len}")]
    Boundary {
        start: usize,
        end: usize,
        len: usize,
    },
}

/// Samples per second, either of a raw signal or of a per-frame curve
/// derived from one.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SampleRate(u32);

impl SampleRate {
    pub const fn new(s: u32) -> SampleRate {
        SampleRate(s)
    }
}

impl From<SampleRate> for u32 {
    fn from(v: SampleRate) -> u32 {
        v.0
    }
}

impl From<SampleRate> for usize {
    fn from(v: SampleRate) -> usize {
        v.0 as usize
    }
}

impl From<SampleRate> for f32 {
    fn from(v: SampleRate) -> f32 {
        v.0 as f32
    }
}
