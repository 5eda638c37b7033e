//! # Error Module
//!
//! The analysis core has no fallible I/O. The only error it can report is a
//! configuration that cannot produce valid frames or a valid period search,
//! and it reports it once, at construction.

use thiserror::Error;

/// A rejected [`AnalyzerConfig`](crate::config::AnalyzerConfig).
///
/// These are not retried: the host has to fix its configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),

    #[error("frame size must be greater than zero")]
    ZeroFrameSize,

    #[error("hop size must be in 1..{frame_size}, got {hop_size}")]
    InvalidHopSize { hop_size: usize, frame_size: usize },

    #[error("frequency range must satisfy 0 < min < max, got {min_hz} Hz..{max_hz} Hz")]
    InvalidFrequencyRange { min_hz: f32, max_hz: f32 },

    #[error("YIN threshold must be inside (0, 1), got {0}")]
    InvalidThreshold(f32),

    /// The frequency range maps to periods that the frame cannot hold.
    #[error("period search {tau_min}..={tau_max} samples does not fit a {frame_size}-sample frame")]
    InvalidPeriodRange {
        tau_min: usize,
        tau_max: usize,
        frame_size: usize,
    },
}
