// analyzer-core/src/lib.rs

//! The core logic for the streaming pitch and onset analyzer.
//! This crate turns an unbounded stream of audio chunks into one
//! pitch / loudness / onset estimate per hop. It is completely headless
//! and performs no device or file I/O.

pub mod config;
pub mod error;
pub mod framer;
pub mod onset;
pub mod pipeline;
pub mod pitch;
pub mod worker;

pub use config::AnalyzerConfig;
pub use error::ConfigError;
pub use framer::RingFramer;
pub use onset::EnergyOnsetDetector;
pub use pipeline::AnalysisPipeline;
pub use pitch::YinEstimator;
pub use worker::AnalysisWorker;

use serde::{Deserialize, Serialize};

/// Represents the result of a single audio analysis frame.
///
/// On the wire the fields are named `freq`, `rms` and `onset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Estimated fundamental frequency in Hz. `0.0` means no pitch was found.
    #[serde(rename = "freq")]
    pub frequency_hz: f32,
    /// Root mean square loudness of the frame.
    pub rms: f32,
    /// Increase in RMS since the previous frame, never negative.
    pub onset: f32,
}

impl AnalysisResult {
    /// Whether a pitch was detected. Unvoiced frames report `0.0` Hz, which
    /// must not be read as a real frequency.
    pub fn is_voiced(&self) -> bool {
        self.frequency_hz > 0.0
    }
}
