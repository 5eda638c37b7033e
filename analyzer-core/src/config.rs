//! # Configuration Module
//!
//! Analysis parameters supplied once by the host when a pipeline is built.
//! A configuration is validated up front and never changes afterwards; to
//! analyze with different settings, build a new pipeline.
//!
//! ## Defaults
//! - Frame size: 2048 samples
//! - Hop size: 512 samples (75% overlap)
//! - Pitch range: 50 Hz to 1000 Hz
//! - YIN threshold: 0.1

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of samples in one analysis frame.
pub const DEFAULT_FRAME_SIZE: usize = 2048;

/// Default number of new samples between consecutive frames.
pub const DEFAULT_HOP_SIZE: usize = 512;

/// Default lowest detectable fundamental, in Hz.
pub const DEFAULT_MIN_FREQUENCY_HZ: f32 = 50.0;

/// Default highest detectable fundamental, in Hz.
pub const DEFAULT_MAX_FREQUENCY_HZ: f32 = 1000.0;

/// Default absolute threshold on the cumulative mean normalized difference.
pub const DEFAULT_YIN_THRESHOLD: f32 = 0.1;

/// Parameters for one [`AnalysisPipeline`](crate::pipeline::AnalysisPipeline).
///
/// Only `sample_rate` is mandatory when deserializing; every other field
/// falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Sample rate of the incoming audio in Hz.
    pub sample_rate: f32,
    /// Samples per analysis frame.
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,
    /// New samples between consecutive frames; must be below `frame_size`.
    #[serde(default = "default_hop_size")]
    pub hop_size: usize,
    /// Lowest fundamental searched for. Sets the longest period, `tau_max`.
    #[serde(default = "default_min_frequency_hz")]
    pub min_frequency_hz: f32,
    /// Highest fundamental searched for. Sets the shortest period, `tau_min`.
    #[serde(default = "default_max_frequency_hz")]
    pub max_frequency_hz: f32,
    /// Absolute CMND threshold a period must fall below, inside (0, 1).
    #[serde(default = "default_yin_threshold")]
    pub yin_threshold: f32,
}

fn default_frame_size() -> usize {
    DEFAULT_FRAME_SIZE
}

fn default_hop_size() -> usize {
    DEFAULT_HOP_SIZE
}

fn default_min_frequency_hz() -> f32 {
    DEFAULT_MIN_FREQUENCY_HZ
}

fn default_max_frequency_hz() -> f32 {
    DEFAULT_MAX_FREQUENCY_HZ
}

fn default_yin_threshold() -> f32 {
    DEFAULT_YIN_THRESHOLD
}

impl AnalyzerConfig {
    /// Creates a configuration with default framing and pitch settings.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frame_size: DEFAULT_FRAME_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            min_frequency_hz: DEFAULT_MIN_FREQUENCY_HZ,
            max_frequency_hz: DEFAULT_MAX_FREQUENCY_HZ,
            yin_threshold: DEFAULT_YIN_THRESHOLD,
        }
    }

    pub fn with_frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size;
        self
    }

    pub fn with_hop_size(mut self, hop_size: usize) -> Self {
        self.hop_size = hop_size;
        self
    }

    pub fn with_frequency_range(mut self, min_hz: f32, max_hz: f32) -> Self {
        self.min_frequency_hz = min_hz;
        self.max_frequency_hz = max_hz;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.yin_threshold = threshold;
        self
    }

    /// Shortest candidate period in samples, `floor(sample_rate / max_frequency_hz)`.
    pub fn tau_min(&self) -> usize {
        (self.sample_rate / self.max_frequency_hz).floor() as usize
    }

    /// Longest candidate period in samples, `floor(sample_rate / min_frequency_hz)`.
    pub fn tau_max(&self) -> usize {
        (self.sample_rate / self.min_frequency_hz).floor() as usize
    }

    /// Seconds between two consecutive results.
    pub fn hop_duration_secs(&self) -> f32 {
        self.hop_size as f32 / self.sample_rate
    }

    /// Checks every parameter and the period range they imply.
    ///
    /// The period search needs `1 <= tau_min <= tau_max < frame_size` so that
    /// every lag compares at least one pair of samples.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if self.frame_size == 0 {
            return Err(ConfigError::ZeroFrameSize);
        }
        if self.hop_size == 0 || self.hop_size >= self.frame_size {
            return Err(ConfigError::InvalidHopSize {
                hop_size: self.hop_size,
                frame_size: self.frame_size,
            });
        }

        let (min_hz, max_hz) = (self.min_frequency_hz, self.max_frequency_hz);
        if !(min_hz.is_finite() && max_hz.is_finite() && min_hz > 0.0 && min_hz < max_hz) {
            return Err(ConfigError::InvalidFrequencyRange { min_hz, max_hz });
        }

        if !(self.yin_threshold > 0.0 && self.yin_threshold < 1.0) {
            return Err(ConfigError::InvalidThreshold(self.yin_threshold));
        }

        let (tau_min, tau_max) = (self.tau_min(), self.tau_max());
        if tau_min == 0 || tau_max >= self.frame_size {
            return Err(ConfigError::InvalidPeriodRange {
                tau_min,
                tau_max,
                frame_size: self.frame_size,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_at_common_rates() {
        for sample_rate in [22050.0, 44100.0, 48000.0, 96000.0] {
            let config = AnalyzerConfig::new(sample_rate);
            assert_eq!(config.validate(), Ok(()), "rate {sample_rate}");
        }
    }

    #[test]
    fn derives_period_range_by_flooring() {
        let config = AnalyzerConfig::new(44100.0);
        assert_eq!(config.tau_min(), 44);
        assert_eq!(config.tau_max(), 882);

        let config = AnalyzerConfig::new(48000.0);
        assert_eq!(config.tau_min(), 48);
        assert_eq!(config.tau_max(), 960);
    }

    #[test]
    fn rejects_bad_sample_rate() {
        for rate in [0.0, -44100.0, f32::NAN, f32::INFINITY] {
            let err = AnalyzerConfig::new(rate).validate().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidSampleRate(_)));
        }
    }

    #[test]
    fn rejects_hop_not_smaller_than_frame() {
        let config = AnalyzerConfig::new(48000.0).with_hop_size(2048);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidHopSize { hop_size: 2048, frame_size: 2048 })
        );
        let config = AnalyzerConfig::new(48000.0).with_hop_size(0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidHopSize { .. })));
        let config = AnalyzerConfig::new(48000.0).with_frame_size(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroFrameSize));
    }

    #[test]
    fn rejects_inverted_frequency_range() {
        let config = AnalyzerConfig::new(48000.0).with_frequency_range(1000.0, 50.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFrequencyRange { .. })
        ));
    }

    #[test]
    fn rejects_threshold_outside_unit_interval() {
        for threshold in [0.0, 1.0, -0.1, 1.5] {
            let config = AnalyzerConfig::new(48000.0).with_threshold(threshold);
            assert_eq!(config.validate(), Err(ConfigError::InvalidThreshold(threshold)));
        }
    }

    #[test]
    fn rejects_period_range_longer_than_frame() {
        // 192 kHz / 50 Hz = 3840 samples, more than a 2048-sample frame.
        let config = AnalyzerConfig::new(192_000.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidPeriodRange {
                tau_min: 192,
                tau_max: 3840,
                frame_size: 2048,
            })
        );

        // 800 Hz / 1000 Hz floors to a zero-sample period.
        let config = AnalyzerConfig::new(800.0).with_frequency_range(5.0, 1000.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPeriodRange { tau_min: 0, .. })
        ));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: AnalyzerConfig =
            serde_json::from_str(r#"{ "sample_rate": 44100.0, "hop_size": 256 }"#).unwrap();
        assert_eq!(config, AnalyzerConfig::new(44100.0).with_hop_size(256));
    }
}
