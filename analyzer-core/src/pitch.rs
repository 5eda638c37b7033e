//! # Pitch Detection Module
//!
//! This module implements the YIN pitch estimator used on every analysis frame.
//! It is built for streaming use: all scratch memory is allocated once when the
//! estimator is created and reused for every frame afterwards.
//!
//! ## Algorithm
//! 1. Squared difference function over every candidate period `tau`
//! 2. Cumulative mean normalized difference (CMND)
//! 3. Absolute threshold search, descending to the bottom of the first dip
//! 4. Parabolic interpolation for sub-sample accuracy

use crate::config::AnalyzerConfig;
use crate::error::ConfigError;

/// Floor for the CMND and interpolation denominators.
pub const EPSILON: f32 = 1e-12;

/// A reusable YIN pitch estimator for frames of one fixed size.
///
/// The estimator keeps two scratch buffers of `tau_max + 1` entries each.
/// Their contents between calls carry no meaning; `estimate` overwrites them
/// completely, so repeated calls on the same frame give identical results.
#[derive(Debug, Clone)]
pub struct YinEstimator {
    sample_rate: f32,
    frame_size: usize,
    tau_min: usize,
    tau_max: usize,
    threshold: f32,

    // Pre-allocated buffers, indexed by tau
    diff: Vec<f32>,
    cmnd: Vec<f32>,
}

impl YinEstimator {
    /// Creates an estimator for the frame size and pitch range in `config`.
    ///
    /// # Arguments
    /// * `config` - Analysis configuration; validated before use
    ///
    /// # Returns
    /// * `Ok(estimator)` - Ready to analyze frames of `config.frame_size` samples
    /// * `Err(e)` - The configuration cannot support a period search
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let tau_min = config.tau_min();
        let tau_max = config.tau_max();
        log::debug!(
            "YIN estimator: {} Hz, frame {} samples, tau {}..={}, threshold {}",
            config.sample_rate,
            config.frame_size,
            tau_min,
            tau_max,
            config.yin_threshold
        );

        Ok(Self {
            sample_rate: config.sample_rate,
            frame_size: config.frame_size,
            tau_min,
            tau_max,
            threshold: config.yin_threshold,
            diff: vec![0.0; tau_max + 1],
            cmnd: vec![0.0; tau_max + 1],
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Inclusive range of candidate periods searched, in samples.
    pub fn tau_range(&self) -> (usize, usize) {
        (self.tau_min, self.tau_max)
    }

    /// Estimates the fundamental frequency of one frame.
    ///
    /// # Arguments
    /// * `frame` - Exactly `frame_size` samples
    ///
    /// # Returns
    /// * Frequency in Hz, or `0.0` when no period clears the threshold
    ///   (silence, noise, or a pitch outside the configured range)
    ///
    /// # Panics
    /// * If `frame` is not exactly `frame_size` samples long
    pub fn estimate(&mut self, frame: &[f32]) -> f32 {
        assert_eq!(
            frame.len(),
            self.frame_size,
            "YIN frames must be exactly frame_size samples"
        );

        self.difference(frame);
        self.cumulative_mean_normalized();

        match self.absolute_threshold() {
            Some(tau) => self.sample_rate / self.parabolic_interpolation(tau),
            None => 0.0,
        }
    }

    /// `d[tau] = sum (x[i] - x[i + tau])^2` over every pair inside the frame.
    ///
    /// Summed in index order, in single precision.
    fn difference(&mut self, frame: &[f32]) {
        let window = frame.len();
        self.diff[0] = 0.0;
        for tau in 1..=self.tau_max {
            let mut sum = 0.0f32;
            for (a, b) in frame[..window - tau].iter().zip(&frame[tau..]) {
                let delta = a - b;
                sum += delta * delta;
            }
            self.diff[tau] = sum;
        }
    }

    /// `cmnd[tau] = d[tau] * tau / sum(d[1..=tau])`, with `cmnd[0] = 1`.
    ///
    /// A running sum below `EPSILON` means every lag so far compared identical
    /// samples (silence or DC). That is 0/0, not a perfect period, so it maps
    /// to 1 and can never cross the threshold.
    fn cumulative_mean_normalized(&mut self) {
        self.cmnd[0] = 1.0;
        let mut running = 0.0f32;
        for tau in 1..=self.tau_max {
            running += self.diff[tau];
            self.cmnd[tau] = if running < EPSILON {
                1.0
            } else {
                self.diff[tau] * tau as f32 / running
            };
        }
    }

    /// Finds the first dip below the threshold inside `tau_min..=tau_max`.
    ///
    /// After the first crossing, walk right while the CMND keeps strictly
    /// decreasing so the bottom of the dip is returned, not its edge.
    fn absolute_threshold(&self) -> Option<usize> {
        let mut tau = self.tau_min;
        while tau <= self.tau_max {
            if self.cmnd[tau] < self.threshold {
                while tau < self.tau_max && self.cmnd[tau + 1] < self.cmnd[tau] {
                    tau += 1;
                }
                return Some(tau);
            }
            tau += 1;
        }
        None
    }

    /// Refines an integer period to a fractional one.
    ///
    /// Fits a parabola through `(tau-1, tau, tau+1)` and returns its vertex.
    /// At the edges of the computed range the centre point stands in for the
    /// missing neighbour.
    fn parabolic_interpolation(&self, tau: usize) -> f32 {
        let x0 = if tau > 1 { tau - 1 } else { tau };
        let x2 = if tau < self.tau_max { tau + 1 } else { tau };

        let s0 = self.cmnd[x0];
        let s1 = self.cmnd[tau];
        let s2 = self.cmnd[x2];

        let denominator = 2.0 * (2.0 * s1 - s2 - s0);
        if denominator.abs() < EPSILON {
            // Flat neighbourhood, no better estimate than the integer period.
            return tau as f32;
        }
        tau as f32 + (s2 - s0) / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48000.0;

    fn sine(freq: f32, amplitude: f32, phase: usize, len: usize) -> Vec<f32> {
        (phase..phase + len)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE;
                amplitude * (2.0 * std::f32::consts::PI * freq * t).sin()
            })
            .collect()
    }

    fn estimator() -> YinEstimator {
        YinEstimator::new(&AnalyzerConfig::new(SAMPLE_RATE)).unwrap()
    }

    fn assert_within_percent(estimate: f32, expected: f32, percent: f32) {
        let error = ((estimate - expected) / expected).abs() * 100.0;
        assert!(
            error < percent,
            "expected {expected} Hz, got {estimate} Hz ({error}% error)"
        );
    }

    #[test]
    fn detects_220_hz_sine() {
        let mut yin = estimator();
        for phase in [0, 17, 333, 4096] {
            let frame = sine(220.0, 0.8, phase, 2048);
            assert_within_percent(yin.estimate(&frame), 220.0, 1.0);
        }
    }

    #[test]
    fn detects_across_the_default_range() {
        let mut yin = estimator();
        for freq in [82.41, 110.0, 196.0, 440.0, 659.25, 880.0] {
            let frame = sine(freq, 0.5, 0, 2048);
            assert_within_percent(yin.estimate(&frame), freq, 1.0);
        }
    }

    #[test]
    fn silence_has_no_pitch() {
        let mut yin = estimator();
        let estimate = yin.estimate(&vec![0.0; 2048]);
        assert_eq!(estimate, 0.0);
    }

    #[test]
    fn dc_offset_has_no_pitch() {
        let mut yin = estimator();
        assert_eq!(yin.estimate(&vec![0.25; 2048]), 0.0);
    }

    #[test]
    fn pitch_below_range_is_not_reported_as_its_octave() {
        // 30 Hz needs a 1600-sample period, beyond tau_max = 960.
        let mut yin = estimator();
        let estimate = yin.estimate(&sine(30.0, 0.8, 0, 2048));
        assert!(estimate == 0.0 || estimate > 50.0, "got {estimate}");
        assert!(estimate.is_finite());
    }

    #[test]
    fn repeated_estimates_are_bit_identical() {
        let mut yin = estimator();
        let frame = sine(311.13, 0.3, 5, 2048);
        let first = yin.estimate(&frame);
        yin.estimate(&sine(97.0, 0.9, 0, 2048));
        let second = yin.estimate(&frame);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn interpolation_uses_centre_at_edges() {
        let mut yin = estimator();
        yin.cmnd.fill(1.0);
        let last = yin.tau_max;
        yin.cmnd[last] = 0.0;
        yin.cmnd[last - 1] = 0.5;
        // s0 = 0.5, s1 = s2 = 0.0: vertex shifts half a sample to the right.
        assert!((yin.parabolic_interpolation(last) - (last as f32 + 0.5)).abs() < 1e-4);
    }

    #[test]
    fn flat_neighbourhood_keeps_integer_period() {
        let mut yin = estimator();
        yin.cmnd.fill(0.05);
        assert_eq!(yin.parabolic_interpolation(100), 100.0);
    }

    #[test]
    #[should_panic(expected = "frame_size")]
    fn rejects_frame_of_wrong_length() {
        let mut yin = estimator();
        yin.estimate(&vec![0.0; 512]);
    }

    #[test]
    fn reports_derived_tau_range() {
        let yin = estimator();
        assert_eq!(yin.tau_range(), (48, 960));
        assert_eq!(yin.sample_rate(), SAMPLE_RATE);
        assert_eq!(yin.threshold(), 0.1);
    }
}
