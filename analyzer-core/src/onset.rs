//! # Energy Onset Module
//!
//! Frame loudness (RMS) and a causal onset strength: the half-wave rectified
//! change in RMS from the previous frame. Rising energy gives a positive
//! onset; flat or falling energy gives zero.

/// Root mean square of a frame. An empty frame has zero energy.
///
/// Squares are summed in f64; an f32 sum over a 2048-sample frame drifts in
/// the sixth significant digit.
pub fn rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = frame.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum_sq / frame.len() as f64).sqrt() as f32
}

/// `max(0, current - previous)`.
pub fn onset(current_rms: f32, previous_rms: f32) -> f32 {
    (current_rms - previous_rms).max(0.0)
}

/// Tracks the previous frame's RMS across calls.
#[derive(Debug, Clone, Default)]
pub struct EnergyOnsetDetector {
    previous_rms: f32,
}

impl EnergyOnsetDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// RMS of the frame before the next one to be processed.
    pub fn previous_rms(&self) -> f32 {
        self.previous_rms
    }

    /// Returns `(rms, onset)` for `frame` and remembers its RMS.
    ///
    /// The stored RMS is updated on every call, whatever the pitch estimate
    /// for the same frame turned out to be.
    pub fn process(&mut self, frame: &[f32]) -> (f32, f32) {
        let current = rms(frame);
        let strength = onset(current, self.previous_rms);
        self.previous_rms = current;
        (current, strength)
    }

    pub fn reset(&mut self) {
        self.previous_rms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rms_of_constant_is_its_magnitude() {
        for a in [0.0f32, 0.5, -0.25, 1.0] {
            assert_relative_eq!(rms(&vec![a; 2048]), a.abs(), epsilon = 1e-6);
        }
    }

    #[test]
    fn rms_of_inexact_constant_is_its_magnitude() {
        // 0.1 and 0.2 have no exact binary square.
        for a in [0.1f32, 0.2, -0.3, 0.7] {
            assert_relative_eq!(rms(&vec![a; 2048]), a.abs(), epsilon = 1e-7);
        }
    }

    #[test]
    fn rms_of_full_cycles_of_sine() {
        // 2048 samples hold exactly 16 cycles of a 128-sample period.
        let amplitude = 0.9f32;
        let frame: Vec<f32> = (0..2048)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * i as f32 / 128.0).sin())
            .collect();
        assert_relative_eq!(rms(&frame), amplitude / 2f32.sqrt(), max_relative = 1e-4);
    }

    #[test]
    fn rms_of_empty_frame_is_zero() {
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn onset_is_half_wave_rectified() {
        assert_relative_eq!(onset(0.5, 0.2), 0.3, epsilon = 1e-6);
        assert_eq!(onset(0.2, 0.5), 0.0);
        assert_eq!(onset(0.4, 0.4), 0.0);
    }

    #[test]
    fn loud_frame_after_silence_is_an_onset() {
        let mut detector = EnergyOnsetDetector::new();
        let (rms_silent, onset_silent) = detector.process(&vec![0.0; 512]);
        assert_eq!((rms_silent, onset_silent), (0.0, 0.0));

        let (rms_loud, onset_loud) = detector.process(&vec![0.5; 512]);
        assert_relative_eq!(rms_loud, 0.5, epsilon = 1e-6);
        assert!(onset_loud > 0.0);
        assert_eq!(detector.previous_rms(), rms_loud);
    }

    #[test]
    fn equal_energy_frames_have_no_onset() {
        let mut detector = EnergyOnsetDetector::new();
        detector.process(&vec![0.3; 512]);
        let (_, onset) = detector.process(&vec![-0.3; 512]);
        assert_eq!(onset, 0.0);
    }

    #[test]
    fn falling_energy_still_updates_previous() {
        let mut detector = EnergyOnsetDetector::new();
        detector.process(&vec![0.8; 64]);
        let (quiet, onset) = detector.process(&vec![0.1; 64]);
        assert_eq!(onset, 0.0);
        assert_eq!(detector.previous_rms(), quiet);

        detector.reset();
        assert_eq!(detector.previous_rms(), 0.0);
    }
}
