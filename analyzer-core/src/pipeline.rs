//! # Analysis Pipeline Module
//!
//! Ties the framer and both estimators together. For every frame the framer
//! completes, the pitch estimator and the energy detector run on the same
//! samples and exactly one [`AnalysisResult`] is emitted, in frame order.
//!
//! The pipeline is meant to be driven from a real-time callback: after
//! construction no call allocates, except the convenience [`AnalysisPipeline::ingest`]
//! which collects results into a `Vec`.

use crate::config::AnalyzerConfig;
use crate::error::ConfigError;
use crate::framer::RingFramer;
use crate::onset::EnergyOnsetDetector;
use crate::pitch::YinEstimator;
use crate::AnalysisResult;

/// Streaming pitch, loudness and onset analysis over one channel.
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    config: AnalyzerConfig,
    framer: RingFramer,
    pitch: YinEstimator,
    energy: EnergyOnsetDetector,
    frames_analyzed: u64,
}

impl AnalysisPipeline {
    /// Builds a pipeline, rejecting an unusable configuration up front.
    pub fn new(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        let framer = RingFramer::new(&config)?;
        let pitch = YinEstimator::new(&config)?;
        log::debug!(
            "Analysis pipeline ready: frame {} / hop {} samples ({:.1} ms per result)",
            config.frame_size,
            config.hop_size,
            config.hop_duration_secs() * 1000.0
        );

        Ok(Self {
            config,
            framer,
            pitch,
            energy: EnergyOnsetDetector::new(),
            frames_analyzed: 0,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Total number of results emitted since construction or the last reset.
    pub fn frames_analyzed(&self) -> u64 {
        self.frames_analyzed
    }

    /// Analyzes `chunk` and passes each completed frame's result to `emit`.
    ///
    /// Returns the number of results emitted. Samples that do not complete a
    /// frame stay buffered for the next call.
    pub fn ingest_with<F>(&mut self, chunk: &[f32], mut emit: F) -> usize
    where
        F: FnMut(AnalysisResult),
    {
        let Self {
            framer,
            pitch,
            energy,
            frames_analyzed,
            ..
        } = self;

        framer.ingest(chunk, |frame| {
            let frequency_hz = pitch.estimate(frame);
            let (rms, onset) = energy.process(frame);
            *frames_analyzed += 1;
            log::trace!(
                "frame {}: {:.2} Hz, rms {:.4}, onset {:.4}",
                frames_analyzed,
                frequency_hz,
                rms,
                onset
            );
            emit(AnalysisResult {
                frequency_hz,
                rms,
                onset,
            });
        })
    }

    /// Analyzes `chunk` and returns the results of every frame it completed.
    pub fn ingest(&mut self, chunk: &[f32]) -> Vec<AnalysisResult> {
        let mut results = Vec::new();
        self.ingest_with(chunk, |result| results.push(result));
        results
    }

    /// Analyzes the first channel of a host-style channel list.
    ///
    /// Only channel 0 is used. A missing or empty channel is ignored without
    /// error, as hosts deliver such blocks while a graph is (dis)connecting.
    pub fn process_channels<F>(&mut self, channels: &[&[f32]], emit: F) -> usize
    where
        F: FnMut(AnalysisResult),
    {
        match channels.first() {
            Some(channel) if !channel.is_empty() => self.ingest_with(channel, emit),
            _ => 0,
        }
    }

    /// Drops buffered samples and the onset history.
    pub fn reset(&mut self) {
        self.framer.reset();
        self.energy.reset();
        self.frames_analyzed = 0;
    }
}
