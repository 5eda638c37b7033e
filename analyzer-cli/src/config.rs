use analyzer_core::AnalyzerConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::cli::Cli;

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub analysis: AnalysisSection,
}

/// Every key is optional; anything missing keeps the analyzer default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisSection {
    pub frame_size: Option<usize>,
    pub hop_size: Option<usize>,
    pub min_freq: Option<f32>,
    pub max_freq: Option<f32>,
    pub threshold: Option<f32>,
}

pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config {}", path.display()))
}

/// Merges defaults, the config file and command-line flags, in that order.
pub fn resolve(cli: &Cli, file: &AnalysisSection, sample_rate: f32) -> AnalyzerConfig {
    let mut config = AnalyzerConfig::new(sample_rate);
    if let Some(frame_size) = cli.frame_size.or(file.frame_size) {
        config.frame_size = frame_size;
    }
    if let Some(hop_size) = cli.hop_size.or(file.hop_size) {
        config.hop_size = hop_size;
    }
    if let Some(min_hz) = cli.min_freq.or(file.min_freq) {
        config.min_frequency_hz = min_hz;
    }
    if let Some(max_hz) = cli.max_freq.or(file.max_freq) {
        config.max_frequency_hz = max_hz;
    }
    if let Some(threshold) = cli.threshold.or(file.threshold) {
        config.yin_threshold = threshold;
    }
    config
}
