//! Reads a whole audio file into memory as mono f32 samples.
//!
//! Only channel 0 of a multi-channel file is kept.

use anyhow::{Context, Result, bail};
use hound::{SampleFormat, WavReader};
use std::path::Path;

pub struct AudioInput {
    pub sample_rate: f32,
    pub samples: Vec<f32>,
}

pub fn read_wav(path: &Path) -> Result<AudioInput> {
    let mut reader =
        WavReader::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;
    if channels > 1 {
        log::warn!("{} has {} channels, analyzing channel 0 only", path.display(), channels);
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<f32>, _>>()
            .context("Failed to decode float samples")?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<f32>, _>>()
                .context("Failed to decode integer samples")?
        }
    };

    Ok(AudioInput {
        sample_rate: spec.sample_rate as f32,
        samples: interleaved.into_iter().step_by(channels).collect(),
    })
}

pub fn read_raw(path: &Path, sample_rate: f32) -> Result<AudioInput> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if bytes.len() % 4 != 0 {
        bail!("{} is not a whole number of f32 samples ({} bytes)", path.display(), bytes.len());
    }
    let samples = bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    Ok(AudioInput { sample_rate, samples })
}
