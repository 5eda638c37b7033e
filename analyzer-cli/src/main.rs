//! # pitch-onset - Streaming Analysis Host
//!
//! Command-line host for the analysis core. It plays an audio file into the
//! analyzer the way a live audio callback would: in small fixed chunks, from a
//! producer thread, with the analysis running on its own worker thread.
//!
//! ## Architecture
//! - **Producer Thread**: slices the decoded file into callback-sized chunks
//! - **Analysis Thread**: `AnalysisWorker` running the pipeline
//! - **Main Thread**: prints one JSON line per result on stdout
//! - **Communication**: crossbeam channels between all three

mod cli;
mod config;
mod input;

use analyzer_core::{AnalysisPipeline, AnalysisResult, AnalysisWorker};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::thread;

use cli::Cli;

// Chunks in flight between producer and analysis thread
const CHUNK_QUEUE_DEPTH: usize = 64;

/// One line of output.
#[derive(Debug, Serialize)]
struct FrameRecord {
    /// Index of the frame since the start of the stream.
    frame: u64,
    /// Stream time in seconds of the newest sample in the frame.
    time: f64,
    #[serde(flatten)]
    result: AnalysisResult,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => {
            let loaded = config::load_config(path)?;
            log::info!("Loaded config from {}", path.display());
            loaded
        }
        None => config::FileConfig::default(),
    };

    let audio = if cli.raw {
        let sample_rate = cli
            .sample_rate
            .context("--raw input needs --sample-rate")?;
        input::read_raw(&cli.input, sample_rate)?
    } else {
        input::read_wav(&cli.input)?
    };
    let sample_rate = cli.sample_rate.unwrap_or(audio.sample_rate);

    let analyzer_config = config::resolve(&cli, &file_config.analysis, sample_rate);
    let pipeline = AnalysisPipeline::new(analyzer_config.clone())
        .context("Invalid analysis configuration")?;

    log::info!("Input: {}", cli.input.display());
    log::info!(
        "{} samples @ {} Hz ({:.2}s), chunks of {}",
        audio.samples.len(),
        sample_rate,
        audio.samples.len() as f32 / sample_rate,
        cli.chunk_size
    );
    log::info!(
        "Frame {} / hop {}, pitch range {}-{} Hz, threshold {}",
        analyzer_config.frame_size,
        analyzer_config.hop_size,
        analyzer_config.min_frequency_hz,
        analyzer_config.max_frequency_hz,
        analyzer_config.yin_threshold
    );

    let (chunk_tx, chunk_rx) = crossbeam_channel::bounded::<Vec<f32>>(CHUNK_QUEUE_DEPTH);
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<AnalysisResult>();
    let worker = AnalysisWorker::spawn(pipeline, chunk_rx, result_tx);

    let chunk_size = cli.chunk_size;
    let producer = thread::spawn(move || {
        for chunk in audio.samples.chunks(chunk_size) {
            if chunk_tx.send(chunk.to_vec()).is_err() {
                log::warn!("[PRODUCER] Analysis thread went away early");
                break;
            }
        }
        // Dropping the sender lets the worker finish once the queue drains.
    });

    let frame_size = analyzer_config.frame_size as f64;
    let hop_size = analyzer_config.hop_size as f64;
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut voiced = 0u64;

    for (frame, result) in (0u64..).zip(result_rx.iter()) {
        if result.is_voiced() {
            voiced += 1;
        } else if cli.voiced_only {
            continue;
        }
        let record = FrameRecord {
            frame,
            time: (frame_size + frame as f64 * hop_size) / sample_rate as f64,
            result,
        };
        serde_json::to_writer(&mut out, &record)?;
        writeln!(out)?;
    }
    out.flush()?;

    if producer.join().is_err() {
        anyhow::bail!("Producer thread panicked");
    }
    let frames = worker.join();
    log::info!("Analyzed {} frames, {} voiced", frames, voiced);

    Ok(())
}
