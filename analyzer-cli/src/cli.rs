use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pitch-onset",
    about = "Streaming pitch, loudness and onset analysis of a mono audio signal"
)]
pub struct Cli {
    /// Input audio file (WAV, or raw little-endian f32 with --raw)
    pub input: PathBuf,

    /// Treat the input as headerless little-endian f32 samples
    #[arg(long, requires = "sample_rate")]
    pub raw: bool,

    /// Sample rate in Hz. Required for --raw, overrides the WAV header otherwise
    #[arg(long)]
    pub sample_rate: Option<f32>,

    /// Samples per chunk handed to the analyzer, like a host audio callback
    #[arg(
        long,
        default_value_t = 128,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub chunk_size: usize,

    /// Analysis frame size in samples (default 2048)
    #[arg(long)]
    pub frame_size: Option<usize>,

    /// Samples between consecutive frames (default 512)
    #[arg(long)]
    pub hop_size: Option<usize>,

    /// Lowest detectable pitch in Hz (default 50)
    #[arg(long)]
    pub min_freq: Option<f32>,

    /// Highest detectable pitch in Hz (default 1000)
    #[arg(long)]
    pub max_freq: Option<f32>,

    /// YIN absolute threshold, between 0 and 1 (default 0.1)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// TOML file with an [analysis] table; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only print frames where a pitch was detected
    #[arg(long)]
    pub voiced_only: bool,
}
