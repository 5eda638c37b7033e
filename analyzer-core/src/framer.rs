//! # Framing Module
//!
//! Reassembles an unbounded stream of irregular sample chunks into fixed-size,
//! overlapping analysis frames.
//!
//! The framer owns a single buffer of `frame_size` samples and a write cursor.
//! Incoming samples fill the buffer from the cursor; when it is full the whole
//! buffer is handed out as a frame, then the oldest `hop_size` samples are
//! dropped and writing resumes at `frame_size - hop_size`. Frame contents do
//! not depend on how the stream is chunked.

use crate::config::AnalyzerConfig;
use crate::error::ConfigError;

/// Fixed-size overlapping frame accumulator.
#[derive(Debug, Clone)]
pub struct RingFramer {
    buffer: Vec<f32>,
    write: usize,
    hop_size: usize,
}

impl RingFramer {
    /// Creates a framer sized from `config`.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_sizes(config.frame_size, config.hop_size))
    }

    fn with_sizes(frame_size: usize, hop_size: usize) -> Self {
        Self {
            buffer: vec![0.0; frame_size],
            write: 0,
            hop_size,
        }
    }

    pub fn frame_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Number of samples currently held toward the next frame.
    pub fn buffered(&self) -> usize {
        self.write
    }

    /// Appends `chunk` and calls `on_frame` once for every frame it completes.
    ///
    /// The frame slice is only valid for the duration of the callback. An
    /// empty chunk does nothing. Returns the number of frames produced.
    pub fn ingest<F>(&mut self, chunk: &[f32], mut on_frame: F) -> usize
    where
        F: FnMut(&[f32]),
    {
        let frame_size = self.buffer.len();
        let mut frames = 0;
        let mut remaining = chunk;

        while !remaining.is_empty() {
            let space = frame_size - self.write;
            let copy_count = space.min(remaining.len());
            let (head, tail) = remaining.split_at(copy_count);
            self.buffer[self.write..self.write + copy_count].copy_from_slice(head);
            self.write += copy_count;
            remaining = tail;

            if self.write == frame_size {
                on_frame(&self.buffer);
                frames += 1;

                self.buffer.copy_within(self.hop_size.., 0);
                self.write = frame_size - self.hop_size;
            }
        }

        frames
    }

    /// Discards all buffered samples.
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write = 0;
    }
}
