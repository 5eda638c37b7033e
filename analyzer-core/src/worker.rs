//! # Analysis Worker Module
//!
//! Runs an [`AnalysisPipeline`] on a dedicated thread so that the producer of
//! audio (a capture callback, a file reader) only has to push chunks into a
//! channel and never runs the pitch search itself.
//!
//! ## Architecture
//! - **Producer**: sends `Vec<f32>` chunks on a crossbeam channel
//! - **Worker thread**: owns the pipeline, analyzes each chunk in arrival order
//! - **Consumer**: receives one [`AnalysisResult`] per completed frame
//!
//! The worker exits when the chunk channel is closed, when the result
//! receiver goes away, or when [`AnalysisWorker::shutdown`] is called.

use crossbeam_channel::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::pipeline::AnalysisPipeline;
use crate::AnalysisResult;

/// Handle to a running analysis thread.
#[derive(Debug)]
pub struct AnalysisWorker {
    shutdown_tx: Sender<()>,                // Channel to send shutdown signal
    thread_handle: Option<JoinHandle<u64>>, // Returns frames analyzed on exit
}

impl AnalysisWorker {
    /// Moves `pipeline` onto a new thread that analyzes every chunk received
    /// on `chunk_rx` and sends the results on `result_tx`.
    ///
    /// # Arguments
    /// * `pipeline` - A configured pipeline; its state carries over from any
    ///   chunks it has already seen
    /// * `chunk_rx` - Source of mono sample chunks
    /// * `result_tx` - Destination for analysis results
    pub fn spawn(
        mut pipeline: AnalysisPipeline,
        chunk_rx: Receiver<Vec<f32>>,
        result_tx: Sender<AnalysisResult>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(1);

        let thread_handle = thread::spawn(move || {
            log::info!("[WORKER] Analysis thread started");
            let mut consumer_gone = false;

            loop {
                crossbeam_channel::select! {
                    recv(chunk_rx) -> msg => match msg {
                        Ok(chunk) => {
                            pipeline.ingest_with(&chunk, |result| {
                                if !consumer_gone && result_tx.send(result).is_err() {
                                    consumer_gone = true;
                                }
                            });
                            if consumer_gone {
                                log::warn!("[WORKER] Result receiver dropped, stopping");
                                break;
                            }
                        }
                        Err(_) => {
                            log::debug!("[WORKER] Chunk channel closed");
                            break;
                        }
                    },
                    recv(shutdown_rx) -> _ => {
                        log::info!("[WORKER] Received shutdown signal");
                        break;
                    },
                }
            }

            let frames = pipeline.frames_analyzed();
            log::info!("[WORKER] Analysis thread finished after {} frames", frames);
            frames
        });

        Self {
            shutdown_tx,
            thread_handle: Some(thread_handle),
        }
    }

    /// Asks the thread to stop without draining queued chunks, then waits.
    pub fn shutdown(mut self) -> u64 {
        let _ = self.shutdown_tx.try_send(());
        self.wait()
    }

    /// Waits for the thread to finish on its own, typically after every chunk
    /// sender has been dropped. Returns the number of frames analyzed.
    pub fn join(mut self) -> u64 {
        self.wait()
    }

    fn wait(&mut self) -> u64 {
        match self.thread_handle.take().map(JoinHandle::join) {
            Some(Ok(frames)) => frames,
            Some(Err(_)) => {
                log::error!("[WORKER] Analysis thread panicked");
                0
            }
            None => 0,
        }
    }
}

impl Drop for AnalysisWorker {
    fn drop(&mut self) {
        if self.thread_handle.is_some() {
            let _ = self.shutdown_tx.try_send(());
            self.wait();
        }
    }
}
