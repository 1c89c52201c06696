//! Background render pipeline.
//!
//! At most one worker thread runs at a time. Each run gets a generation
//! number; events from any other generation are dropped on receipt.

mod worker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use hyspec_algorithms::BandRenderer;
use hyspec_core::Cube;
use log::{debug, info, warn};

pub use worker::render_worker;

use crate::error::{Result, ViewerError};
use crate::message::{PipelineEvent, PipelineMessage};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

struct ActiveRun {
    generation: u64,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Owner of the render worker and its channel.
pub struct RenderPipeline {
    renderer: Arc<dyn BandRenderer>,
    tx: Sender<PipelineEvent>,
    rx: Receiver<PipelineEvent>,
    generation: u64,
    active: Option<ActiveRun>,
}

impl RenderPipeline {
    /// Create an idle pipeline driving `renderer`.
    pub fn new(renderer: Arc<dyn BandRenderer>) -> Self {
        let (tx, rx) = channel();
        Self {
            renderer,
            tx,
            rx,
            generation: 0,
            active: None,
        }
    }

    /// Generation of the most recent run. Bumped on every start and cancel.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a run has started and not yet delivered its terminal message.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Start rendering every band of `cube` on a worker thread.
    ///
    /// Returns the new run's generation.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::PipelineBusy`] if a run is already active, or
    /// an I/O error if the thread cannot be spawned.
    pub fn start(&mut self, cube: Arc<Cube>) -> Result<u64> {
        if self.active.is_some() {
            return Err(ViewerError::PipelineBusy);
        }

        self.generation += 1;
        let generation = self.generation;
        let cancel = Arc::new(AtomicBool::new(false));
        let tx = self.tx.clone();
        let renderer = Arc::clone(&self.renderer);
        let worker_cancel = Arc::clone(&cancel);

        info!(
            "render run {generation}: {} bands with {} renderer",
            cube.band_count(),
            renderer.name()
        );
        let handle = thread::Builder::new()
            .name(format!("hyspec-render-{generation}"))
            .spawn(move || {
                render_worker(&cube, renderer.as_ref(), generation, &tx, &worker_cancel);
            })?;

        self.active = Some(ActiveRun {
            generation,
            cancel,
            handle,
        });
        Ok(generation)
    }

    /// Stop the active run, if any.
    ///
    /// Blocks until the worker finishes the band it is rendering. Anything
    /// the run already queued is discarded.
    pub fn cancel(&mut self) {
        if let Some(run) = self.active.take() {
            run.cancel.store(true, Ordering::SeqCst);
            self.generation += 1;
            if run.handle.join().is_err() {
                warn!("render run {} panicked while cancelling", run.generation);
            }
            debug!("render run {} cancelled", run.generation);
        }
    }

    /// Next message for the current run without blocking.
    ///
    /// Stale events are dropped. A worker that exits without a terminal
    /// message yields `Failed`.
    pub fn try_next(&mut self) -> Option<PipelineMessage> {
        while let Ok(event) = self.rx.try_recv() {
            if let Some(message) = self.accept(event) {
                return Some(message);
            }
        }
        self.check_worker_exit()
    }

    /// Next message for the current run, blocking until one arrives.
    ///
    /// Returns `None` once no run is active and nothing is queued.
    pub fn next_blocking(&mut self) -> Option<PipelineMessage> {
        loop {
            if let Some(message) = self.try_next() {
                return Some(message);
            }
            if self.active.is_none() {
                return None;
            }
            match self.rx.recv_timeout(POLL_INTERVAL) {
                Ok(event) => {
                    if let Some(message) = self.accept(event) {
                        return Some(message);
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {}
            }
        }
    }

    /// Block until the current run ends and return its terminal message.
    pub fn wait(&mut self) -> Option<PipelineMessage> {
        while let Some(message) = self.next_blocking() {
            if message.is_terminal() {
                return Some(message);
            }
        }
        None
    }

    fn accept(&mut self, event: PipelineEvent) -> Option<PipelineMessage> {
        let current = self.active.as_ref().map(|run| run.generation);
        if current != Some(event.generation) {
            debug!(
                "dropping stale render event from run {} (current {:?})",
                event.generation, current
            );
            return None;
        }
        if event.message.is_terminal() {
            self.finish_run();
        }
        Some(event.message)
    }

    fn finish_run(&mut self) {
        if let Some(run) = self.active.take() {
            if run.handle.join().is_err() {
                warn!("render run {} panicked after finishing", run.generation);
            }
        }
    }

    fn check_worker_exit(&mut self) -> Option<PipelineMessage> {
        let finished = self
            .active
            .as_ref()
            .is_some_and(|run| run.handle.is_finished());
        if !finished {
            return None;
        }

        // Everything the worker sent happened before it finished
        while let Ok(event) = self.rx.try_recv() {
            if let Some(message) = self.accept(event) {
                return Some(message);
            }
        }

        let run = self.active.take()?;
        let reason = match run.handle.join() {
            Ok(()) => "render worker exited without a result".to_string(),
            Err(_) => "render worker panicked".to_string(),
        };
        warn!("render run {}: {reason}", run.generation);
        Some(PipelineMessage::Failed(reason))
    }
}

impl Drop for RenderPipeline {
    fn drop(&mut self) {
        self.cancel();
    }
}
