//! Off-thread compression and stale-result suppression.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::thread;

use futures::channel::oneshot;

use super::{compress, CompressionOutcome, SourceImage};
use crate::budget::Budget;
use crate::config::CompressOptions;
use crate::error::CompressError;

/// Pending result of [`compress_in_background`].
///
/// Resolves to exactly one outcome. If the worker dies before reporting, the
/// task resolves to `Error(WorkerStopped)`.
#[must_use = "a CompressionTask does nothing unless awaited"]
pub struct CompressionTask {
    receiver: oneshot::Receiver<CompressionOutcome>,
    generation: u64,
}

impl CompressionTask {
    /// Submission generation; `0` for tasks not issued by a [`Compressor`].
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Future for CompressionTask {
    type Output = CompressionOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|received| {
            received.unwrap_or(CompressionOutcome::Error(CompressError::WorkerStopped))
        })
    }
}

/// Run [`compress`] on a dedicated worker thread.
///
/// The caller's thread returns immediately; await the task from any executor.
pub fn compress_in_background(
    source: SourceImage,
    budget: Budget,
    options: CompressOptions,
) -> CompressionTask {
    spawn(source, budget, options, 0)
}

fn spawn(
    source: SourceImage,
    budget: Budget,
    options: CompressOptions,
    generation: u64,
) -> CompressionTask {
    let (sender, receiver) = oneshot::channel();

    let spawned = thread::Builder::new()
        .name(format!("pixbudget-compress-{generation}"))
        .spawn(move || {
            let outcome = compress(&source, budget, &options);
            // The receiver may already be gone
            let _ = sender.send(outcome);
        });

    if let Err(err) = spawned {
        // The closure (and with it the sender) was dropped, so the task
        // resolves to WorkerStopped.
        log::warn!("Failed to start compression worker: {}", err);
    }

    CompressionTask {
        receiver,
        generation,
    }
}

/// Issues background compressions and discards results of superseded ones.
///
/// Every [`submit`](Compressor::submit) bumps a generation counter. A task
/// settled after a newer submission yields `None`, so a slow, stale
/// compression can never overwrite the result of a later one.
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    generation: Arc<AtomicU64>,
}

impl Compressor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(
        &self,
        source: SourceImage,
        budget: Budget,
        options: CompressOptions,
    ) -> CompressionTask {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        spawn(source, budget, options, generation)
    }

    /// Whether `task` is the most recent submission.
    pub fn is_current(&self, task: &CompressionTask) -> bool {
        task.generation == self.generation.load(Ordering::SeqCst)
    }

    /// Await `task`, returning `None` if it was superseded meanwhile.
    pub async fn settle(&self, task: CompressionTask) -> Option<CompressionOutcome> {
        let generation = task.generation;
        let outcome = task.await;

        if generation == self.generation.load(Ordering::SeqCst) {
            Some(outcome)
        } else {
            log::debug!("Discarding stale compression result (generation {})", generation);
            None
        }
    }
}
