//! Fire-and-forget mesh job execution and completion sinks

use std::sync::mpsc;
use std::thread;

use glam::DVec3;
use tracing::warn;

use crate::vertex::PreviewMesh;

/// Receives preview geometry as the stream walk produces it.
///
/// Completions may arrive in any order across different layers; within one
/// layer, runs complete in call order because each layer's runs are
/// submitted sequentially. Callers must place results by the layer tag,
/// never by arrival order.
pub trait PreviewSink: Send + Sync {
    /// A finalized run's mesh buffers are ready.
    fn mesh_ready(&self, mesh: PreviewMesh);

    /// A travel (non-extruding) segment was walked.
    fn travel_ready(&self, points: Vec<DVec3>, layer_index: usize);

    /// Free-text progress message.
    fn progress(&self, _message: &str) {}
}

/// Sink that discards everything.
pub struct NoOpPreviewSink;

impl PreviewSink for NoOpPreviewSink {
    fn mesh_ready(&self, _mesh: PreviewMesh) {}
    fn travel_ready(&self, _points: Vec<DVec3>, _layer_index: usize) {}
}

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Executes finalized-run mesh jobs off the stream-walking path.
///
/// Jobs are short and idempotent; cancellation is not supported mid-job —
/// discard an unwanted result instead.
pub trait JobExecutor: Send + Sync {
    /// Queue a job for execution. Fire-and-forget: no handle, no result.
    fn submit(&self, job: Job);
}

/// Runs jobs immediately on the calling thread. Deterministic; intended for
/// tests and single-threaded callers.
#[derive(Debug, Default)]
pub struct InlineExecutor;

impl JobExecutor for InlineExecutor {
    fn submit(&self, job: Job) {
        job();
    }
}

/// A single worker thread draining a FIFO queue.
///
/// FIFO draining preserves submission order, which is what upholds the
/// within-layer ordering contract of [`PreviewSink`]. Dropping the executor
/// finishes queued jobs before joining the worker.
pub struct BackgroundExecutor {
    sender: Option<mpsc::Sender<Job>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl BackgroundExecutor {
    /// Spawn the worker thread.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let worker = thread::Builder::new()
            .name("fffkit-preview-mesh".to_string())
            .spawn(move || {
                for job in receiver {
                    job();
                }
            })
            .expect("failed to spawn preview mesh worker");
        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }
}

impl Default for BackgroundExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl JobExecutor for BackgroundExecutor {
    fn submit(&self, job: Job) {
        if let Some(sender) = &self.sender {
            if sender.send(job).is_err() {
                warn!("preview mesh worker gone, dropping job");
            }
        }
    }
}

impl Drop for BackgroundExecutor {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_inline_executor_runs_immediately() {
        let counter = Arc::new(AtomicUsize::new(0));
        let executor = InlineExecutor;
        let c = Arc::clone(&counter);
        executor.submit(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_background_executor_preserves_order() {
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let executor = BackgroundExecutor::new();
        for i in 0..32 {
            let order = Arc::clone(&order);
            executor.submit(Box::new(move || {
                order.lock().push(i);
            }));
        }
        // dropping joins the worker after the queue drains
        drop(executor);
        assert_eq!(*order.lock(), (0..32).collect::<Vec<_>>());
    }
}
