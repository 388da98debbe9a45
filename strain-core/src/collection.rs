use crate::sample::SamplePoint;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Append-only store of samples shared between the workers and the orchestrator.
///
/// Cloning the collection hands out another handle to the same storage. The running-worker count
/// lives behind the same lock as the samples, so a worker's last append and its completion are
/// observed in order.
#[derive(Debug, Clone, Default)]
pub struct ResultCollection {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    samples: Vec<SamplePoint>,
    running: usize,
}

impl ResultCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, sample: SamplePoint) {
        self.lock().samples.push(sample);
    }

    /// Mark one more worker as running. Must be called before the worker is started.
    pub fn register_worker(&self) {
        self.lock().running += 1;
    }

    pub fn finish_worker(&self) {
        let mut inner = self.lock();
        inner.running = inner.running.saturating_sub(1);
    }

    pub fn running(&self) -> usize {
        self.lock().running
    }

    pub fn len(&self) -> usize {
        self.lock().samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every sample appended so far.
    pub fn snapshot(&self) -> Vec<SamplePoint> {
        self.lock().samples.clone()
    }

    // NOTE: Every critical section is a single push or counter update, so a panic while holding the
    // lock cannot leave the data half-written. Recovering from poison is safe.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
