use crate::target::{Payload, Target};
use std::num::NonZeroU32;
use std::sync::Arc;
use strain_core::{ResultCollection, SamplePoint, WorkerId};
use tokio::time::Instant;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Makes a fixed number of calls against a target and records each outcome.
///
/// A call that gets no response is recorded as a transport error sample and never stops the
/// remaining iterations. Any response, whatever its status, is recorded as received.
pub struct Worker<T> {
    id: WorkerId,
    iterations: NonZeroU32,
    target: Arc<T>,
    payload: Payload,
    results: ResultCollection,
    deadline: Option<Instant>,
}

impl<T: Target> Worker<T> {
    pub fn new(
        id: WorkerId,
        iterations: NonZeroU32,
        target: Arc<T>,
        payload: Payload,
        results: ResultCollection,
    ) -> Self {
        Self {
            id,
            iterations,
            target,
            payload,
            results,
            deadline: None,
        }
    }

    /// Stop starting new calls once `deadline` has passed.
    pub fn deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    #[instrument(name = "worker", skip_all, fields(id = self.id))]
    pub async fn run(self) {
        debug!("Starting worker with payload {:?}", self.payload);

        let mut completed = 0;
        for _ in 0..self.iterations.get() {
            if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                warn!(
                    "Deadline reached after {completed} of {} calls.",
                    self.iterations
                );
                break;
            }

            let sample = self.call().await;
            self.results.push(sample);
            completed += 1;
        }

        self.results.finish_worker();
        debug!("Worker finished {completed} calls.");
    }

    async fn call(&self) -> SamplePoint {
        let start = Instant::now();
        let sample = match self.target.post(&self.payload).await {
            Ok(status) => {
                let elapsed = start.elapsed();
                trace!("Call returned {status} in {elapsed:?}");
                SamplePoint::new(self.id, status, elapsed)
            }
            Err(err) => {
                warn!("Call failed: {err}");
                SamplePoint::transport_error(self.id)
            }
        };

        #[cfg(feature = "metrics")]
        record_metrics(&sample);

        sample
    }
}

#[cfg(feature = "metrics")]
fn record_metrics(sample: &SamplePoint) {
    metrics::counter!("strain.calls").increment(1);
    if sample.is_success() {
        metrics::counter!("strain.success").increment(1);
    } else {
        metrics::counter!("strain.error").increment(1);
    }
    metrics::histogram!("strain.latency").record(sample.elapsed.as_secs_f64());
}
