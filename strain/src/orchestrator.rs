//! Load test orchestration
use crate::error::RunError;
use crate::report::RunReport;
use crate::target::{HttpTarget, Payload, Target};
use crate::worker::Worker;
use futures_util::future::join_all;
use std::sync::Arc;
use strain_core::{ResultCollection, RunConfig, PROGRESS_EVERY_N_TICKS, PROGRESS_INTERVAL};
use time::OffsetDateTime;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{interval, Instant};
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn, Instrument};

/// A single load test run.
///
/// Spawns one [`Worker`] per configured thread, waits for all of them and reduces the recorded
/// samples into a [`RunReport`].
///
/// # Example
/// ```no_run
/// use strain::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), RunError> {
///     let config = RunConfig::new("http://127.0.0.1:8080/score", "my-key")?;
///     let report = LoadTest::http(config)?.run().await?;
///     println!("{report}");
///     Ok(())
/// }
/// ```
pub struct LoadTest<T> {
    config: RunConfig,
    target: Arc<T>,
    results: ResultCollection,
}

impl LoadTest<HttpTarget> {
    /// Load test against the HTTP endpoint named in `config`.
    pub fn http(config: RunConfig) -> Result<Self, RunError> {
        let target = HttpTarget::new(&config)?;
        Ok(Self::new(config, Arc::new(target)))
    }
}

impl<T: Target> LoadTest<T> {
    pub fn new(config: RunConfig, target: Arc<T>) -> Self {
        Self {
            config,
            target,
            results: ResultCollection::new(),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Handle to the samples recorded by this run.
    pub fn results(&self) -> ResultCollection {
        self.results.clone()
    }

    #[instrument(
        name = "load_test",
        skip_all,
        fields(
            url = %self.config.target_url,
            threads = self.config.threads.get(),
            iterations = self.config.iterations.get(),
        )
    )]
    pub async fn run(self) -> Result<RunReport, RunError> {
        info!(
            "Starting {} workers with {} calls each",
            self.config.threads, self.config.iterations
        );

        let payloads = self.payloads();
        let started_at = OffsetDateTime::now_utc();
        let start = Instant::now();
        let deadline = self.config.deadline.map(|deadline| start + deadline);

        let mut handles = Vec::with_capacity(payloads.len());
        for (id, payload) in (1..).zip(payloads) {
            let worker = Worker::new(
                id,
                self.config.iterations,
                self.target.clone(),
                payload,
                self.results.clone(),
            )
            .deadline(deadline);

            // NOTE: Registered before spawning so the running count never reads zero while
            // workers are still starting up.
            self.results.register_worker();
            handles.push(tokio::spawn(worker.run().in_current_span()));
        }

        let outcomes = self.wait_for_workers(handles).await;
        let total_elapsed = start.elapsed();

        for (id, outcome) in (1..).zip(outcomes) {
            if let Err(err) = outcome {
                error!("Worker {id} did not complete: {err}");
                return Err(RunError::WorkerPanicked(id));
            }
        }

        let samples = self.results.snapshot();
        let truncated = (samples.len() as u64) < self.config.expected_calls();
        if truncated {
            warn!(
                "Run stopped early: {} of {} calls made",
                samples.len(),
                self.config.expected_calls()
            );
        }

        info!("Load test complete in {total_elapsed:?}");
        Ok(RunReport::new(
            started_at,
            total_elapsed,
            self.config.threads,
            &samples,
            truncated,
        ))
    }

    fn payloads(&self) -> Vec<Payload> {
        let mut rng = rand::thread_rng();
        (0..self.config.threads.get())
            .map(|_| Payload::random(&mut rng))
            .collect()
    }

    async fn wait_for_workers(&self, handles: Vec<JoinHandle<()>>) -> Vec<Result<(), JoinError>> {
        let mut all = join_all(handles);
        let mut progress = interval(PROGRESS_INTERVAL);
        // NOTE: First tick completes instantly
        progress.tick().await;

        let mut ticks: u64 = 0;
        loop {
            tokio::select! {
                outcomes = &mut all => return outcomes,
                _ = progress.tick() => {
                    ticks += 1;
                    if ticks % PROGRESS_EVERY_N_TICKS == 0 {
                        info!(
                            "Waiting on workers, {} running, {} calls recorded",
                            self.results.running(),
                            self.results.len()
                        );
                    }
                }
            }
        }
    }
}
