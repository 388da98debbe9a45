use crate::sample::{SamplePoint, WorkerId};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSecondsWithFrac};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    #[error("No samples for scope")]
    NoSamples,
}

/// Aggregate statistics over a set of samples.
///
/// Covers either the whole run or a single worker's calls.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub calls: usize,
    pub success: usize,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub average: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub min: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub max: Duration,
}

impl RunStatistics {
    pub fn from_samples(samples: &[SamplePoint]) -> Result<Self, StatsError> {
        if samples.is_empty() {
            return Err(StatsError::NoSamples);
        }

        let min = samples.iter().map(|s| s.elapsed).min().unwrap_or_default();
        let max = samples.iter().map(|s| s.elapsed).max().unwrap_or_default();

        let secs: Vec<f64> = samples.iter().map(|s| s.elapsed.as_secs_f64()).collect();
        // NOTE: Rounding through f64 can land the mean a nanosecond outside [min, max].
        let average = Duration::from_secs_f64(statistical::mean(&secs)).clamp(min, max);

        Ok(Self {
            calls: samples.len(),
            success: samples.iter().filter(|s| s.is_success()).count(),
            average,
            min,
            max,
        })
    }

    pub fn success_rate(&self) -> f64 {
        self.success as f64 / self.calls as f64
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "     calls   = {}", self.calls)?;
        writeln!(f, "     success = {}", self.success)?;
        writeln!(f, "     average = {:.6}", self.average.as_secs_f64())?;
        writeln!(f, "     min     = {:.6}", self.min.as_secs_f64())?;
        write!(f, "     max     = {:.6}", self.max.as_secs_f64())
    }
}

/// Group samples by the worker that produced them.
pub fn partition_by_worker(samples: &[SamplePoint]) -> BTreeMap<WorkerId, Vec<SamplePoint>> {
    let mut partitions: BTreeMap<WorkerId, Vec<SamplePoint>> = BTreeMap::new();
    for sample in samples {
        partitions.entry(sample.worker_id).or_default().push(*sample);
    }
    partitions
}
