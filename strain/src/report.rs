use crate::error::RunError;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSecondsWithFrac};
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;
use strain_core::{partition_by_worker, RunStatistics, SamplePoint, WorkerId};
use time::OffsetDateTime;

/// Outcome of a load test run.
///
/// Statistics are `None` for any scope that recorded no samples, which only happens when a run is
/// cut short by its deadline.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub total_elapsed: Duration,
    pub rps: f64,
    pub truncated: bool,
    pub global: Option<RunStatistics>,
    pub workers: BTreeMap<WorkerId, Option<RunStatistics>>,
}

impl RunReport {
    pub fn new(
        started_at: OffsetDateTime,
        total_elapsed: Duration,
        threads: NonZeroU32,
        samples: &[SamplePoint],
        truncated: bool,
    ) -> Self {
        let global = RunStatistics::from_samples(samples).ok();

        let partitions = partition_by_worker(samples);
        let workers = (1..=threads.get())
            .map(|id| {
                let stats = partitions
                    .get(&id)
                    .and_then(|samples| RunStatistics::from_samples(samples).ok());
                (id, stats)
            })
            .collect();

        let secs = total_elapsed.as_secs_f64();
        let rps = if secs > 0. {
            samples.len() as f64 / secs
        } else {
            0.
        };

        Self {
            started_at,
            total_elapsed,
            rps,
            truncated,
            global,
            workers,
        }
    }

    pub fn to_json(&self) -> Result<String, RunError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), RunError> {
        std::fs::write(path, self.to_json()?).map_err(|source| RunError::ReportWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Global Stats:")?;
        writeln!(
            f,
            "     Total Time  : {}",
            humantime::format_duration(self.total_elapsed)
        )?;
        writeln!(f, "     Overall RPS : {:.2}", self.rps)?;
        if self.truncated {
            writeln!(f, "     (stopped at deadline)")?;
        }
        write_stats(f, self.global.as_ref())?;

        for (id, stats) in &self.workers {
            writeln!(f)?;
            writeln!(f, "Worker {id} Stats:")?;
            write_stats(f, stats.as_ref())?;
        }
        Ok(())
    }
}

fn write_stats(f: &mut fmt::Formatter<'_>, stats: Option<&RunStatistics>) -> fmt::Result {
    match stats {
        Some(stats) => write!(f, "{stats}"),
        None => write!(f, "     no samples"),
    }
}
