#![doc = include_str!("../README.md")]

pub mod cli;
mod error;
pub mod orchestrator;
pub mod report;
pub mod target;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{RunError, TransportError};
pub use orchestrator::LoadTest;
pub use report::RunReport;
pub use target::{HttpTarget, Payload, Target};

pub mod prelude {
    pub use crate::{HttpTarget, LoadTest, Payload, RunError, RunReport, Target, TransportError};
    pub use strain_core::{RunConfig, RunStatistics, SamplePoint, WorkerId};
}
