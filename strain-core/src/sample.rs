use crate::{SUCCESS_STATUS, TRANSPORT_ERROR_ELAPSED, TRANSPORT_ERROR_STATUS};
use std::time::Duration;

/// Identifies the worker that produced a sample. Ids are assigned from 1.
pub type WorkerId = u32;

/// Outcome of a single call against the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub worker_id: WorkerId,
    pub status: u16,
    pub elapsed: Duration,
}

impl SamplePoint {
    pub fn new(worker_id: WorkerId, status: u16, elapsed: Duration) -> Self {
        Self {
            worker_id,
            status,
            elapsed,
        }
    }

    /// Sample recorded when the request never produced a response.
    pub fn transport_error(worker_id: WorkerId) -> Self {
        Self::new(worker_id, TRANSPORT_ERROR_STATUS, TRANSPORT_ERROR_ELAPSED)
    }

    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}
