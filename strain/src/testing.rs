//! Simulated targets for unit tests.
use crate::error::TransportError;
use crate::target::{Payload, Target};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Always answers with `status` after `delay`.
pub(crate) struct Fixed {
    pub status: u16,
    pub delay: Duration,
}

impl Fixed {
    pub fn ok() -> Self {
        Self {
            status: 200,
            delay: Duration::ZERO,
        }
    }

    pub fn ok_after(delay: Duration) -> Self {
        Self { status: 200, delay }
    }
}

impl Target for Fixed {
    async fn post(&self, _payload: &Payload) -> Result<u16, TransportError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.status)
    }
}

/// Never answers.
pub(crate) struct Unreachable;

impl Target for Unreachable {
    async fn post(&self, _payload: &Payload) -> Result<u16, TransportError> {
        Err(TransportError::Unavailable("connection refused".to_string()))
    }
}

/// Panics on every call.
pub(crate) struct Panicking;

impl Target for Panicking {
    async fn post(&self, _payload: &Payload) -> Result<u16, TransportError> {
        panic!("target blew up")
    }
}

/// Alternates between a 200 response and a transport failure, starting with 200.
#[derive(Default)]
pub(crate) struct Alternating {
    calls: AtomicU64,
    ok: AtomicU64,
}

impl Alternating {
    pub fn ok_count(&self) -> u64 {
        self.ok.load(Ordering::SeqCst)
    }
}

impl Target for Alternating {
    async fn post(&self, _payload: &Payload) -> Result<u16, TransportError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
            self.ok.fetch_add(1, Ordering::SeqCst);
            Ok(200)
        } else {
            Err(TransportError::Unavailable("reset by peer".to_string()))
        }
    }
}
