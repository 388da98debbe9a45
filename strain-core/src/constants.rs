use std::time::Duration;

/// Status code counted as a successful call.
pub const SUCCESS_STATUS: u16 = 200;

/// Status recorded in place of a response when the call failed at the transport level.
pub const TRANSPORT_ERROR_STATUS: u16 = 500;

/// Latency recorded in place of a measurement when the call failed at the transport level.
pub const TRANSPORT_ERROR_ELAPSED: Duration = Duration::from_secs(1);

/// The default number of concurrent workers.
pub const DEFAULT_THREADS: u32 = 20;

/// Upper bound on concurrent workers. Each worker gets its own runtime thread.
pub const MAX_THREADS: u32 = 1024;

/// The default number of calls each worker makes.
pub const DEFAULT_ITERATIONS: u32 = 1;

/// The default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How often the orchestrator wakes up while waiting on workers.
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Emit a progress line every Nth wakeup.
pub const PROGRESS_EVERY_N_TICKS: u64 = 3;

/// Names sent as test payloads.
pub const NAME_ROSTER: [&str; 5] = ["Dave", "Sue", "Dan", "Joe", "Beth"];
