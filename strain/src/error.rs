use std::path::PathBuf;
use strain_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("API key cannot be used as a header value.")]
    InvalidKey(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Unable to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Unable to build async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Worker {0} panicked.")]
    WorkerPanicked(u32),

    #[error("Unable to serialize report: {0}")]
    ReportFormat(#[from] serde_json::Error),

    #[error("Unable to write report to {path:?}: {source}")]
    ReportWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[cfg(feature = "metrics")]
    #[error("Unable to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// A call that never produced an HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Target unavailable: {0}")]
    Unavailable(String),
}
