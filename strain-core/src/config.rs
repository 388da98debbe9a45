use crate::{DEFAULT_ITERATIONS, DEFAULT_REQUEST_TIMEOUT, DEFAULT_THREADS, MAX_THREADS};
use serde::Deserialize;
use serde_with::{serde_as, DurationSecondsWithFrac};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No target URL provided.")]
    MissingUrl,

    #[error("No API key provided.")]
    MissingKey,

    #[error("Invalid target URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported URL scheme `{0}`; expected http or https.")]
    UnsupportedScheme(String),

    #[error("Thread count must be at least 1.")]
    ZeroThreads,

    #[error("Thread count {0} exceeds the limit of {MAX_THREADS}.")]
    TooManyThreads(u32),

    #[error("Iteration count must be at least 1.")]
    ZeroIterations,

    #[error("Request timeout must be greater than zero.")]
    ZeroTimeout,

    #[error("Unable to read configuration file {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration file {path:?}: {source}")]
    ParseFile {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Validated configuration for a single load test run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target_url: Url,
    pub auth_token: String,
    pub threads: NonZeroU32,
    pub iterations: NonZeroU32,
    pub request_timeout: Duration,
    pub deadline: Option<Duration>,
}

impl RunConfig {
    pub fn new(target_url: &str, auth_token: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            target_url: parse_target_url(target_url)?,
            auth_token: auth_token.to_string(),
            threads: NonZeroU32::new(DEFAULT_THREADS).ok_or(ConfigError::ZeroThreads)?,
            iterations: NonZeroU32::new(DEFAULT_ITERATIONS).ok_or(ConfigError::ZeroIterations)?,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            deadline: None,
        })
    }

    pub fn threads(mut self, threads: NonZeroU32) -> Self {
        self.threads = threads;
        self
    }

    pub fn iterations(mut self, iterations: NonZeroU32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Number of calls a run makes when it is not cut short by the deadline.
    pub fn expected_calls(&self) -> u64 {
        u64::from(self.threads.get()) * u64::from(self.iterations.get())
    }
}

/// Unvalidated settings, as read from a JSON configuration file or the command line.
///
/// A JSON `null` is treated the same as an absent key.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    pub url: Option<String>,
    pub key: Option<String>,
    pub threads: Option<u32>,
    pub iterations: Option<u32>,
    #[serde_as(as = "Option<DurationSecondsWithFrac<f64>>")]
    pub timeout: Option<Duration>,
    #[serde_as(as = "Option<DurationSecondsWithFrac<f64>>")]
    pub deadline: Option<Duration>,
}

impl RawConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading configuration from {path:?}");
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layer `overrides` on top of `self`; any value set in `overrides` wins.
    pub fn merge(self, overrides: RawConfig) -> RawConfig {
        RawConfig {
            url: overrides.url.or(self.url),
            key: overrides.key.or(self.key),
            threads: overrides.threads.or(self.threads),
            iterations: overrides.iterations.or(self.iterations),
            timeout: overrides.timeout.or(self.timeout),
            deadline: overrides.deadline.or(self.deadline),
        }
    }

    pub fn validate(self) -> Result<RunConfig, ConfigError> {
        let url = self.url.filter(|u| !u.trim().is_empty());
        let url = url.ok_or(ConfigError::MissingUrl)?;
        let key = self.key.ok_or(ConfigError::MissingKey)?;

        let threads = self.threads.unwrap_or(DEFAULT_THREADS);
        if threads > MAX_THREADS {
            return Err(ConfigError::TooManyThreads(threads));
        }
        let iterations = self.iterations.unwrap_or(DEFAULT_ITERATIONS);
        let timeout = self.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        let mut config = RunConfig::new(&url, &key)?
            .threads(NonZeroU32::new(threads).ok_or(ConfigError::ZeroThreads)?)
            .iterations(NonZeroU32::new(iterations).ok_or(ConfigError::ZeroIterations)?)
            .request_timeout(timeout);
        config.deadline = self.deadline;

        Ok(config)
    }
}

fn parse_target_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}
