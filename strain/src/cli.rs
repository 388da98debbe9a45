//! Command line interface for the `strain` binary.
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use strain_core::{ConfigError, RawConfig, RunConfig};

/// Fire concurrent POST requests at a scoring endpoint and report latency statistics.
///
/// Settings can also be loaded from a JSON file with `--config`; flags given on the command line
/// override values from the file.
///
/// # Example
/// ```ignore
/// $ strain -u http://127.0.0.1:8080/score -k $API_KEY -t 20 -i 5
/// $ strain -c load.json --report run.json
/// ```
#[derive(Parser, Debug, Default)]
#[command(name = "strain", version)]
pub struct Cli {
    /// Scoring endpoint URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// API key, sent as `Authorization: Bearer <KEY>`
    #[arg(short, long)]
    pub key: Option<String>,

    /// Number of concurrent workers [default: 20]
    #[arg(short, long)]
    pub threads: Option<u32>,

    /// Calls made by each worker [default: 1]
    #[arg(short, long)]
    pub iterations: Option<u32>,

    /// Per-request timeout, e.g. `500ms` or `1m` [default: 30s]
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Stop starting new calls after this long, e.g. `2m`
    #[arg(long, value_parser = humantime::parse_duration)]
    pub deadline: Option<Duration>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the run report as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Serve Prometheus metrics on this address while the run is in progress
    #[arg(long)]
    pub prometheus: Option<SocketAddr>,
}

impl Cli {
    /// Resolve the final run configuration from the config file (if any) and the flags.
    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => RawConfig::from_json_file(path)?,
            None => RawConfig::default(),
        };
        base.merge(self.overrides()).validate()
    }

    fn overrides(&self) -> RawConfig {
        RawConfig {
            url: self.url.clone(),
            key: self.key.clone(),
            threads: self.threads,
            iterations: self.iterations,
            timeout: self.timeout,
            deadline: self.deadline,
        }
    }
}
