use clap::Parser;
use std::process::ExitCode;
use strain::cli::Cli;
use strain::{LoadTest, RunError};
use strain_core::RunConfig;
#[allow(unused_imports)]
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_LOG_FILTER: &str = "strain=info,strain_core=info";

fn main() -> ExitCode {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();
    let config = match cli.run_config() {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: RunConfig) -> Result<(), RunError> {
    // NOTE: One runtime thread per worker, so workers never queue behind each other.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.threads.get() as usize)
        .enable_all()
        .build()
        .map_err(RunError::Runtime)?;

    runtime.block_on(async {
        install_exporter(cli)?;

        let report = LoadTest::http(config)?.run().await?;
        println!("{report}");

        if let Some(path) = &cli.report {
            report.write_json(path)?;
            info!("Report written to {}", path.display());
        }
        Ok(())
    })
}

#[cfg(feature = "metrics")]
fn install_exporter(cli: &Cli) -> Result<(), RunError> {
    if let Some(addr) = cli.prometheus {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()?;
        info!("Serving metrics on {addr}");
    }
    Ok(())
}

#[cfg(not(feature = "metrics"))]
fn install_exporter(cli: &Cli) -> Result<(), RunError> {
    if cli.prometheus.is_some() {
        warn!("Built without the `metrics` feature; ignoring --prometheus.");
    }
    Ok(())
}
