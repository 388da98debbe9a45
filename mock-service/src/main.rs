use metrics_exporter_prometheus::PrometheusBuilder;
use mock_service::MockState;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter("mock_service=debug,tower_http=info")
        .init();

    PrometheusBuilder::new()
        .with_http_listener("0.0.0.0:8003".parse::<SocketAddr>()?)
        .install()?;

    let state = MockState::default();
    tokio::spawn(mock_service::rps_measure_task(state.clone()));

    let listener = TcpListener::bind("0.0.0.0:3002").await?;
    mock_service::run(listener, state).await
}
