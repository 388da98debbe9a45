use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::OnceLock;
use std::time::Duration;
use strain_core::RunConfig;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            default_panic(info);
            error!("Panic occurred: {info:?}");
        }));

        let _ = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_env_filter("strain=debug,mock_service=debug")
            .with_test_writer()
            .try_init();
    });
}

#[allow(unused)]
pub fn config(addr: SocketAddr, route: &str, threads: u32, iterations: u32) -> RunConfig {
    RunConfig::new(&format!("http://{addr}{route}"), "test-key")
        .unwrap()
        .threads(NonZeroU32::new(threads).unwrap())
        .iterations(NonZeroU32::new(iterations).unwrap())
        .request_timeout(Duration::from_secs(5))
}

/// Address with nothing listening on it.
#[allow(unused)]
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
