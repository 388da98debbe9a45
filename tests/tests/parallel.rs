mod utils;
#[allow(unused)]
use utils::*;

use std::time::Duration;
use strain::prelude::*;

fn elapsed(runtime: &tokio::runtime::Runtime, threads: u32, iterations: u32) -> Duration {
    runtime.block_on(async {
        let (addr, mock) = mock_service::spawn().await.unwrap();
        let report = LoadTest::http(config(addr, "/delay/ms/10/score", threads, iterations))
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(report.global.unwrap().success, 50);
        assert_eq!(mock.ok(), 50);
        report.total_elapsed
    })
}

#[ntest::timeout(30000)]
#[test]
fn concurrent_workers_beat_a_single_worker() {
    init();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(10)
        .enable_all()
        .build()
        .unwrap();

    let parallel = elapsed(&runtime, 10, 5);
    let serial = elapsed(&runtime, 1, 50);

    assert!(
        parallel * 3 < serial,
        "parallel={parallel:?} serial={serial:?}"
    );
}
