mod utils;
#[allow(unused)]
use utils::*;

use std::collections::BTreeSet;
use std::time::Duration;
use strain::prelude::*;
use strain_core::{TRANSPORT_ERROR_ELAPSED, TRANSPORT_ERROR_STATUS};

#[tokio::test(flavor = "multi_thread", worker_threads = 3)]
async fn small_run_against_mock() {
    init();
    let (addr, mock) = mock_service::spawn().await.unwrap();

    let report = LoadTest::http(config(addr, "/delay/ms/10/score", 3, 2))
        .unwrap()
        .run()
        .await
        .unwrap();

    let global = report.global.unwrap();
    assert_eq!(global.calls, 6);
    assert_eq!(global.success, 6);
    assert!(global.min >= Duration::from_millis(10));
    assert!(global.average >= Duration::from_millis(10));
    assert!(global.max < Duration::from_secs(1));

    assert_eq!(report.workers.len(), 3);
    for stats in report.workers.values() {
        let stats = stats.unwrap();
        assert_eq!(stats.calls, 2);
        assert_eq!(stats.success, 2);
    }

    assert_eq!(mock.ok(), 6);
    assert_eq!(mock.unauthorized(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn flaky_endpoint() {
    init();
    let (addr, mock) = mock_service::spawn().await.unwrap();

    let test = LoadTest::http(config(addr, "/flaky/score", 2, 3)).unwrap();
    let results = test.results();
    let report = test.run().await.unwrap();

    let global = report.global.unwrap();
    assert_eq!(global.calls, 6);
    assert_eq!(global.success as u64, mock.ok());
    assert_eq!(mock.ok(), 3);

    let statuses: BTreeSet<u16> = results.snapshot().iter().map(|s| s.status).collect();
    assert_eq!(statuses, BTreeSet::from([200, 503]));
}

#[tokio::test]
async fn error_statuses_are_recorded() {
    init();
    let (addr, _mock) = mock_service::spawn().await.unwrap();

    let test = LoadTest::http(config(addr, "/status/404/score", 2, 2)).unwrap();
    let results = test.results();
    let report = test.run().await.unwrap();

    assert_eq!(report.global.unwrap().success, 0);
    assert!(results.snapshot().iter().all(|s| s.status == 404));
}

#[tokio::test]
async fn unreachable_endpoint() {
    init();
    let addr = closed_addr().await;

    let test = LoadTest::http(config(addr, "/score", 3, 2)).unwrap();
    let results = test.results();
    let report = test.run().await.unwrap();

    let global = report.global.unwrap();
    assert_eq!(global.calls, 6);
    assert_eq!(global.success, 0);
    for sample in results.snapshot() {
        assert_eq!(sample.status, TRANSPORT_ERROR_STATUS);
        assert_eq!(sample.elapsed, TRANSPORT_ERROR_ELAPSED);
    }
}

#[tokio::test]
async fn request_timeout_is_a_transport_error() {
    init();
    let (addr, _mock) = mock_service::spawn().await.unwrap();

    let config = config(addr, "/delay/ms/2000/score", 1, 1).request_timeout(Duration::from_millis(50));
    let test = LoadTest::http(config).unwrap();
    let results = test.results();
    test.run().await.unwrap();

    let samples = results.snapshot();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].status, TRANSPORT_ERROR_STATUS);
}

#[tokio::test]
async fn report_round_trips_to_disk() {
    init();
    let (addr, _mock) = mock_service::spawn().await.unwrap();

    let report = LoadTest::http(config(addr, "/score", 2, 1))
        .unwrap()
        .run()
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    report.write_json(&path).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["global"]["calls"], 2);
    assert_eq!(written["truncated"], false);
    assert!(written["workers"]["1"].is_object());
    assert!(written["workers"]["2"].is_object());
}
