//! Fan-out router tests

use std::sync::Arc;

use logmux_protocol::{ContainerIdentity, LogLevel};
use logmux_sinks::remote::{RemoteSink, RemoteSinkConfig};

use super::*;

fn record(message: &str) -> LogRecord {
    let identity = Arc::new(ContainerIdentity::new("id-1", "api", "deploy-api-0"));
    LogRecord::new(LogLevel::Info, message, identity, false)
}

#[test]
fn test_empty_router_drops_records() {
    let router = FanoutRouter::new();
    assert_eq!(router.route(record("hello")), 0);

    let snapshot = router.metrics().snapshot();
    assert_eq!(snapshot.records_received, 1);
    assert_eq!(snapshot.records_dropped, 1);
}

#[tokio::test]
async fn test_fanout_delivers_same_record_to_all_sinks() {
    let (tx_a, mut rx_a) = mpsc::channel(8);
    let (tx_b, mut rx_b) = mpsc::channel(8);

    let mut router = FanoutRouter::new();
    router.register_sink(SinkHandle::new("a", tx_a));
    router.register_sink(SinkHandle::new("b", tx_b));
    assert_eq!(router.sink_count(), 2);

    assert_eq!(router.route(record("hello")), 2);

    let a = rx_a.recv().await.unwrap();
    let b = rx_b.recv().await.unwrap();
    assert_eq!(a.message(), "hello");
    // Zero-copy fan-out: both sinks see the same allocation
    assert!(Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn test_full_sink_does_not_block_siblings() {
    let (tx_full, _rx_full) = mpsc::channel(1);
    let (tx_ok, mut rx_ok) = mpsc::channel(8);

    let mut router = FanoutRouter::new();
    router.register_sink(SinkHandle::new("full", tx_full));
    router.register_sink(SinkHandle::new("ok", tx_ok));

    // First record fills the one-slot channel
    assert_eq!(router.route(record("one")), 2);
    // Second record is dropped for "full" but still reaches "ok"
    assert_eq!(router.route(record("two")), 1);

    assert_eq!(rx_ok.recv().await.unwrap().message(), "one");
    assert_eq!(rx_ok.recv().await.unwrap().message(), "two");

    let snapshot = router.metrics().snapshot();
    assert_eq!(snapshot.backpressure_events, 1);
    assert_eq!(snapshot.sink_sends_failed, 1);
    assert_eq!(snapshot.records_routed, 2);
}

#[tokio::test]
async fn test_closed_sink_does_not_block_siblings() {
    let (tx_closed, rx_closed) = mpsc::channel(8);
    let (tx_ok, mut rx_ok) = mpsc::channel(8);
    drop(rx_closed);

    let mut router = FanoutRouter::new();
    router.register_sink(SinkHandle::new("closed", tx_closed));
    router.register_sink(SinkHandle::new("ok", tx_ok));

    assert_eq!(router.route(record("hello")), 1);
    assert_eq!(rx_ok.recv().await.unwrap().message(), "hello");

    let snapshot = router.metrics().snapshot();
    assert_eq!(snapshot.sink_sends_failed, 1);
}

#[tokio::test]
async fn test_remote_channel_receives_offer() {
    let (client, _server) = tokio::io::duplex(1024);
    let (remote, _sink) = RemoteSink::channel(client);

    let mut router = FanoutRouter::new();
    router.set_remote(remote.clone());
    assert!(router.has_remote());

    assert_eq!(router.route(record("hello")), 1);
    assert_eq!(remote.metrics().snapshot().records_enqueued, 1);
}

#[tokio::test]
async fn test_remote_overflow_counts_as_failed_send() {
    // Budget too small for any record, so every offer drops
    let (client, _server) = tokio::io::duplex(1024);
    let (remote, _sink) = RemoteSink::channel_with_config(
        client,
        RemoteSinkConfig::default().with_capacity_bytes(1),
    );

    let mut router = FanoutRouter::new();
    router.set_remote(remote.clone());

    assert_eq!(router.route(record("too big")), 0);

    let snapshot = router.metrics().snapshot();
    assert_eq!(snapshot.sink_sends_success, 0);
    assert_eq!(snapshot.sink_sends_failed, 1);
    assert_eq!(snapshot.records_routed, 0);
    assert_eq!(snapshot.records_dropped, 1);
    assert_eq!(remote.metrics().snapshot().records_dropped, 1);
}

#[tokio::test]
async fn test_run_drains_channel_until_closed() {
    let (sink_tx, mut sink_rx) = mpsc::channel(8);
    let mut router = FanoutRouter::new();
    router.register_sink(SinkHandle::new("console", sink_tx));
    let metrics = router.metrics();

    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(router.run(rx));

    tx.send(record("one")).await.unwrap();
    tx.send(record("two")).await.unwrap();
    drop(tx);
    task.await.unwrap();

    assert_eq!(sink_rx.recv().await.unwrap().message(), "one");
    assert_eq!(sink_rx.recv().await.unwrap().message(), "two");
    assert_eq!(metrics.snapshot().records_routed, 2);
}
