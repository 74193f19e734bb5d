//! Heartbeat ticker tests
//!
//! All tests run with paused time; sleeps advance the clock instantly.

use std::time::Duration;

use logmux_sinks::remote::RemoteSink;
use tokio::io::AsyncReadExt;

use super::*;

#[tokio::test(start_paused = true)]
async fn test_first_heartbeat_fires_before_any_interval() {
    let (client, _server) = tokio::io::duplex(4096);
    let (remote, _sink) = RemoteSink::channel(client);

    let ticker = HeartbeatTicker::start(remote.clone());
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert_eq!(remote.metrics().snapshot().records_enqueued, 1);
    ticker.stop();
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_repeats_every_interval() {
    let (client, _server) = tokio::io::duplex(4096);
    let (remote, _sink) = RemoteSink::channel(client);

    let ticker = HeartbeatTicker::start(remote.clone());
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(remote.metrics().snapshot().records_enqueued, 1);

    tokio::time::sleep(HEARTBEAT_INTERVAL).await;
    assert_eq!(remote.metrics().snapshot().records_enqueued, 2);

    tokio::time::sleep(HEARTBEAT_INTERVAL * 2).await;
    assert_eq!(remote.metrics().snapshot().records_enqueued, 4);

    ticker.stop();
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_the_timer() {
    let (client, _server) = tokio::io::duplex(4096);
    let (remote, _sink) = RemoteSink::channel(client);

    let ticker = HeartbeatTicker::start(remote.clone());
    tokio::time::sleep(Duration::from_millis(1)).await;
    ticker.stop();

    tokio::time::sleep(HEARTBEAT_INTERVAL * 10).await;
    assert_eq!(remote.metrics().snapshot().records_enqueued, 1);
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_the_timer() {
    let (client, _server) = tokio::io::duplex(4096);
    let (remote, _sink) = RemoteSink::channel(client);

    {
        let _ticker = HeartbeatTicker::start(remote.clone());
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    tokio::time::sleep(HEARTBEAT_INTERVAL * 10).await;
    assert_eq!(remote.metrics().snapshot().records_enqueued, 1);
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_entry_is_silly_keepalive() {
    let (client, mut server) = tokio::io::duplex(4096);
    let (remote, sink) = RemoteSink::channel(client);
    let sink_task = tokio::spawn(sink.run());

    let ticker = HeartbeatTicker::start(remote.clone());
    tokio::time::sleep(Duration::from_millis(1)).await;
    ticker.stop();
    drop(remote);
    sink_task.await.unwrap();

    let mut buf = Vec::new();
    server.read_to_end(&mut buf).await.unwrap();
    let frame = buf.split(|&b| b == b'\n').next().unwrap();
    let entry: serde_json::Value = serde_json::from_slice(frame).unwrap();
    assert_eq!(entry["level"], "silly");
    assert_eq!(entry["message"], "keepalive");
}
