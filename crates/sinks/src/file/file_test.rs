//! File sink tests

use std::sync::Arc;

use logmux_protocol::{ContainerIdentity, LogLevel, LogRecord};
use tokio::sync::mpsc;

use super::*;

fn record_for(id: &str, name: &str, message: &str) -> Arc<LogRecord> {
    let identity = Arc::new(ContainerIdentity::new(id, name, format!("deploy-{name}")));
    Arc::new(LogRecord::new(LogLevel::Info, message, identity, false))
}

// ============================================================================
// Shared file sink
// ============================================================================

#[tokio::test]
async fn test_file_sink_writes_labeled_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.log");

    let (tx, rx) = mpsc::channel(8);
    let sink = FileSink::new(rx, &path);

    tx.send(record_for("id-1", "api", "hello")).await.unwrap();
    tx.send(record_for("id-2", "worker", "world")).await.unwrap();
    drop(tx);

    let snapshot = sink.run().await;
    assert_eq!(snapshot.records_written, 2);
    assert_eq!(snapshot.write_errors, 0);

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("api"));
    assert!(lines[0].ends_with("| hello"));
    assert!(lines[1].starts_with("worker"));
    assert!(lines[1].ends_with("| world"));
}

#[tokio::test]
async fn test_file_sink_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/deeper/pipeline.log");

    let (tx, rx) = mpsc::channel(1);
    let sink = FileSink::new(rx, &path);

    tx.send(record_for("id-1", "api", "hello")).await.unwrap();
    drop(tx);

    sink.run().await;
    assert!(path.exists());
}

#[tokio::test]
async fn test_file_sink_multiline_record_expands() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.log");

    let (tx, rx) = mpsc::channel(1);
    let sink = FileSink::new(rx, &path);

    tx.send(record_for("id-1", "api", "first\nsecond"))
        .await
        .unwrap();
    drop(tx);

    sink.run().await;

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.matches("api").count(), 2);
    assert_eq!(contents.lines().count(), 2);
}

#[tokio::test]
async fn test_file_sink_degrades_on_unwritable_path() {
    // A directory path cannot be opened as a file
    let dir = tempfile::tempdir().unwrap();

    let (tx, rx) = mpsc::channel(8);
    let sink = FileSink::new(rx, dir.path());

    tx.send(record_for("id-1", "api", "hello")).await.unwrap();
    tx.send(record_for("id-1", "api", "world")).await.unwrap();
    drop(tx);

    // The sink must drain without panicking and count the failures
    let snapshot = sink.run().await;
    assert_eq!(snapshot.records_received, 2);
    assert_eq!(snapshot.records_written, 0);
    assert_eq!(snapshot.write_errors, 2);
}

// ============================================================================
// Per-container file sink
// ============================================================================

#[tokio::test]
async fn test_container_sink_one_file_per_identity() {
    let dir = tempfile::tempdir().unwrap();

    let (tx, rx) = mpsc::channel(8);
    let sink = ContainerFileSink::new(rx, dir.path());

    tx.send(record_for("id-1", "api", "a1")).await.unwrap();
    tx.send(record_for("id-2", "worker", "w1")).await.unwrap();
    tx.send(record_for("id-1", "api", "a2")).await.unwrap();
    drop(tx);

    let snapshot = sink.run().await;
    assert_eq!(snapshot.records_written, 3);

    let api = std::fs::read_to_string(dir.path().join("001_deploy-api.log")).unwrap();
    assert_eq!(api, "a1\na2\n");

    let worker = std::fs::read_to_string(dir.path().join("002_deploy-worker.log")).unwrap();
    assert_eq!(worker, "w1\n");
}

#[tokio::test]
async fn test_container_sink_lines_are_unlabeled() {
    let dir = tempfile::tempdir().unwrap();

    let (tx, rx) = mpsc::channel(1);
    let sink = ContainerFileSink::new(rx, dir.path());

    tx.send(record_for("id-1", "api", "plain line")).await.unwrap();
    drop(tx);

    sink.run().await;

    let contents = std::fs::read_to_string(dir.path().join("001_deploy-api.log")).unwrap();
    assert_eq!(contents, "plain line\n");
}

#[tokio::test]
async fn test_container_sink_sequence_numbers_follow_first_seen_order() {
    let dir = tempfile::tempdir().unwrap();

    let (tx, rx) = mpsc::channel(8);
    let sink = ContainerFileSink::new(rx, dir.path());

    for (id, name) in [("id-b", "beta"), ("id-a", "alpha"), ("id-c", "gamma")] {
        tx.send(record_for(id, name, "x")).await.unwrap();
    }
    drop(tx);

    sink.run().await;

    assert!(dir.path().join("001_deploy-beta.log").exists());
    assert!(dir.path().join("002_deploy-alpha.log").exists());
    assert!(dir.path().join("003_deploy-gamma.log").exists());
}

#[tokio::test]
async fn test_container_sink_keeps_file_and_sequence_across_writer_failure() {
    let dir = tempfile::tempdir().unwrap();
    // Occupy the first identity's path with a directory so the open fails
    std::fs::create_dir(dir.path().join("001_deploy-api.log")).unwrap();

    let (tx, rx) = mpsc::channel(8);
    let sink = ContainerFileSink::new(rx, dir.path());
    let metrics = sink.metrics();
    let task = tokio::spawn(sink.run());

    tx.send(record_for("id-1", "api", "lost")).await.unwrap();
    while metrics.snapshot().write_errors == 0 {
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    }

    // Once the path is usable again the same identity reopens the same
    // file; no fresh sequence number is allocated
    std::fs::remove_dir(dir.path().join("001_deploy-api.log")).unwrap();
    tx.send(record_for("id-1", "api", "recovered")).await.unwrap();
    tx.send(record_for("id-2", "worker", "w1")).await.unwrap();
    drop(tx);

    let snapshot = task.await.unwrap();
    assert_eq!(snapshot.write_errors, 1);
    assert_eq!(snapshot.records_written, 2);

    let api = std::fs::read_to_string(dir.path().join("001_deploy-api.log")).unwrap();
    assert_eq!(api, "recovered\n");
    let worker = std::fs::read_to_string(dir.path().join("002_deploy-worker.log")).unwrap();
    assert_eq!(worker, "w1\n");
    assert!(!dir.path().join("002_deploy-api.log").exists());
}

#[tokio::test]
async fn test_container_sink_same_name_distinct_ids_get_distinct_files() {
    let dir = tempfile::tempdir().unwrap();

    let (tx, rx) = mpsc::channel(8);
    let sink = ContainerFileSink::new(rx, dir.path());

    // Same qualified name, different instance ids
    let a = Arc::new(ContainerIdentity::new("id-1", "api", "deploy-api"));
    let b = Arc::new(ContainerIdentity::new("id-2", "api", "deploy-api"));
    tx.send(Arc::new(LogRecord::new(
        LogLevel::Info,
        "from first",
        a,
        false,
    )))
    .await
    .unwrap();
    tx.send(Arc::new(LogRecord::new(
        LogLevel::Info,
        "from second",
        b,
        false,
    )))
    .await
    .unwrap();
    drop(tx);

    sink.run().await;

    let first = std::fs::read_to_string(dir.path().join("001_deploy-api.log")).unwrap();
    let second = std::fs::read_to_string(dir.path().join("002_deploy-api.log")).unwrap();
    assert_eq!(first, "from first\n");
    assert_eq!(second, "from second\n");
}
