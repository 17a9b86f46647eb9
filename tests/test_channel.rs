//! Integration tests for the FIFO channel pair

mod common;

use std::io::Write;
use std::os::unix::fs::FileTypeExt;
use std::time::{Duration, Instant};

use droid_agent::control::protocol::{decode, requests};
use droid_agent::{DroidError, FifoTransport, ScopeKey, SessionId, SessionOptions};
use futures::StreamExt;

fn append(path: &std::path::Path, text: &str) {
    let mut file = std::fs::OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(text.as_bytes()).unwrap();
}

#[test]
fn test_create_twice_leaves_one_fifo_and_empty_log() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let options = common::options(dir.path());
    let scope = ScopeKey::new("42", "alice");

    let first = FifoTransport::create(scope.clone(), &options).unwrap();
    append(first.log_path(), "old output\n");

    let second = FifoTransport::create(scope, &options).unwrap();
    assert_eq!(first.command_path(), second.command_path());

    let meta = std::fs::symlink_metadata(second.command_path()).unwrap();
    assert!(meta.file_type().is_fifo());
    assert_eq!(std::fs::read_to_string(second.log_path()).unwrap(), "");

    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 2);
    assert!(second.command_path().ends_with("duo-42-alice"));
    assert!(second.log_path().ends_with("duo-42-alice.log"));
}

#[test]
fn test_create_in_unwritable_location_names_path() {
    let options = SessionOptions::builder()
        .channel_dir("/proc/definitely/not/here")
        .build();
    let err = FifoTransport::create(ScopeKey::new("1", "a"), &options).unwrap_err();
    assert!(matches!(err, DroidError::ChannelCreation { .. }));
    assert!(err.to_string().contains("/proc/definitely/not/here"));
}

#[tokio::test]
async fn test_send_writes_one_encoded_line() {
    let dir = tempfile::tempdir().unwrap();
    let transport =
        FifoTransport::create(ScopeKey::new("42", "alice"), &common::options(dir.path())).unwrap();

    let reader = common::drain_fifo(transport.command_path());
    transport
        .send(&requests::add_user_message("hello"))
        .await
        .unwrap();
    let received = reader.join().unwrap();

    assert!(received.ends_with('\n'));
    assert_eq!(received.lines().count(), 1);
    let value: serde_json::Value = serde_json::from_str(received.trim()).unwrap();
    assert_eq!(value["jsonrpc"], "2.0");
    assert_eq!(value["type"], "request");
    assert_eq!(value["factoryApiVersion"], "1.0.0");
    assert_eq!(value["method"], "droid.add_user_message");
    assert_eq!(value["params"]["text"], "hello");
    assert!(value["id"].as_str().unwrap().starts_with("msg-"));
}

#[tokio::test]
async fn test_send_without_fifo_is_command_channel_missing() {
    let dir = tempfile::tempdir().unwrap();
    let transport = FifoTransport::restore(
        ScopeKey::new("42", "ghost"),
        None,
        &common::options(dir.path()),
    );
    let err = transport
        .send(&requests::interrupt_session())
        .await
        .unwrap_err();
    assert!(matches!(err, DroidError::CommandChannelMissing(_)));
}

#[tokio::test]
async fn test_send_without_reader_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let options = SessionOptions::builder()
        .channel_dir(dir.path())
        .write_timeout(Some(Duration::from_millis(200)))
        .build();
    let transport = FifoTransport::create(ScopeKey::new("42", "alice"), &options).unwrap();

    let started = Instant::now();
    let err = transport
        .send(&requests::interrupt_session())
        .await
        .unwrap_err();
    assert!(matches!(err, DroidError::Timeout(_)));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_tail_log_yields_complete_lines_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let transport =
        FifoTransport::create(ScopeKey::new("42", "alice"), &common::options(dir.path())).unwrap();
    let log = transport.log_path().to_path_buf();

    append(&log, "first\n\n  second  \npart");
    let mut lines = Box::pin(transport.tail_log(0));

    assert_eq!(lines.next().await.unwrap().unwrap(), "first");
    assert_eq!(lines.next().await.unwrap().unwrap(), "second");

    let pending = tokio::time::timeout(Duration::from_millis(100), lines.next()).await;
    assert!(pending.is_err(), "partial line must be held back");

    append(&log, "ial\n");
    assert_eq!(lines.next().await.unwrap().unwrap(), "partial");
}

#[tokio::test]
async fn test_tail_log_from_offset() {
    let dir = tempfile::tempdir().unwrap();
    let transport =
        FifoTransport::create(ScopeKey::new("42", "alice"), &common::options(dir.path())).unwrap();
    append(transport.log_path(), "skip\nkeep\n");

    let mut lines = Box::pin(transport.tail_log(5));
    assert_eq!(lines.next().await.unwrap().unwrap(), "keep");
}

#[tokio::test]
async fn test_wait_for_session_id() {
    let dir = tempfile::tempdir().unwrap();
    let transport =
        FifoTransport::create(ScopeKey::new("42", "alice"), &common::options(dir.path())).unwrap();

    let missing = transport
        .wait_for_session_id(Duration::from_millis(50), Duration::from_millis(10))
        .await;
    assert_eq!(missing, None);

    append(transport.log_path(), &format!("{}\n", common::init_response("sess-7")));
    let found = transport
        .wait_for_session_id(Duration::from_secs(1), Duration::from_millis(10))
        .await;
    assert_eq!(found, Some(SessionId::new("sess-7")));
    assert!(decode(&common::init_response("x")).is_some());
}

#[test]
fn test_cleanup_is_idempotent_and_keeps_log() {
    let dir = tempfile::tempdir().unwrap();
    let transport =
        FifoTransport::create(ScopeKey::new("42", "alice"), &common::options(dir.path())).unwrap();
    assert!(!transport.is_alive());

    transport.cleanup();
    transport.cleanup();

    assert!(!transport.command_path().exists());
    assert!(transport.log_path().exists());
    assert!(!transport.is_alive());
}
