// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::sink::FakeEventSink;
use crate::source::FakeWatchSource;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tw_core::RawEventKind;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a closure with captured tracing output
fn with_tracing<F, T>(f: F) -> (String, T)
where
    F: FnOnce() -> T,
{
    let logs = CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (logs.contents(), result)
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

#[test]
fn traced_source_logs_batch_size() {
    let fake = FakeWatchSource::new("/runs/latest");
    fake.push_batch(vec![
        RawEvent::new(RawEventKind::Create, "/runs/latest/a"),
        RawEvent::new(RawEventKind::Modify, "/runs/latest/a"),
    ]);
    let traced = TracedWatchSource::new(fake);

    let (logs, result) = with_tracing(|| traced.read_events());

    assert_eq!(result.unwrap().len(), 2);
    assert!(logs.contains("source.read_events"), "Logs:\n{}", logs);
    assert!(logs.contains("/runs/latest"), "Logs:\n{}", logs);
    assert!(logs.contains("count=2"), "Logs:\n{}", logs);
    assert!(logs.contains("waited_ms"), "Logs:\n{}", logs);
}

#[test]
fn traced_source_logs_failure_as_error() {
    let fake = FakeWatchSource::new("/w");
    fake.push_failure("queue overflow");
    let traced = TracedWatchSource::new(fake);

    let (logs, result) = with_tracing(|| traced.read_events());

    assert!(result.is_err());
    assert!(logs.contains("ERROR"), "Logs:\n{}", logs);
    assert!(logs.contains("queue overflow"), "Logs:\n{}", logs);
}

#[test]
fn traced_source_close_reaches_inner() {
    let fake = FakeWatchSource::new("/w");
    let traced = TracedWatchSource::new(fake.clone());

    let (logs, ()) = with_tracing(|| traced.close());

    assert!(fake.is_closed());
    assert!(logs.contains("source.close"), "Logs:\n{}", logs);

    let (logs, result) = with_tracing(|| traced.read_events());
    assert!(matches!(result, Err(SourceError::Closed)));
    assert!(logs.contains("source closed"), "Logs:\n{}", logs);
    assert!(!logs.contains("ERROR"), "Logs:\n{}", logs);
}

#[test]
fn traced_sink_logs_failed_dispatch() {
    let fake = FakeEventSink::new();
    fake.reject_with("downstream gone");
    let traced = TracedEventSink::new(fake);
    let event = FsEvent::Created {
        path: PathBuf::from("/w/new.txt"),
        is_directory: false,
    };

    let (logs, result) = with_tracing(|| block_on(traced.dispatch(&event)));

    assert!(result.is_err());
    assert!(logs.contains("dispatch failed"), "Logs:\n{}", logs);
    assert!(logs.contains("file:created"), "Logs:\n{}", logs);
    assert!(logs.contains("downstream gone"), "Logs:\n{}", logs);
}

#[test]
fn traced_sink_passes_events_through() {
    let fake = FakeEventSink::new();
    let traced = TracedEventSink::new(fake.clone());
    let event = FsEvent::Deleted {
        path: PathBuf::from("/w/old.txt"),
        is_directory: false,
    };

    let (logs, result) = with_tracing(|| block_on(traced.dispatch(&event)));

    assert!(result.is_ok());
    assert_eq!(fake.events(), vec![event]);
    assert!(logs.contains("dispatched"), "Logs:\n{}", logs);
}
