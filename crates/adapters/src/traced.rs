// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::sink::{EventSink, SinkError};
use crate::source::{SourceError, WatchSource};
use async_trait::async_trait;
use std::path::Path;
use tw_core::{FsEvent, RawEvent};

/// Wrapper that adds tracing to any WatchSource
#[derive(Clone)]
pub struct TracedWatchSource<S> {
    inner: S,
}

impl<S> TracedWatchSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: WatchSource> WatchSource for TracedWatchSource<S> {
    fn root(&self) -> &Path {
        self.inner.root()
    }

    fn read_events(&self) -> Result<Vec<RawEvent>, SourceError> {
        let span = tracing::debug_span!("source.read_events", root = %self.root().display());
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.read_events();
        let waited = start.elapsed();

        match &result {
            Ok(batch) => tracing::debug!(
                count = batch.len(),
                waited_ms = waited.as_millis() as u64,
                "batch read"
            ),
            // Closing is the normal way a read ends
            Err(SourceError::Closed) => tracing::debug!("source closed"),
            Err(e) => tracing::error!(error = %e, "read failed"),
        }

        result
    }

    fn close(&self) {
        let span = tracing::info_span!("source.close", root = %self.root().display());
        let _guard = span.enter();

        self.inner.close();
        tracing::info!("closed");
    }
}

/// Wrapper that adds tracing to any EventSink
#[derive(Clone)]
pub struct TracedEventSink<K> {
    inner: K,
}

impl<K> TracedEventSink<K> {
    pub fn new(inner: K) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<K: EventSink> EventSink for TracedEventSink<K> {
    async fn dispatch(&self, event: &FsEvent) -> Result<(), SinkError> {
        let result = self.inner.dispatch(event).await;

        match &result {
            Ok(()) => tracing::trace!(
                event = event.name(),
                path = %event.path().display(),
                "dispatched"
            ),
            Err(e) => tracing::warn!(
                event = event.name(),
                path = %event.path().display(),
                error = %e,
                "dispatch failed"
            ),
        }

        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
