// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem watch sources

mod native;

pub use native::NotifyWatchSource;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeWatchSource, SourceCall};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tw_core::RawEvent;

/// Errors from a watch source
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source was closed; no more events will be produced
    #[error("watch source closed")]
    Closed,
    #[error("watch root not found: {0}")]
    RootNotFound(PathBuf),
    #[error("watch backend error: {0}")]
    Backend(#[from] notify::Error),
    #[error("watch failed: {0}")]
    Failed(String),
}

/// The OS filesystem watch capability consumed by the event buffer.
///
/// `read_events` blocks until at least one event is available and returns
/// everything ready at that moment. After `close`, pending and future reads
/// return [`SourceError::Closed`].
pub trait WatchSource: Send + Sync + 'static {
    /// The watched root path
    fn root(&self) -> &Path;

    /// Block for the next batch of raw events
    fn read_events(&self) -> Result<Vec<RawEvent>, SourceError>;

    /// Stop watching; unblocks a pending `read_events`. Idempotent.
    fn close(&self);
}
