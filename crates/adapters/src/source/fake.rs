// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake watch source for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SourceError, WatchSource};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use tw_core::RawEvent;

/// Recorded source call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    ReadEvents,
    Close,
}

enum Scripted {
    Batch(Vec<RawEvent>),
    Failure(String),
}

#[derive(Default)]
struct FakeState {
    script: VecDeque<Scripted>,
    closed: bool,
    calls: Vec<SourceCall>,
}

/// Fake watch source fed by scripted batches.
///
/// `read_events` returns the next scripted batch, or blocks until one is
/// pushed or the source is closed. Clones share state.
#[derive(Clone)]
pub struct FakeWatchSource {
    root: PathBuf,
    state: Arc<Mutex<FakeState>>,
    changed: Arc<Condvar>,
}

impl FakeWatchSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            state: Arc::new(Mutex::new(FakeState::default())),
            changed: Arc::new(Condvar::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a batch for a future `read_events`
    pub fn push_batch(&self, batch: Vec<RawEvent>) {
        self.lock().script.push_back(Scripted::Batch(batch));
        self.changed.notify_all();
    }

    /// Make a future `read_events` fail
    pub fn push_failure(&self, message: impl Into<String>) {
        self.lock()
            .script
            .push_back(Scripted::Failure(message.into()));
        self.changed.notify_all();
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SourceCall> {
        self.lock().calls.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Scripted batches not yet read
    pub fn pending(&self) -> usize {
        self.lock().script.len()
    }
}

impl WatchSource for FakeWatchSource {
    fn root(&self) -> &Path {
        &self.root
    }

    fn read_events(&self) -> Result<Vec<RawEvent>, SourceError> {
        let mut state = self.lock();
        state.calls.push(SourceCall::ReadEvents);
        loop {
            if state.closed {
                return Err(SourceError::Closed);
            }
            match state.script.pop_front() {
                Some(Scripted::Batch(batch)) => return Ok(batch),
                Some(Scripted::Failure(message)) => return Err(SourceError::Failed(message)),
                None => {
                    state = self
                        .changed
                        .wait(state)
                        .unwrap_or_else(|e| e.into_inner());
                }
            }
        }
    }

    fn close(&self) {
        let mut state = self.lock();
        state.calls.push(SourceCall::Close);
        state.closed = true;
        drop(state);
        self.changed.notify_all();
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
