// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event buffer: holds raw watch events long enough to pair renames
//!
//! A rename shows up as two independent notifications, move-from and
//! move-to, sharing a cookie. The buffer drains its watch source on a
//! background thread into a [`DelayedQueue`]. When a move-to arrives, the
//! matching move-from is pulled out of the queue (if it has not been released
//! yet) and both are put back as one [`PairedMove`].
//!
//! The background thread stops when asked to, when the source fails, or after
//! the batch in which the watched root itself was deleted. On the way out it
//! closes the source first, then the queue. When the thread stops on its own,
//! events already held are still released on schedule before `read_event`
//! starts returning `None`; an explicit [`EventBuffer::close`] ends the stream
//! at once.

use crate::error::EngineError;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tw_adapters::{NotifyWatchSource, SourceError, TracedWatchSource, WatchSource};
use tw_core::{
    BufferedEvent, Clock, DelayedQueue, PairedMove, RawEvent, SystemClock, WatchConfig,
};

/// Lifecycle of the background reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    Running,
    Stopped,
}

struct Shared<S, C: Clock> {
    source: S,
    queue: DelayedQueue<BufferedEvent, C>,
    stop: AtomicBool,
    running: AtomicBool,
    deleted_self: AtomicBool,
}

impl<S: WatchSource, C: Clock> Shared<S, C> {
    fn run(&self) {
        let root = self.source.root().to_path_buf();
        while !self.stop.load(Ordering::SeqCst) && !self.deleted_self.load(Ordering::SeqCst) {
            let batch = match self.source.read_events() {
                Ok(batch) => batch,
                Err(SourceError::Closed) => break,
                Err(e) => {
                    tracing::warn!(root = %root.display(), error = %e, "watch source failed, stopping buffer");
                    break;
                }
            };
            for raw in batch {
                self.accept(raw, &root);
            }
        }

        self.source.close();
        self.running.store(false, Ordering::SeqCst);
        self.queue.close_when_drained();
        tracing::debug!(
            root = %root.display(),
            deleted_self = self.deleted_self.load(Ordering::SeqCst),
            "buffer stopped"
        );
    }

    fn accept(&self, raw: RawEvent, root: &Path) {
        tracing::debug!(event = %raw, "in-event");
        let deletes_root = raw.deletes_root(root);

        if raw.is_moved_to() {
            let cookie = raw.cookie;
            let from = self
                .queue
                .remove(|held| held.is_move_from_with(cookie))
                .and_then(BufferedEvent::into_single);
            match from {
                Some(from) => self.queue.put(PairedMove { from, to: raw }.into()),
                None => {
                    tracing::debug!(cookie, "could not find matching move_from event");
                    self.queue.put(raw.into());
                }
            }
        } else {
            self.queue.put(raw.into());
        }

        if deletes_root {
            self.deleted_self.store(true, Ordering::SeqCst);
        }
    }
}

/// Wraps a watch source and releases its events after `delay`, with rename
/// halves coalesced into a single [`BufferedEvent::Move`]
pub struct EventBuffer<S: WatchSource, C: Clock = SystemClock> {
    shared: Arc<Shared<S, C>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl EventBuffer<TracedWatchSource<NotifyWatchSource>> {
    /// Watch `root` with the platform's native notifications
    pub fn watch(root: &Path, config: &WatchConfig) -> Result<Self, EngineError> {
        let source = NotifyWatchSource::new(root, config.recursive)?;
        Self::start(TracedWatchSource::new(source), config.delay)
    }
}

impl<S: WatchSource> EventBuffer<S> {
    pub fn start(source: S, delay: Duration) -> Result<Self, EngineError> {
        Self::with_clock(source, delay, SystemClock)
    }
}

impl<S: WatchSource, C: Clock> EventBuffer<S, C> {
    /// Start the background reader over `source`
    pub fn with_clock(source: S, delay: Duration, clock: C) -> Result<Self, EngineError> {
        let shared = Arc::new(Shared {
            source,
            queue: DelayedQueue::with_clock(delay, clock),
            stop: AtomicBool::new(false),
            running: AtomicBool::new(true),
            deleted_self: AtomicBool::new(false),
        });

        let worker = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("tw-buffer".to_string())
                .spawn(move || shared.run())
                .map_err(EngineError::Spawn)?
        };
        tracing::debug!(
            root = %shared.source.root().display(),
            delay_ms = delay.as_millis() as u64,
            "buffer started"
        );

        Ok(Self {
            shared,
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Block for the next event or pair; `None` once the buffer has stopped
    pub fn read_event(&self) -> Option<BufferedEvent> {
        self.shared.queue.get()
    }

    /// The next event if its delay has already elapsed
    pub fn try_read_event(&self) -> Option<BufferedEvent> {
        self.shared.queue.try_get()
    }

    /// Stop the background reader and wake any blocked `read_event`.
    /// Idempotent.
    pub fn close(&self) {
        self.shared.stop.store(true, Ordering::SeqCst);
        self.shared.source.close();

        let worker = self
            .worker
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(worker) = worker {
            if worker.thread().id() != thread::current().id() && worker.join().is_err() {
                tracing::error!("buffer thread panicked");
            }
        }
        // Normally already closed by the worker; covers a panicked worker
        self.shared.queue.close();
    }

    pub fn state(&self) -> BufferState {
        if self.shared.running.load(Ordering::SeqCst) {
            BufferState::Running
        } else {
            BufferState::Stopped
        }
    }

    /// True once the watched root was reported deleted
    pub fn deleted_self(&self) -> bool {
        self.shared.deleted_self.load(Ordering::SeqCst)
    }

    pub fn root(&self) -> &Path {
        self.shared.source.root()
    }

    pub fn delay(&self) -> Duration {
        self.shared.queue.delay()
    }

    /// Events held in the delay window
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }
}

impl<S: WatchSource, C: Clock> Drop for EventBuffer<S, C> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
