// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Emitter: pumps buffered events into a sink
//!
//! Reading from the buffer blocks a thread, so each read runs on tokio's
//! blocking pool. The emitter finishes when the buffer stops producing.

use crate::buffer::EventBuffer;
use crate::error::EngineError;
use std::sync::Arc;
use tw_adapters::{EventSink, WatchSource};
use tw_core::{Clock, FsEvent, SkipRepeats, SystemClock};

/// Counters reported when the emitter finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitterStats {
    /// Buffered events read, paired moves counting once
    pub received: u64,
    pub dispatched: u64,
    /// Dropped as untranslatable or as a repeat
    pub skipped: u64,
    /// Rejected by the sink
    pub failed: u64,
}

pub struct Emitter<S: WatchSource, K: EventSink, C: Clock = SystemClock> {
    buffer: Arc<EventBuffer<S, C>>,
    sink: K,
    repeats: Option<SkipRepeats>,
}

impl<S: WatchSource, K: EventSink, C: Clock> Emitter<S, K, C> {
    pub fn new(buffer: Arc<EventBuffer<S, C>>, sink: K) -> Self {
        Self {
            buffer,
            sink,
            repeats: Some(SkipRepeats::new()),
        }
    }

    /// Whether consecutive identical events collapse into one (default on)
    pub fn skip_repeats(mut self, enabled: bool) -> Self {
        self.repeats = enabled.then(SkipRepeats::new);
        self
    }

    /// Forward events until the buffer is closed or drained after a stop
    pub async fn run(mut self) -> Result<EmitterStats, EngineError> {
        let mut stats = EmitterStats::default();

        loop {
            let buffer = Arc::clone(&self.buffer);
            let Some(buffered) = tokio::task::spawn_blocking(move || buffer.read_event()).await?
            else {
                break;
            };
            stats.received += 1;

            let Some(event) = FsEvent::from_buffered(&buffered) else {
                stats.skipped += 1;
                continue;
            };
            if let Some(repeats) = self.repeats.as_mut() {
                if !repeats.admit(&event) {
                    tracing::trace!(event = event.name(), path = %event.path().display(), "skipped repeat");
                    stats.skipped += 1;
                    continue;
                }
            }

            match self.sink.dispatch(&event).await {
                Ok(()) => stats.dispatched += 1,
                Err(e) => {
                    tracing::warn!(event = event.name(), error = %e, "failed to deliver event");
                    stats.failed += 1;
                }
            }
        }

        tracing::info!(
            root = %self.buffer.root().display(),
            received = stats.received,
            dispatched = stats.dispatched,
            skipped = stats.skipped,
            failed = stats.failed,
            deleted_self = self.buffer.deleted_self(),
            "emitter finished"
        );
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "emitter_tests.rs"]
mod tests;
