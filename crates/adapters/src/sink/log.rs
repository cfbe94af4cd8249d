// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event sink that only emits tracing records

use super::{EventSink, SinkError};
use async_trait::async_trait;
use tw_core::FsEvent;

/// Logs every event at `info`; used when stdout output is disabled
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventSink for LogSink {
    async fn dispatch(&self, event: &FsEvent) -> Result<(), SinkError> {
        match event {
            FsEvent::Moved { src, dest, .. } => tracing::info!(
                event = event.name(),
                src = %src.display(),
                dest = %dest.display(),
                "fs event"
            ),
            other => tracing::info!(
                event = other.name(),
                path = %other.path().display(),
                "fs event"
            ),
        }
        Ok(())
    }
}
