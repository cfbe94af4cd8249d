// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Downstream consumers of coalesced filesystem events

mod json;
mod log;

pub use json::{EventRecord, JsonLinesSink};
pub use log::LogSink;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeEventSink;

use async_trait::async_trait;
use thiserror::Error;
use tw_core::FsEvent;

/// Errors from event delivery
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("event rejected: {0}")]
    Rejected(String),
}

/// Adapter for delivering typed events downstream
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    async fn dispatch(&self, event: &FsEvent) -> Result<(), SinkError>;
}
