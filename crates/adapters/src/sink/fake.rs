// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake event sink for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{EventSink, SinkError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tw_core::FsEvent;

/// Fake event sink that records deliveries
#[derive(Clone, Default)]
pub struct FakeEventSink {
    events: Arc<Mutex<Vec<FsEvent>>>,
    reject: Arc<Mutex<Option<String>>>,
}

impl FakeEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all delivered events
    pub fn events(&self) -> Vec<FsEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make every subsequent dispatch fail with `reason`
    pub fn reject_with(&self, reason: impl Into<String>) {
        *self.reject.lock().unwrap_or_else(|e| e.into_inner()) = Some(reason.into());
    }
}

#[async_trait]
impl EventSink for FakeEventSink {
    async fn dispatch(&self, event: &FsEvent) -> Result<(), SinkError> {
        if let Some(reason) = self.reject.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            return Err(SinkError::Rejected(reason));
        }
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
