// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: OS watch sources and event sinks

pub mod sink;
pub mod source;
pub mod traced;

pub use sink::{EventRecord, EventSink, JsonLinesSink, LogSink, SinkError};
pub use source::{NotifyWatchSource, SourceError, WatchSource};
pub use traced::{TracedEventSink, TracedWatchSource};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use sink::FakeEventSink;
#[cfg(any(test, feature = "test-support"))]
pub use source::{FakeWatchSource, SourceCall};
