// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tw-core: Core library for tracklab-watch
//!
//! This crate provides:
//! - A delayed, order-preserving queue with predicate-based removal
//! - Raw, buffered and typed filesystem event types
//! - A clock abstraction for testable delay windows
//! - TOML watch configuration

pub mod clock;
pub mod config;
pub mod delayed_queue;
pub mod event;
pub mod fs_event;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, OutputFormat, WatchConfig, DEFAULT_DELAY};
pub use delayed_queue::DelayedQueue;
pub use event::{BufferedEvent, PairedMove, RawEvent, RawEventKind};
pub use fs_event::{FsEvent, SkipRepeats};
