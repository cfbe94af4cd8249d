// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration modules

mod watch;

pub use watch::{ConfigError, OutputFormat, WatchConfig, DEFAULT_DELAY};
