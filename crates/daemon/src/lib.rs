// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Watch daemon (twd) internals: arguments and lifecycle

pub mod args;
pub mod lifecycle;

pub use args::Args;
pub use lifecycle::{startup, Config, DaemonState, LifecycleError};
