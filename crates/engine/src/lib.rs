// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Rename-pairing event buffer and the emitter that drains it

mod buffer;
mod emitter;
mod error;

pub use buffer::{BufferState, EventBuffer};
pub use emitter::{Emitter, EmitterStats};
pub use error::EngineError;
