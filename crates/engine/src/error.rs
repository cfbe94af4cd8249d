// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the event engine

use thiserror::Error;
use tw_adapters::SourceError;

/// Errors that can occur while buffering or emitting events
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to spawn buffer thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("watch source error: {0}")]
    Source(#[from] SourceError),
    #[error("buffer reader task failed: {0}")]
    Reader(#[from] tokio::task::JoinError),
}
