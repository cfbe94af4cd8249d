// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use fs2::FileExt;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};
use tw_adapters::{NotifyWatchSource, TracedWatchSource};
use tw_core::{ConfigError, WatchConfig};
use tw_engine::{EngineError, EventBuffer};

/// Buffer over the platform watcher, wrapped with tracing
pub type WatchBuffer = EventBuffer<TracedWatchSource<NotifyWatchSource>>;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Canonical directory being watched
    pub watch_root: PathBuf,
    /// Per-root state directory
    pub state_dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
}

impl Config {
    /// Create config for a watch root under the default state directory
    pub fn for_root(watch_root: &Path) -> Result<Self, LifecycleError> {
        Self::with_state_home(watch_root, &state_home()?)
    }

    /// Create config with an explicit state home (used by tests)
    pub fn with_state_home(watch_root: &Path, state_home: &Path) -> Result<Self, LifecycleError> {
        let canonical = watch_root
            .canonicalize()
            .map_err(|e| LifecycleError::RootNotFound(watch_root.to_path_buf(), e))?;
        let state_dir = state_home.join("watches").join(root_hash(&canonical));

        Ok(Self {
            watch_root: canonical,
            lock_path: state_dir.join("twd.pid"),
            log_path: state_dir.join("twd.log"),
            state_dir,
        })
    }
}

/// Daemon state during operation
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Event buffer shared with the emitter
    pub buffer: Arc<WatchBuffer>,
    /// When daemon started
    pub start_time: Instant,
}

impl DaemonState {
    /// Stop watching and release the state directory. Idempotent.
    pub fn shutdown(&mut self) {
        info!("Shutting down daemon...");

        // 1. Stop the reader; a blocked read_event returns None
        self.buffer.close();

        // 2. Remove PID file
        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // 3. Lock is released when self.lock_file is dropped

        info!(
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Daemon shutdown complete"
        );
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Watch root not found at {0}: {1}")]
    RootNotFound(PathBuf, std::io::Error),

    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already watching this directory?")]
    LockFailed(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Watch error: {0}")]
    Engine(#[from] EngineError),
}

/// Start the daemon
pub fn startup(config: &Config, watch: &WatchConfig) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config, watch) {
        Ok(state) => Ok(state),
        // The PID file belongs to the daemon holding the lock
        Err(e @ LifecycleError::LockFailed(_)) => Err(e),
        Err(e) => {
            cleanup_on_failure(config);
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
fn startup_inner(config: &Config, watch: &WatchConfig) -> Result<DaemonState, LifecycleError> {
    // 1. Create state directory
    std::fs::create_dir_all(&config.state_dir)?;

    // 2. Acquire lock file FIRST - one daemon per watch root
    let mut lock_file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    // 3. Start watching (LAST - only after the lock is held)
    let buffer = EventBuffer::watch(&config.watch_root, watch)?;

    info!(
        root = %config.watch_root.display(),
        delay_ms = watch.delay.as_millis() as u64,
        recursive = watch.recursive,
        "Daemon started"
    );

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        buffer: Arc::new(buffer),
        start_time: Instant::now(),
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

/// Get the state home for twd
fn state_home() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("TW_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }

    // Use XDG_STATE_HOME or default to ~/.local/state
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("tracklab-watch"));
    }

    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/tracklab-watch"))
}

/// Compute root hash for a unique state directory
fn root_hash(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    let result = hasher.finalize();
    // Take first 16 chars of hex digest
    hex_encode(&result[..8])
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
