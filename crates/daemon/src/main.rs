// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch Daemon (twd)
//!
//! Watches one directory and streams coalesced filesystem events until it is
//! signalled or the directory itself goes away.

use std::sync::Arc;

use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;
use tracing::{error, info};

use tw_adapters::{EventSink, JsonLinesSink, LogSink, TracedEventSink};
use tw_core::OutputFormat;
use tw_daemon::lifecycle::WatchBuffer;
use tw_daemon::{startup, Args, Config, LifecycleError};
use tw_engine::{Emitter, EmitterStats, EngineError};

type EmitterTask = JoinHandle<Result<EmitterStats, EngineError>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration
    let watch = args.watch_config()?;
    let config = Config::for_root(&args.path)?;

    // Write startup marker to log (before tracing setup, so it precedes this run's records)
    write_startup_marker(&config)?;

    // Set up logging
    let log_guard = setup_logging(&config)?;

    info!("Starting twd for: {}", config.watch_root.display());

    let mut daemon = match startup(&config, &watch) {
        Ok(d) => d,
        Err(e) => {
            // Write error synchronously (tracing is non-blocking and may not flush in time)
            write_startup_error(&config, &e);
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!("Daemon ready, watching {}", config.watch_root.display());

    // Signal ready for parent process
    println!("READY");

    let buffer = Arc::clone(&daemon.buffer);
    let mut emitter = match watch.format {
        OutputFormat::Json => spawn_emitter(buffer, JsonLinesSink::stdout(), watch.skip_repeats),
        OutputFormat::Log => spawn_emitter(buffer, LogSink::new(), watch.skip_repeats),
    };

    let finished = tokio::select! {
        // Stream ended on its own (watch root deleted or source failed)
        result = &mut emitter => Some(result),

        // Graceful shutdown on SIGTERM
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down...");
            None
        }

        // Graceful shutdown on SIGINT
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down...");
            None
        }
    };

    daemon.shutdown();

    let result = match finished {
        Some(result) => result,
        None => emitter.await,
    };
    match result {
        Ok(Ok(stats)) => info!(
            dispatched = stats.dispatched,
            failed = stats.failed,
            "Event stream closed"
        ),
        Ok(Err(e)) => error!("Emitter failed: {}", e),
        Err(e) => error!("Emitter task failed: {}", e),
    }

    info!("Daemon stopped");
    Ok(())
}

fn spawn_emitter<K: EventSink>(buffer: Arc<WatchBuffer>, sink: K, skip_repeats: bool) -> EmitterTask {
    let emitter = Emitter::new(buffer, TracedEventSink::new(sink)).skip_repeats(skip_repeats);
    tokio::spawn(emitter.run())
}

/// Startup marker prefix written to log before anything else.
/// Full format: "--- twd: starting (pid: 12345) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- twd: starting (pid: ";

/// Write startup marker to log file (appends to existing log)
fn write_startup_marker(config: &Config) -> Result<(), LifecycleError> {
    use std::io::Write;

    // Create log directory if needed
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Append marker to log file with PID
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    writeln!(file, "{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id())?;

    Ok(())
}

/// Write startup error synchronously to log file.
fn write_startup_error(config: &Config, error: &LifecycleError) {
    use std::io::Write;

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
    else {
        return;
    };
    let _ = writeln!(file, "ERROR Failed to start daemon: {}", error);
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Set up file appender
    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or(LifecycleError::NoStateDir)?,
        config
            .log_path
            .file_name()
            .ok_or(LifecycleError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Set up subscriber with env filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Ok(guard)
}
