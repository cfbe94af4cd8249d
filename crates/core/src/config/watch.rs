// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch settings loaded from TOML
//!
//! ```toml
//! delay = "500ms"
//! recursive = true
//! skip_repeats = true
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// How long events are held so both halves of a rename can meet
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Errors that can occur while loading a watch config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML syntax error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// How the daemon writes coalesced events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One JSON object per line on stdout
    #[default]
    Json,
    /// Tracing records only
    Log,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    #[serde(with = "humantime_serde")]
    pub delay: Duration,
    /// Watch subdirectories as well
    pub recursive: bool,
    /// Drop an event identical to the one just delivered
    pub skip_repeats: bool,
    pub format: OutputFormat,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            recursive: false,
            skip_repeats: true,
            format: OutputFormat::default(),
        }
    }
}

impl WatchConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded watch config");
        Ok(config)
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
