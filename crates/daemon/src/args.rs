// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments for twd

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tw_core::{ConfigError, OutputFormat, WatchConfig};

#[derive(Debug, Parser)]
#[command(
    name = "twd",
    version,
    about = "Watch a directory and stream coalesced filesystem events"
)]
pub struct Args {
    /// Directory to watch
    pub path: PathBuf,

    /// TOML file with watch settings; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// How long events are held for rename pairing (e.g. "500ms", "2s")
    #[arg(long, value_parser = humantime::parse_duration)]
    pub delay: Option<Duration>,

    /// Watch subdirectories as well
    #[arg(long)]
    pub recursive: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Deliver consecutive identical events instead of collapsing them
    #[arg(long)]
    pub keep_repeats: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Log,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Log => OutputFormat::Log,
        }
    }
}

impl Args {
    /// Settings from `--config` (or defaults) with flags applied on top
    pub fn watch_config(&self) -> Result<WatchConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => WatchConfig::load(path)?,
            None => WatchConfig::default(),
        };
        if let Some(delay) = self.delay {
            config.delay = delay;
        }
        if self.recursive {
            config.recursive = true;
        }
        if let Some(format) = self.format {
            config.format = format.into();
        }
        if self.keep_repeats {
            config.skip_repeats = false;
        }
        Ok(config)
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
