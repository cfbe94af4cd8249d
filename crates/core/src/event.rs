// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw watch events and their buffered form

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// What the OS reported for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawEventKind {
    Create,
    Modify,
    Attrib,
    CloseWrite,
    Delete,
    /// The watched root itself was deleted
    DeleteSelf,
    /// First half of a rename; paired by cookie
    MovedFrom,
    /// Second half of a rename; paired by cookie
    MovedTo,
    MoveSelf,
}

/// A single notification from the OS watch, before any coalescing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawEvent {
    pub kind: RawEventKind,
    pub path: PathBuf,
    /// Shared by the two halves of a rename, zero otherwise
    #[serde(default)]
    pub cookie: u32,
    #[serde(default)]
    pub is_directory: bool,
}

impl RawEvent {
    pub fn new(kind: RawEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            cookie: 0,
            is_directory: false,
        }
    }

    pub fn moved_from(path: impl Into<PathBuf>, cookie: u32) -> Self {
        Self::new(RawEventKind::MovedFrom, path).with_cookie(cookie)
    }

    pub fn moved_to(path: impl Into<PathBuf>, cookie: u32) -> Self {
        Self::new(RawEventKind::MovedTo, path).with_cookie(cookie)
    }

    pub fn with_cookie(mut self, cookie: u32) -> Self {
        self.cookie = cookie;
        self
    }

    pub fn directory(mut self) -> Self {
        self.is_directory = true;
        self
    }

    pub fn is_moved_from(&self) -> bool {
        self.kind == RawEventKind::MovedFrom
    }

    pub fn is_moved_to(&self) -> bool {
        self.kind == RawEventKind::MovedTo
    }

    pub fn is_delete_self(&self) -> bool {
        self.kind == RawEventKind::DeleteSelf
    }

    /// True for a self-delete reported for exactly `root`
    pub fn deletes_root(&self, root: &Path) -> bool {
        self.is_delete_self() && self.path == root
    }
}

impl fmt::Display for RawEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.kind, self.path.display())?;
        if self.cookie != 0 {
            write!(f, " cookie={}", self.cookie)?;
        }
        if self.is_directory {
            write!(f, " (dir)")?;
        }
        Ok(())
    }
}

/// Both halves of a rename, matched by cookie within the delay window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedMove {
    pub from: RawEvent,
    pub to: RawEvent,
}

/// What the event buffer hands to its consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferedEvent {
    Single(RawEvent),
    Move(PairedMove),
}

impl BufferedEvent {
    /// True if this is an unpaired move-from carrying `cookie`
    pub fn is_move_from_with(&self, cookie: u32) -> bool {
        matches!(self, BufferedEvent::Single(raw) if raw.is_moved_from() && raw.cookie == cookie)
    }

    pub fn into_single(self) -> Option<RawEvent> {
        match self {
            BufferedEvent::Single(raw) => Some(raw),
            BufferedEvent::Move(_) => None,
        }
    }
}

impl From<RawEvent> for BufferedEvent {
    fn from(raw: RawEvent) -> Self {
        BufferedEvent::Single(raw)
    }
}

impl From<PairedMove> for BufferedEvent {
    fn from(pair: PairedMove) -> Self {
        BufferedEvent::Move(pair)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
