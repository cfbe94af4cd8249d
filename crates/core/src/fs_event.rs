// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed filesystem events delivered to sinks
//!
//! A [`BufferedEvent`] still speaks the OS vocabulary (move-from, close-write,
//! ...). Consumers only care whether something was created, deleted, modified
//! or moved, so buffered events are translated before dispatch:
//!
//! | buffered                   | typed      |
//! |----------------------------|------------|
//! | paired move                | `Moved`    |
//! | unpaired move-to           | `Created`  |
//! | unpaired move-from         | `Deleted`  |
//! | create                     | `Created`  |
//! | modify, attrib, close-write| `Modified` |
//! | delete, delete-self        | `Deleted`  |
//! | move-self                  | (dropped)  |
//!
//! An unpaired move-from is always reported as a file: the watch backend
//! cannot tell whether a path that has already left was a directory.

use crate::event::{BufferedEvent, RawEvent, RawEventKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FsEvent {
    Created {
        path: PathBuf,
        is_directory: bool,
    },
    Deleted {
        path: PathBuf,
        is_directory: bool,
    },
    Modified {
        path: PathBuf,
        is_directory: bool,
    },
    Moved {
        src: PathBuf,
        dest: PathBuf,
        is_directory: bool,
    },
}

impl FsEvent {
    /// Translate a buffered event, or `None` if consumers never see it
    pub fn from_buffered(event: &BufferedEvent) -> Option<Self> {
        match event {
            BufferedEvent::Move(pair) => Some(FsEvent::Moved {
                src: pair.from.path.clone(),
                dest: pair.to.path.clone(),
                is_directory: pair.to.is_directory,
            }),
            BufferedEvent::Single(raw) => Self::from_raw(raw),
        }
    }

    fn from_raw(raw: &RawEvent) -> Option<Self> {
        let path = raw.path.clone();
        let is_directory = raw.is_directory;
        match raw.kind {
            RawEventKind::Create | RawEventKind::MovedTo => Some(FsEvent::Created {
                path,
                is_directory,
            }),
            RawEventKind::Delete | RawEventKind::DeleteSelf | RawEventKind::MovedFrom => {
                Some(FsEvent::Deleted {
                    path,
                    is_directory,
                })
            }
            RawEventKind::Modify | RawEventKind::Attrib | RawEventKind::CloseWrite => {
                Some(FsEvent::Modified {
                    path,
                    is_directory,
                })
            }
            RawEventKind::MoveSelf => None,
        }
    }

    /// Event name in `file:created` / `dir:moved` form
    pub fn name(&self) -> &'static str {
        match (self, self.is_directory()) {
            (FsEvent::Created { .. }, false) => "file:created",
            (FsEvent::Created { .. }, true) => "dir:created",
            (FsEvent::Deleted { .. }, false) => "file:deleted",
            (FsEvent::Deleted { .. }, true) => "dir:deleted",
            (FsEvent::Modified { .. }, false) => "file:modified",
            (FsEvent::Modified { .. }, true) => "dir:modified",
            (FsEvent::Moved { .. }, false) => "file:moved",
            (FsEvent::Moved { .. }, true) => "dir:moved",
        }
    }

    /// The path the event is about; for moves, the source
    pub fn path(&self) -> &Path {
        match self {
            FsEvent::Created { path, .. }
            | FsEvent::Deleted { path, .. }
            | FsEvent::Modified { path, .. } => path,
            FsEvent::Moved { src, .. } => src,
        }
    }

    pub fn is_directory(&self) -> bool {
        match self {
            FsEvent::Created { is_directory, .. }
            | FsEvent::Deleted { is_directory, .. }
            | FsEvent::Modified { is_directory, .. }
            | FsEvent::Moved { is_directory, .. } => *is_directory,
        }
    }
}

/// Drops an event identical to the one admitted just before it.
///
/// A single write typically yields modify followed by close-write, which
/// translate to the same `Modified` event.
#[derive(Debug, Default)]
pub struct SkipRepeats {
    last: Option<FsEvent>,
}

impl SkipRepeats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `event` repeats the previously admitted event
    pub fn admit(&mut self, event: &FsEvent) -> bool {
        if self.last.as_ref() == Some(event) {
            return false;
        }
        self.last = Some(event.clone());
        true
    }
}

#[cfg(test)]
#[path = "fs_event_tests.rs"]
mod tests;
