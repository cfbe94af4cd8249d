// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OS watch source backed by the `notify` crate (inotify on Linux)

use super::{SourceError, WatchSource};
use notify::event::{AccessKind, AccessMode, CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Mutex;
use tw_core::{RawEvent, RawEventKind};

/// Receiving end of the backend channel
struct Inbox {
    rx: Receiver<notify::Result<Event>>,
    /// Backend error seen after part of a batch was already translated
    deferred: Option<notify::Error>,
}

/// Watches one root path through the platform's native notification API
pub struct NotifyWatchSource {
    root: PathBuf,
    watcher: Mutex<Option<RecommendedWatcher>>,
    inbox: Mutex<Inbox>,
    closed: AtomicBool,
}

impl NotifyWatchSource {
    /// Start watching `root`. The root is canonicalized so reported paths
    /// compare equal to it.
    pub fn new(root: impl AsRef<Path>, recursive: bool) -> Result<Self, SourceError> {
        let root = root.as_ref();
        let root = root
            .canonicalize()
            .map_err(|_| SourceError::RootNotFound(root.to_path_buf()))?;

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        let mode = if recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(&root, mode)?;

        Ok(Self::from_parts(root, Some(watcher), rx))
    }

    /// The watcher owns the only sender; once it is dropped, a blocked
    /// `recv` ends with a disconnect.
    fn from_parts(
        root: PathBuf,
        watcher: Option<RecommendedWatcher>,
        rx: Receiver<notify::Result<Event>>,
    ) -> Self {
        Self {
            root,
            watcher: Mutex::new(watcher),
            inbox: Mutex::new(Inbox { rx, deferred: None }),
            closed: AtomicBool::new(false),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl WatchSource for NotifyWatchSource {
    fn root(&self) -> &Path {
        &self.root
    }

    fn read_events(&self) -> Result<Vec<RawEvent>, SourceError> {
        let mut inbox = self.inbox.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(e) = inbox.deferred.take() {
            return Err(e.into());
        }

        loop {
            if self.is_closed() {
                return Err(SourceError::Closed);
            }

            let Ok(first) = inbox.rx.recv() else {
                return Err(SourceError::Closed);
            };
            let mut batch = translate(first?, &self.root);
            while let Ok(next) = inbox.rx.try_recv() {
                match next {
                    Ok(event) => batch.extend(translate(event, &self.root)),
                    // Deliver what was already read; the error surfaces next call
                    Err(e) if !batch.is_empty() => {
                        inbox.deferred = Some(e);
                        break;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            if !batch.is_empty() {
                return Ok(batch);
            }
        }
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        // Dropping the watcher stops the backend thread and its sender
        let watcher = self
            .watcher
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        drop(watcher);
    }
}

/// Map one notify event onto zero or more raw events.
///
/// inotify delivers both halves of a rename individually and then a combined
/// `RenameMode::Both` notice; the combined notice is redundant here since the
/// event buffer does its own pairing.
pub(crate) fn translate(event: Event, root: &Path) -> Vec<RawEvent> {
    let cookie = event
        .tracker()
        .and_then(|t| u32::try_from(t).ok())
        .unwrap_or(0);

    let kind = match event.kind {
        EventKind::Create(CreateKind::Folder) => Some((RawEventKind::Create, Some(true))),
        EventKind::Create(_) => Some((RawEventKind::Create, None)),
        // The old path is gone and notify does not say whether it was a
        // directory, so an unpaired move-from always reads as a file. Paired
        // moves take the flag from the move-to half.
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            Some((RawEventKind::MovedFrom, Some(false)))
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some((RawEventKind::MovedTo, None)),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => None,
        EventKind::Modify(ModifyKind::Name(_)) => Some((RawEventKind::MoveSelf, None)),
        EventKind::Modify(ModifyKind::Metadata(_)) => Some((RawEventKind::Attrib, None)),
        EventKind::Modify(_) => Some((RawEventKind::Modify, None)),
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => {
            Some((RawEventKind::CloseWrite, Some(false)))
        }
        EventKind::Remove(RemoveKind::Folder) => Some((RawEventKind::Delete, Some(true))),
        EventKind::Remove(_) => Some((RawEventKind::Delete, Some(false))),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    };
    let Some((kind, is_directory)) = kind else {
        return Vec::new();
    };

    event
        .paths
        .into_iter()
        .map(|path| {
            let kind = match kind {
                RawEventKind::Delete if path == root => RawEventKind::DeleteSelf,
                RawEventKind::MoveSelf if path != root => RawEventKind::Modify,
                other => other,
            };
            let is_directory = is_directory.unwrap_or_else(|| path.is_dir()) || path == root;
            RawEvent {
                kind,
                path,
                cookie,
                is_directory,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "native_tests.rs"]
mod tests;
