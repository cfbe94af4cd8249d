// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::event::PairedMove;
use yare::parameterized;

fn single(kind: RawEventKind) -> BufferedEvent {
    BufferedEvent::Single(RawEvent::new(kind, "/w/a.txt"))
}

#[parameterized(
    create = { RawEventKind::Create, "file:created" },
    unpaired_move_to = { RawEventKind::MovedTo, "file:created" },
    delete = { RawEventKind::Delete, "file:deleted" },
    delete_self = { RawEventKind::DeleteSelf, "file:deleted" },
    unpaired_move_from = { RawEventKind::MovedFrom, "file:deleted" },
    modify = { RawEventKind::Modify, "file:modified" },
    attrib = { RawEventKind::Attrib, "file:modified" },
    close_write = { RawEventKind::CloseWrite, "file:modified" },
)]
fn single_events_translate(kind: RawEventKind, expected: &str) {
    let event = FsEvent::from_buffered(&single(kind)).unwrap();
    assert_eq!(event.name(), expected);
    assert_eq!(event.path(), Path::new("/w/a.txt"));
}

#[test]
fn move_self_is_dropped() {
    assert_eq!(FsEvent::from_buffered(&single(RawEventKind::MoveSelf)), None);
}

#[test]
fn paired_move_becomes_moved() {
    let pair = BufferedEvent::Move(PairedMove {
        from: RawEvent::moved_from("/w/old", 7).directory(),
        to: RawEvent::moved_to("/w/new", 7).directory(),
    });

    let event = FsEvent::from_buffered(&pair).unwrap();
    assert_eq!(
        event,
        FsEvent::Moved {
            src: PathBuf::from("/w/old"),
            dest: PathBuf::from("/w/new"),
            is_directory: true,
        }
    );
    assert_eq!(event.name(), "dir:moved");
    assert_eq!(event.path(), Path::new("/w/old"));
}

#[test]
fn serializes_with_kind_tag() {
    let event = FsEvent::Created {
        path: PathBuf::from("/w/a"),
        is_directory: false,
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["kind"], "created");
    assert_eq!(json["path"], "/w/a");
}

#[test]
fn skip_repeats_drops_consecutive_duplicates_only() {
    let modified = FsEvent::Modified {
        path: PathBuf::from("/w/a"),
        is_directory: false,
    };
    let created = FsEvent::Created {
        path: PathBuf::from("/w/b"),
        is_directory: false,
    };
    let mut filter = SkipRepeats::new();

    assert!(filter.admit(&modified));
    assert!(!filter.admit(&modified));
    assert!(filter.admit(&created));
    assert!(filter.admit(&modified));
}
