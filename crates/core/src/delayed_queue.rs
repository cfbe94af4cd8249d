// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue that holds each element back for a fixed delay
//!
//! Elements are released in insertion order, each no earlier than `delay`
//! after it was put. While an element is held it can still be pulled out of
//! turn with [`DelayedQueue::remove`]; the event buffer uses this to find the
//! first half of a rename when the second half arrives.
//!
//! `remove` is a linear scan under the queue lock, so it costs O(n) in the
//! number of held entries.

use crate::clock::{Clock, SystemClock};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

struct Entry<T> {
    payload: T,
    inserted_at: Instant,
}

struct Inner<T> {
    entries: VecDeque<Entry<T>>,
    closed: bool,
    /// Close as soon as the last held entry leaves
    draining: bool,
}

impl<T> Inner<T> {
    /// Returns true if this call closed the queue
    fn close_if_drained(&mut self) -> bool {
        if self.draining && !self.closed && self.entries.is_empty() {
            self.closed = true;
            return true;
        }
        false
    }
}

/// Thread-safe FIFO with a per-entry hold-back window
pub struct DelayedQueue<T, C: Clock = SystemClock> {
    delay: Duration,
    clock: C,
    inner: Mutex<Inner<T>>,
    not_empty: Condvar,
}

impl<T> DelayedQueue<T> {
    pub fn new(delay: Duration) -> Self {
        Self::with_clock(delay, SystemClock)
    }
}

impl<T, C: Clock> DelayedQueue<T, C> {
    pub fn with_clock(delay: Duration, clock: C) -> Self {
        Self {
            delay,
            clock,
            inner: Mutex::new(Inner {
                entries: VecDeque::new(),
                closed: false,
                draining: false,
            }),
            not_empty: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Append an element, stamped with the current time
    pub fn put(&self, payload: T) {
        let inserted_at = self.clock.now();
        self.lock().entries.push_back(Entry {
            payload,
            inserted_at,
        });
        self.not_empty.notify_one();
    }

    /// Block until the head element is due and return it.
    ///
    /// Returns `None` once the queue is closed, whether or not entries remain.
    /// The head is re-read after every wake-up, since `remove` may have taken
    /// it while this call was waiting.
    pub fn get(&self) -> Option<T> {
        let mut inner = self.lock();
        loop {
            if inner.closed {
                return None;
            }

            let Some(head) = inner.entries.front() else {
                inner = self
                    .not_empty
                    .wait(inner)
                    .unwrap_or_else(|e| e.into_inner());
                continue;
            };

            let remaining = self.clock.until(head.inserted_at + self.delay);
            if remaining.is_zero() {
                let payload = inner.entries.pop_front().map(|entry| entry.payload);
                self.settle(&mut inner);
                return payload;
            }

            inner = self
                .not_empty
                .wait_timeout(inner, remaining)
                .unwrap_or_else(|e| e.into_inner())
                .0;
        }
    }

    /// Return the head element if it is already due, without blocking
    pub fn try_get(&self) -> Option<T> {
        let mut inner = self.lock();
        if inner.closed {
            return None;
        }
        let head = inner.entries.front()?;
        if !self.clock.until(head.inserted_at + self.delay).is_zero() {
            return None;
        }
        let payload = inner.entries.pop_front().map(|entry| entry.payload);
        self.settle(&mut inner);
        payload
    }

    /// Remove and return the first element matching `predicate`, ignoring
    /// both its position and its delay
    pub fn remove<F>(&self, mut predicate: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut inner = self.lock();
        let index = inner
            .entries
            .iter()
            .position(|entry| predicate(&entry.payload))?;
        let payload = inner.entries.remove(index).map(|entry| entry.payload);
        self.settle(&mut inner);
        payload
    }

    /// Close the queue and wake every blocked `get`. Idempotent.
    pub fn close(&self) {
        let mut inner = self.lock();
        if !inner.closed {
            inner.closed = true;
            tracing::trace!(held = inner.entries.len(), "delayed queue closed");
        }
        drop(inner);
        self.not_empty.notify_all();
    }

    /// Let held entries drain on their normal schedule, then close.
    ///
    /// `get` keeps releasing what is already held and returns `None` once the
    /// queue is empty. Idempotent.
    pub fn close_when_drained(&self) {
        let mut inner = self.lock();
        inner.draining = true;
        self.settle(&mut inner);
    }

    /// Runs after an entry leaves. `put` wakes a single waiter, so another
    /// consumer may still sit in an untimed wait while entries remain.
    fn settle(&self, inner: &mut MutexGuard<'_, Inner<T>>) {
        if inner.close_if_drained() {
            tracing::trace!("delayed queue drained and closed");
            self.not_empty.notify_all();
        } else if !inner.entries.is_empty() {
            self.not_empty.notify_one();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of held entries, due or not
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}

#[cfg(test)]
#[path = "delayed_queue_tests.rs"]
mod tests;
