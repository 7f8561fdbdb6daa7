//! Deadline-ordered queue of deferred work.
//!
//! Entries are released by [`Timeline::drain_due`] in `(due, insertion)`
//! order, so two entries scheduled for the same instant come out in the order
//! they were scheduled. The host sleeps until [`Timeline::next_due`] and then
//! drains; nothing here owns a timer.

use std::collections::BTreeMap;

use crate::types::TimestampMs;

#[derive(Debug, Clone)]
pub struct Timeline<T> {
    entries: BTreeMap<(TimestampMs, u64), T>,
    next_seq: u64,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `item` to become due at `due_ms`.
    pub fn schedule(&mut self, due_ms: TimestampMs, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((due_ms, seq), item);
    }

    /// Earliest pending deadline
    pub fn next_due(&self) -> Option<TimestampMs> {
        self.entries.keys().next().map(|(due, _)| *due)
    }

    /// Remove and return every entry with `due <= now_ms`, earliest first.
    pub fn drain_due(&mut self, now_ms: TimestampMs) -> Vec<(TimestampMs, T)> {
        let due = match now_ms.checked_add(1) {
            Some(bound) => {
                let pending = self.entries.split_off(&(bound, 0));
                std::mem::replace(&mut self.entries, pending)
            }
            None => std::mem::take(&mut self.entries),
        };
        due.into_iter().map(|((at, _), item)| (at, item)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TimestampMs, &T)> {
        self.entries.iter().map(|((at, _), item)| (*at, item))
    }
}
