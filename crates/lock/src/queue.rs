// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thread-safe FIFO queue with pooled nodes
//!
//! Auxiliary utility, independent of the lock protocol. Nodes live in an
//! arena and are recycled through an index-based free list under a single
//! mutex, so steady-state push/pop does no allocation.

use std::sync::Mutex;

/// Pool usage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Slots ever added to the arena
    pub allocated: u64,
    /// Pushes served from the free list
    pub reused: u64,
    /// Slots returned to the free list
    pub recycled: u64,
}

struct Slot<T> {
    value: Option<T>,
    next: Option<usize>,
}

struct Inner<T> {
    slots: Vec<Slot<T>>,
    head: Option<usize>,
    tail: Option<usize>,
    free: Option<usize>,
    len: usize,
    stats: PoolStats,
}

impl<T> Inner<T> {
    fn take_free_slot(&mut self) -> usize {
        match self.free {
            Some(idx) => {
                self.free = self.slots[idx].next;
                self.stats.reused += 1;
                idx
            }
            None => {
                self.slots.push(Slot {
                    value: None,
                    next: None,
                });
                self.stats.allocated += 1;
                self.slots.len() - 1
            }
        }
    }

    fn recycle_slot(&mut self, idx: usize) {
        self.slots[idx].value = None;
        self.slots[idx].next = self.free;
        self.free = Some(idx);
        self.stats.recycled += 1;
    }
}

/// A FIFO queue whose nodes are pooled in an arena
pub struct PooledQueue<T> {
    inner: Mutex<Inner<T>>,
}

impl<T> PooledQueue<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a queue with `capacity` slots pre-allocated on the free list.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut inner = Inner {
            slots: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free: None,
            len: 0,
            stats: PoolStats::default(),
        };
        for idx in 0..capacity {
            let free = inner.free;
            inner.slots.push(Slot {
                value: None,
                next: free,
            });
            inner.free = Some(idx);
            inner.stats.allocated += 1;
        }
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Append a value at the tail.
    pub fn push(&self, value: T) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let idx = inner.take_free_slot();
        inner.slots[idx].value = Some(value);
        inner.slots[idx].next = None;
        match inner.tail {
            Some(tail) => inner.slots[tail].next = Some(idx),
            None => inner.head = Some(idx),
        }
        inner.tail = Some(idx);
        inner.len += 1;
    }

    /// Remove and return the value at the head, if any.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let head = inner.head?;
        let value = inner.slots[head].value.take();
        inner.head = inner.slots[head].next;
        if inner.head.is_none() {
            inner.tail = None;
        }
        inner.recycle_slot(head);
        inner.len -= 1;
        value
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of pool usage counters.
    pub fn stats(&self) -> PoolStats {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.stats
    }
}

impl<T> Default for PooledQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
