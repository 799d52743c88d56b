//! In-memory playback queue structure.
//!
//! This is the simplest possible queue representation:
//!   - a `Vec<PlayableItem>`
//!   - plus an optional `current_index`.
//!
//! All operations are pure structural mutations on in-memory data. The
//! queue never talks to the player engine and never starts playback;
//! transport control is handled by the
//! [`PlaybackController`](crate::PlaybackController), which owns exactly
//! one `Queue` behind a FIFO mutex (single-writer serialization).
//!
//! Invariant: `current_index` is `None` or a valid index into `items`.
//! Violations are asserted in debug builds and defensively clamped in
//! release builds, so a reader never observes a cursor past the end.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::item::PlayableItem;
use crate::snapshot::QueueSnapshot;

/// Effect of removing an item on the playback transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalEffect {
    /// A non-current item was removed; playback is unaffected.
    None,
    /// The current item was removed and the cursor now points at what
    /// used to be the next item; the transport should advance to it.
    AdvancedToNext,
    /// The current item was the tail; predecessors remain but there is
    /// nothing to advance to, so the transport should stop.
    PlaybackStopped,
    /// The queue is now empty.
    Emptied,
}

/// Ordered, mutable list of playable items plus a cursor.
#[derive(Clone, Debug, Default)]
pub struct Queue {
    items: Vec<PlayableItem>,
    current_index: Option<usize>,
}

impl Queue {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            current_index: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[PlayableItem] {
        &self.items
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current_item(&self) -> Option<&PlayableItem> {
        self.current_index.and_then(|i| self.items.get(i))
    }

    /// Items after the cursor (everything when there is no cursor).
    pub fn upcoming_len(&self) -> usize {
        match self.current_index {
            None => self.items.len(),
            Some(idx) => self.items.len().saturating_sub(idx + 1),
        }
    }

    /// Atomically replaces the whole queue, pointing the cursor at
    /// `index` (clamped into range, `None` when the new list is empty).
    pub fn replace(&mut self, items: Vec<PlayableItem>, index: usize) {
        self.items = items;
        self.current_index = if self.items.is_empty() {
            None
        } else {
            Some(index.min(self.items.len() - 1))
        };
        self.check_invariant();
    }

    /// Appends items at the end; the cursor is untouched.
    pub fn append(&mut self, items: Vec<PlayableItem>) {
        self.items.extend(items);
        self.check_invariant();
    }

    /// Inserts items at `index` (`index == len` appends). The cursor
    /// shifts right when the insertion lands at or before it, so the
    /// playing track keeps its identity.
    pub fn insert_at(&mut self, index: usize, items: Vec<PlayableItem>) -> Result<()> {
        let len = self.items.len();
        if index > len {
            return Err(Error::IndexOutOfBounds { index, len });
        }

        let count = items.len();
        self.items.splice(index..index, items);
        if let Some(current) = self.current_index {
            if index <= current {
                self.current_index = Some(current + count);
            }
        }
        self.check_invariant();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.current_index = None;
    }

    /// Drops the cursor while keeping the items (playback ran out).
    pub fn clear_cursor(&mut self) {
        self.current_index = None;
    }

    /// Points the cursor at `index`.
    pub fn set_index(&mut self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.current_index = Some(index);
        Ok(())
    }

    /// Reorders one item. When the cursor pointed at the moved item it
    /// follows it, so the "now playing" track keeps its identity across
    /// the reorder; otherwise the cursor shifts to keep pointing at the
    /// same item.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.items.len();
        if from >= len {
            return Err(Error::IndexOutOfBounds { index: from, len });
        }
        if to >= len {
            return Err(Error::IndexOutOfBounds { index: to, len });
        }
        if from == to {
            return Ok(());
        }

        let item = self.items.remove(from);
        self.items.insert(to, item);

        self.current_index = self.current_index.map(|current| {
            if current == from {
                to
            } else if from < current && current <= to {
                current - 1
            } else if to <= current && current < from {
                current + 1
            } else {
                current
            }
        });
        self.check_invariant();
        Ok(())
    }

    /// Removes the item at `index` and reports what the transport must do.
    pub fn remove_at(&mut self, index: usize) -> Result<RemovalEffect> {
        let len = self.items.len();
        if index >= len {
            return Err(Error::IndexOutOfBounds { index, len });
        }

        self.items.remove(index);

        let effect = match self.current_index {
            None => RemovalEffect::None,
            Some(current) if index < current => {
                self.current_index = Some(current - 1);
                RemovalEffect::None
            }
            Some(current) if index > current => RemovalEffect::None,
            // index == current
            Some(current) => {
                if self.items.is_empty() {
                    self.current_index = None;
                    RemovalEffect::Emptied
                } else if current < self.items.len() {
                    // Cursor now points at what used to be the next item.
                    RemovalEffect::AdvancedToNext
                } else {
                    self.current_index = Some(self.items.len() - 1);
                    RemovalEffect::PlaybackStopped
                }
            }
        };
        self.check_invariant();
        Ok(effect)
    }

    /// Shuffles the queue, keeping the currently-playing item first so
    /// playback does not jump. Without a cursor the whole list is
    /// shuffled.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        match self.current_index {
            None => self.items.shuffle(rng),
            Some(current) => {
                let playing = self.items.remove(current);
                self.items.shuffle(rng);
                self.items.insert(0, playing);
                self.current_index = Some(0);
            }
        }
        self.check_invariant();
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            items: self.items.clone(),
            current_index: self.current_index,
        }
    }

    pub fn restore(&mut self, snapshot: QueueSnapshot) {
        self.items = snapshot.items;
        self.current_index = snapshot.current_index.filter(|&i| i < self.items.len());
        self.check_invariant();
    }

    fn check_invariant(&mut self) {
        let valid = match self.current_index {
            None => true,
            Some(i) => i < self.items.len(),
        };
        debug_assert!(
            valid,
            "queue cursor {:?} out of range (len {})",
            self.current_index,
            self.items.len()
        );
        if !valid {
            // Release builds clamp instead of exposing an inconsistent cursor.
            self.current_index = if self.items.is_empty() {
                None
            } else {
                Some(self.items.len() - 1)
            };
        }
    }
}
