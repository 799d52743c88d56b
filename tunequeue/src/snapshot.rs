//! Serializable queue snapshot for the external persistence collaborator.

use serde::{Deserialize, Serialize};

use crate::item::PlayableItem;

/// Logical snapshot of the playback queue.
///
/// This is the canonical view handed to observers and to the (external)
/// persistence store. It is independent of how the queue is actually kept
/// in memory; the core exposes a snapshot/restore pair but does not own
/// any storage format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// All items currently in the queue, in play order.
    pub items: Vec<PlayableItem>,
    /// Index (0-based) of the current item in `items`, or `None` if
    /// no item is currently selected.
    pub current_index: Option<usize>,
}

impl QueueSnapshot {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item the cursor points at, if any.
    pub fn current_item(&self) -> Option<&PlayableItem> {
        self.current_index.and_then(|i| self.items.get(i))
    }
}
