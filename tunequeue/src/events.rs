//! Queue event stream for UI observers.

use std::time::SystemTime;

use crate::item::SourceEndpoint;

/// Type d'évènement émis par le contrôleur de lecture.
#[derive(Clone, Debug)]
pub enum QueueEvent {
    /// The whole queue was replaced (forced play).
    QueueReplaced { len: usize, index: usize },
    /// Items were appended without interrupting playback.
    Enqueued { count: usize },
    /// Items were inserted mid-queue without interrupting playback.
    Inserted { index: usize, count: usize },
    ItemMoved { from: usize, to: usize },
    ItemRemoved { index: usize },
    Shuffled,
    Cleared,
    /// The cursor moved (user seek or natural track transition).
    IndexChanged { index: Option<usize> },
    /// A radio session started fetching related items.
    RadioStarted {
        generation: u64,
        seed: SourceEndpoint,
    },
    RadioStopped { generation: u64 },
    /// The radio session appended a page of related items.
    RadioAppended { count: usize },
    SleepTimerSet,
    SleepTimerCancelled,
    /// The sleep timer fired and playback was stopped.
    SleepTimerFired,
    PlaybackStopped,
}

/// Evènement enrichi pour diffusion (timestamp).
#[derive(Clone, Debug)]
pub struct QueueEventEnvelope {
    pub event: QueueEvent,
    pub timestamp: SystemTime,
}

impl QueueEventEnvelope {
    pub(crate) fn now(event: QueueEvent) -> Self {
        Self {
            event,
            timestamp: SystemTime::now(),
        }
    }
}
