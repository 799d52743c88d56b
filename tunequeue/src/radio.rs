//! Radio session state: automatic queue continuation from a seed.
//!
//! At most one radio session is active per controller. Sessions are
//! identified by a monotonically increasing generation; starting a new
//! session or stopping radio bumps nothing in flight, it only changes
//! what the in-flight work compares against. In-flight fetches are never
//! hard-cancelled: a fetch completing under a stale generation discards
//! its result at the application point instead of mutating the queue.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;
use tunecatalog::{CatalogPage, Continuation};

use crate::item::{PlayableItem, SourceEndpoint};

/// Remote source of "related items" pages for radio.
///
/// Implementations call the remote catalog; the orchestrator only
/// requires this contract and stays agnostic to transport and auth.
#[async_trait]
pub trait RelatedSource: Send + Sync {
    /// Fetches the next page of items related to `seed`. `continuation`
    /// is `None` for the first page of a session.
    async fn related_page(
        &self,
        seed: &SourceEndpoint,
        continuation: Option<&Continuation>,
    ) -> anyhow::Result<CatalogPage<PlayableItem>>;
}

/// Shared radio-session flags, owned by the controller.
#[derive(Debug, Default)]
pub(crate) struct RadioState {
    generation: AtomicU64,
    active: AtomicBool,
    loading: AtomicBool,
    /// Woken on track advance so a paused session resumes fetching.
    pub(crate) refill: Notify,
}

impl RadioState {
    /// Starts a new session: bumps the generation, implicitly making any
    /// prior session stale, and returns the new generation.
    pub(crate) fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.active.store(true, Ordering::SeqCst);
        self.loading.store(true, Ordering::SeqCst);
        generation
    }

    /// Marks the session inactive. In-flight fetches are left to finish
    /// and discard themselves.
    pub(crate) fn stop(&self) -> u64 {
        self.active.store(false, Ordering::SeqCst);
        self.loading.store(false, Ordering::SeqCst);
        self.refill.notify_waiters();
        self.generation.load(Ordering::SeqCst)
    }

    /// `true` while `generation` identifies the single active session.
    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.active.load(Ordering::SeqCst)
            && self.generation.load(Ordering::SeqCst) == generation
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        self.loading.store(loading, Ordering::SeqCst);
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generations_are_monotonic_and_exclusive() {
        let state = RadioState::default();

        let first = state.begin();
        let second = state.begin();

        assert!(second > first);
        assert!(!state.is_current(first));
        assert!(state.is_current(second));
    }

    #[test]
    fn stop_invalidates_the_current_generation() {
        let state = RadioState::default();
        let generation = state.begin();

        state.stop();
        assert!(!state.is_current(generation));
        assert!(!state.is_active());
        assert!(!state.is_loading());
    }
}
