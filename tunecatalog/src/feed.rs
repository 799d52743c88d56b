//! Lazily-triggered page feed ("fetch next page on demand").
//!
//! One `PageFeed` backs one scrollable collection view. The consumer calls
//! [`PageFeed::trigger`] whenever its loading sentinel becomes visible; the
//! feed debounces so that at most one fetch is in flight for the current
//! cursor, merges the incoming page into its accumulated state, and leaves
//! the cursor untouched on failure so the same page can be retried.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::merge::merge;
use crate::page::{CatalogPage, Continuation};

/// Incrementally accumulated page state for one collection view.
pub struct PageFeed<T> {
    state: Mutex<Option<CatalogPage<T>>>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path of a trigger, including
/// the trigger future being dropped mid-fetch (timeout, select).
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl<T> Default for PageFeed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PageFeed<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Discards the accumulated state (screen torn down / query changed).
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        *state = None;
    }

    /// Attempts to fetch and merge the next page.
    ///
    /// - `provider == None` (data source not ready yet) is a silent no-op.
    /// - A trigger while a fetch is outstanding is dropped, not queued.
    /// - A trigger on a fully paginated feed is a no-op.
    /// - `on_first_page` fires when the merge produced the very first items
    ///   of the feed; consumers use it to scroll their view back to the top.
    /// - A provider returning `Ok(None)` on the very first fetch installs
    ///   the explicit "tried and got nothing" marker page
    ///   (`items: None, continuation: None`).
    /// - Dropping the returned future mid-fetch releases the debounce, so
    ///   a cancelled trigger never blocks later ones.
    ///
    /// Returns `Ok(true)` when a fetch was actually issued and applied.
    pub async fn trigger<P, Fut, F>(&self, provider: Option<P>, on_first_page: F) -> Result<bool>
    where
        P: FnOnce(Option<Continuation>) -> Fut,
        Fut: Future<Output = anyhow::Result<Option<CatalogPage<T>>>>,
        F: FnOnce(),
    {
        let Some(provider) = provider else {
            return Ok(false);
        };

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("page fetch already in flight, dropping trigger");
            return Ok(false);
        }
        let _guard = InFlightGuard {
            flag: &self.in_flight,
        };

        let cursor = {
            let state = self.state.lock().await;
            if let Some(page) = &*state {
                if page.continuation.is_none() {
                    return Ok(false);
                }
            }
            state.as_ref().and_then(|p| p.continuation.clone())
        };

        let outcome = provider(cursor).await;

        let mut state = self.state.lock().await;
        match outcome {
            Err(e) => {
                // The cursor is untouched: a retry resumes from the same page.
                warn!(error = %e, "page fetch failed, cursor preserved for retry");
                Err(Error::Provider(e))
            }
            Ok(None) => {
                if state.is_none() {
                    *state = Some(CatalogPage::new(None, None));
                }
                Ok(true)
            }
            Ok(Some(incoming)) => {
                let was_first = state.as_ref().map_or(true, |p| !p.has_items());
                *state = Some(merge(state.take(), incoming));
                if was_first {
                    on_first_page();
                }
                Ok(true)
            }
        }
    }
}

impl<T: Clone> PageFeed<T> {
    /// Snapshot of the accumulated page, if any fetch completed yet.
    pub async fn page(&self) -> Option<CatalogPage<T>> {
        self.state.lock().await.clone()
    }
}
