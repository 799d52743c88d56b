//! Eager continuation-fetch driver ("flatten the whole collection").
//!
//! Given an already-fetched seed page and a provider callback, the driver
//! repeatedly fetches the next page and appends its items until the
//! collection is exhausted, a depth bound is hit, the server starts
//! repeating itself, or the provider fails. Whatever the stop reason, the
//! accumulated items are returned; a mid-loop failure never discards what
//! was already fetched.

use std::collections::HashSet;
use std::future::Future;

use tracing::{debug, warn};

use crate::error::Error;
use crate::page::{CatalogPage, Continuation, PagedItem};

/// Tuning knobs for [`fetch_all`].
#[derive(Clone, Copy, Debug)]
pub struct FetchAllOptions {
    /// Maximum number of provider calls issued by the loop.
    pub max_depth: usize,
    /// When enabled, stop once an incoming page only repeats already
    /// accumulated items (guards against a server returning a repeating
    /// tail forever).
    pub dedup_stop: bool,
}

impl FetchAllOptions {
    pub fn new(max_depth: usize, dedup_stop: bool) -> Self {
        Self {
            max_depth,
            dedup_stop,
        }
    }
}

impl Default for FetchAllOptions {
    fn default() -> Self {
        Self {
            max_depth: usize::MAX,
            dedup_stop: false,
        }
    }
}

/// Why the fetch loop terminated.
///
/// The flattened page always carries `continuation = None`; callers that
/// need to distinguish "fully paginated" from "capped early" inspect this
/// reason instead of guessing from the page alone.
#[derive(Debug)]
pub enum StopReason {
    /// The last page carried no continuation: the collection is complete.
    Exhausted,
    /// The depth bound was reached while a continuation was still pending.
    DepthCapped,
    /// A page arrived with absent or empty items.
    EmptyPage,
    /// Dedup-stop fired: the incoming page only repeated known items.
    DuplicateTail,
    /// The provider failed. The accumulated items up to that point are
    /// still returned as a best-effort partial result.
    Provider(Error),
}

impl StopReason {
    /// `true` when pagination genuinely ran to the end of the collection.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, StopReason::Exhausted | StopReason::EmptyPage)
    }
}

/// Result of [`fetch_all`]: the flattened page plus how and why the loop
/// stopped.
#[derive(Debug)]
pub struct Flattened<T> {
    /// All accumulated items, with `continuation = None`.
    pub page: CatalogPage<T>,
    /// Number of provider calls issued (the seed page is not counted).
    pub pages_fetched: usize,
    /// Termination cause.
    pub stop: StopReason,
}

impl<T> Flattened<T> {
    /// `true` unless the loop was cut short by the depth bound or an error.
    pub fn is_complete(&self) -> bool {
        self.stop.is_exhausted() || matches!(self.stop, StopReason::DuplicateTail)
    }

    /// The provider error, when the loop stopped on one.
    pub fn provider_error(&self) -> Option<&Error> {
        match &self.stop {
            StopReason::Provider(e) => Some(e),
            _ => None,
        }
    }
}

/// Flattens a paged collection by following continuations from `seed`.
///
/// The provider receives the cursor of the page to fetch and returns the
/// page or an error. Provider failures and empty pages stop the loop but
/// are not fatal: the accumulated items are returned with the stop reason
/// recording what happened (a retry can then decide what to do).
///
/// # Example
///
/// ```no_run
/// use tunecatalog::{fetch_all, CatalogPage, FetchAllOptions};
/// # #[derive(Clone)] struct Track { id: String }
/// # impl tunecatalog::PagedItem for Track { fn key(&self) -> &str { &self.id } }
/// # async fn fetch_page(c: tunecatalog::Continuation) -> anyhow::Result<CatalogPage<Track>> { unimplemented!() }
/// # async fn demo(seed: CatalogPage<Track>) {
/// let flattened = fetch_all(seed, fetch_page, FetchAllOptions::default()).await;
/// if !flattened.is_complete() {
///     // capped or failed: flattened.page still holds the partial result
/// }
/// # }
/// ```
pub async fn fetch_all<T, P, Fut>(
    seed: CatalogPage<T>,
    mut provider: P,
    options: FetchAllOptions,
) -> Flattened<T>
where
    T: PagedItem,
    P: FnMut(Continuation) -> Fut,
    Fut: Future<Output = anyhow::Result<CatalogPage<T>>>,
{
    let mut items = seed.items.unwrap_or_default();
    let mut cursor = seed.continuation;
    let mut depth = 0usize;

    let stop = loop {
        let Some(current) = cursor.take() else {
            break StopReason::Exhausted;
        };

        if depth >= options.max_depth {
            debug!(depth, "continuation fetch capped by depth bound");
            break StopReason::DepthCapped;
        }

        depth += 1;
        let incoming = match provider(current).await {
            Ok(page) => page,
            Err(e) => {
                warn!(depth, error = %e, "page provider failed, keeping partial result");
                break StopReason::Provider(Error::Provider(e));
            }
        };

        let Some(new_items) = incoming.items.filter(|v| !v.is_empty()) else {
            break StopReason::EmptyPage;
        };

        if options.dedup_stop {
            let known: HashSet<&str> = items.iter().map(PagedItem::key).collect();
            if new_items.iter().all(|item| known.contains(item.key())) {
                debug!(depth, "incoming page only repeats known items, stopping");
                break StopReason::DuplicateTail;
            }
        }

        items.extend(new_items);
        cursor = incoming.continuation;
    };

    Flattened {
        page: CatalogPage::new(Some(items), None),
        pages_fetched: depth,
        stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Clone, Debug, PartialEq)]
    struct Entry(&'static str);

    impl PagedItem for Entry {
        fn key(&self) -> &str {
            self.0
        }
    }

    fn page(ids: &[&'static str], continuation: Option<&str>) -> CatalogPage<Entry> {
        CatalogPage::new(
            Some(ids.iter().map(|id| Entry(id)).collect()),
            continuation.map(Continuation::new),
        )
    }

    /// Provider serving a scripted sequence of responses.
    fn scripted(
        responses: Vec<anyhow::Result<CatalogPage<Entry>>>,
    ) -> impl FnMut(Continuation) -> std::future::Ready<anyhow::Result<CatalogPage<Entry>>> {
        let responses = RefCell::new(responses);
        move |_cursor| {
            let next = responses.borrow_mut().remove(0);
            std::future::ready(next)
        }
    }

    fn keys(flattened: &Flattened<Entry>) -> Vec<&str> {
        flattened
            .page
            .items
            .as_ref()
            .unwrap()
            .iter()
            .map(|e| e.0)
            .collect()
    }

    #[tokio::test]
    async fn seed_without_continuation_is_already_complete() {
        let flattened = fetch_all(
            page(&["a"], None),
            scripted(vec![]),
            FetchAllOptions::default(),
        )
        .await;

        assert_eq!(keys(&flattened), vec!["a"]);
        assert_eq!(flattened.pages_fetched, 0);
        assert!(matches!(flattened.stop, StopReason::Exhausted));
    }

    #[tokio::test]
    async fn duplicates_are_retained_when_dedup_is_off() {
        // Documented contract: no dedup by default, duplicate "b" stays.
        let flattened = fetch_all(
            CatalogPage::new(Some(Vec::new()), Some(Continuation::new("c1"))),
            scripted(vec![
                Ok(page(&["a", "b"], Some("c2"))),
                Ok(page(&["b", "c"], None)),
            ]),
            FetchAllOptions::new(5, false),
        )
        .await;

        assert_eq!(keys(&flattened), vec!["a", "b", "b", "c"]);
        assert!(flattened.page.is_exhausted());
        assert_eq!(flattened.pages_fetched, 2);
        assert!(matches!(flattened.stop, StopReason::Exhausted));
    }

    #[tokio::test]
    async fn depth_bound_limits_provider_calls() {
        let calls = RefCell::new(0usize);
        let provider = |_cursor: Continuation| {
            *calls.borrow_mut() += 1;
            std::future::ready(Ok(page(&["x"], Some("again"))))
        };

        let flattened = fetch_all(
            page(&[], Some("c1")),
            provider,
            FetchAllOptions::new(3, false),
        )
        .await;

        assert_eq!(*calls.borrow(), 3);
        assert_eq!(flattened.pages_fetched, 3);
        assert!(matches!(flattened.stop, StopReason::DepthCapped));
        // The page itself still reads as complete for render-only callers.
        assert!(flattened.page.is_exhausted());
        assert!(!flattened.is_complete());
    }

    #[tokio::test]
    async fn dedup_stop_halts_on_repeating_tail() {
        let flattened = fetch_all(
            page(&["a", "b"], Some("c1")),
            scripted(vec![
                Ok(page(&["c"], Some("c2"))),
                // Pure subset of what is already accumulated.
                Ok(page(&["b", "a"], Some("c3"))),
            ]),
            FetchAllOptions::new(10, true),
        )
        .await;

        assert_eq!(keys(&flattened), vec!["a", "b", "c"]);
        assert!(matches!(flattened.stop, StopReason::DuplicateTail));
        assert!(flattened.is_complete());
    }

    #[tokio::test]
    async fn dedup_stop_appends_partially_novel_pages() {
        let flattened = fetch_all(
            page(&["a"], Some("c1")),
            scripted(vec![Ok(page(&["a", "b"], None))]),
            FetchAllOptions::new(10, true),
        )
        .await;

        // "a" repeats but "b" is new, so the page is appended as-is.
        assert_eq!(keys(&flattened), vec!["a", "a", "b"]);
        assert!(matches!(flattened.stop, StopReason::Exhausted));
    }

    #[tokio::test]
    async fn provider_failure_preserves_partial_result() {
        let flattened = fetch_all(
            page(&["a"], Some("c1")),
            scripted(vec![
                Ok(page(&["b"], Some("c2"))),
                Err(anyhow::anyhow!("network down")),
            ]),
            FetchAllOptions::default(),
        )
        .await;

        assert_eq!(keys(&flattened), vec!["a", "b"]);
        assert!(flattened.provider_error().is_some());
        assert!(!flattened.is_complete());
    }

    #[tokio::test]
    async fn empty_page_terminates_the_loop() {
        let flattened = fetch_all(
            page(&["a"], Some("c1")),
            scripted(vec![Ok(CatalogPage::new(None, Some(Continuation::new("c2"))))]),
            FetchAllOptions::default(),
        )
        .await;

        assert_eq!(keys(&flattened), vec!["a"]);
        assert!(matches!(flattened.stop, StopReason::EmptyPage));
        assert!(flattened.is_complete());
    }
}
