//! Core data model for paged catalog responses.

use serde::{Deserialize, Serialize};

/// Opaque pagination cursor returned by a remote catalog service.
///
/// The engine never interprets the token; it only hands it back to the
/// provider to request the next page. A page whose continuation is `None`
/// is the last page of its collection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Continuation(String);

impl Continuation {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Continuation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Item carrying a stable identity within a paged collection.
///
/// Two items with the same key are the same logical entry; the
/// dedup-stop policy of [`fetch_all`](crate::fetch_all) relies on it.
pub trait PagedItem {
    /// Stable key identifying the item across pages.
    fn key(&self) -> &str;
}

/// One page of a paged catalog collection.
///
/// `items == None` means the page was never successfully loaded, which is
/// distinct from `items == Some(vec![])` ("loaded, zero results"). Both
/// states must be preserved through merges so consumers can tell an
/// unfetched tab from an empty one.
///
/// Pages are treated as immutable values once returned from a merge:
/// consumers clone and rebuild, they never mutate in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage<T> {
    /// Items of the page, in server order. `None` = never fetched.
    pub items: Option<Vec<T>>,
    /// Cursor of the next page, or `None` when pagination is complete.
    pub continuation: Option<Continuation>,
}

impl<T> CatalogPage<T> {
    pub fn new(items: Option<Vec<T>>, continuation: Option<Continuation>) -> Self {
        Self {
            items,
            continuation,
        }
    }

    /// A loaded page with zero results and no further pages.
    pub fn empty() -> Self {
        Self {
            items: Some(Vec::new()),
            continuation: None,
        }
    }

    /// Number of items currently held (0 when never fetched).
    pub fn item_count(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    /// Returns `true` if the page holds at least one item.
    pub fn has_items(&self) -> bool {
        self.item_count() > 0
    }

    /// Returns `true` if no further pages exist.
    pub fn is_exhausted(&self) -> bool {
        self.continuation.is_none()
    }
}
