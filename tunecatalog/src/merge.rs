//! Pure page-merging primitive.

use crate::page::CatalogPage;

/// Merges an already-accumulated page with a newly fetched one.
///
/// - With no existing page, the incoming page is the result unchanged.
/// - Otherwise items are appended in order (first page first) and the
///   incoming continuation is adopted, even when it is `None`: a `None`
///   cursor correctly terminates pagination.
/// - An `items == None` side contributes nothing but does not poison the
///   other side's items.
///
/// No item-level dedup happens here. Dedup is a stop policy of the
/// fetch loop, not of the merge primitive; merge is total and pure.
pub fn merge<T>(existing: Option<CatalogPage<T>>, incoming: CatalogPage<T>) -> CatalogPage<T> {
    let Some(existing) = existing else {
        return incoming;
    };

    let items = match (existing.items, incoming.items) {
        (None, incoming_items) => incoming_items,
        (existing_items, None) => existing_items,
        (Some(mut acc), Some(new)) => {
            acc.extend(new);
            Some(acc)
        }
    };

    CatalogPage {
        items,
        continuation: incoming.continuation,
    }
}

impl<T> CatalogPage<T> {
    /// Method form of [`merge`], consuming `self` as the existing page.
    pub fn merged(self, incoming: CatalogPage<T>) -> CatalogPage<T> {
        merge(Some(self), incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Continuation;

    fn page(items: &[u32], continuation: Option<&str>) -> CatalogPage<u32> {
        CatalogPage::new(
            Some(items.to_vec()),
            continuation.map(Continuation::new),
        )
    }

    #[test]
    fn merge_without_existing_returns_incoming() {
        let incoming = page(&[1, 2], Some("c1"));
        let merged = merge(None, incoming.clone());
        assert_eq!(merged, incoming);
    }

    #[test]
    fn merge_appends_in_order_and_adopts_new_cursor() {
        let merged = merge(Some(page(&[1, 2], Some("c1"))), page(&[3], Some("c2")));
        assert_eq!(merged.items, Some(vec![1, 2, 3]));
        assert_eq!(merged.continuation, Some(Continuation::new("c2")));
    }

    #[test]
    fn merge_adopts_null_cursor_to_terminate() {
        let merged = merge(Some(page(&[1], Some("c1"))), page(&[2], None));
        assert!(merged.is_exhausted());
    }

    #[test]
    fn merge_preserves_unfetched_marker_distinction() {
        // Unfetched existing side takes the incoming items wholesale.
        let merged = merge(
            Some(CatalogPage::new(None, Some(Continuation::new("c0")))),
            page(&[7], None),
        );
        assert_eq!(merged.items, Some(vec![7]));

        // Unfetched incoming side keeps the accumulated items.
        let merged: CatalogPage<u32> = merge(
            Some(page(&[7], Some("c1"))),
            CatalogPage::new(None, None),
        );
        assert_eq!(merged.items, Some(vec![7]));
        assert!(merged.is_exhausted());
    }

    #[test]
    fn merge_performs_no_dedup() {
        let merged = merge(Some(page(&[1, 2], Some("c1"))), page(&[2, 3], None));
        assert_eq!(merged.items, Some(vec![1, 2, 2, 3]));
    }

    #[test]
    fn merge_item_sequence_is_associative() {
        let a = page(&[1, 2], Some("ca"));
        let b = page(&[3], Some("cb"));
        let c = page(&[4, 5], None);

        let left = merge(Some(merge(Some(a.clone()), b.clone())), c.clone());
        let right = merge(Some(a), merge(Some(b), c));

        assert_eq!(left.items, right.items);
        assert_eq!(left.continuation, right.continuation);
    }
}
