//! Page-number pagination with first/last page fallback.

use std::num::IntErrorKind;

use serde::Serialize;

/// Posts shown on each page of the blog index.
pub const POSTS_PER_PAGE: u64 = 3;

/// Splits `total_items` into pages of `per_page` items.
///
/// An empty collection still has one (empty) page, so the first page is
/// always addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total_items: u64,
    per_page: u64,
}

impl Paginator {
    pub fn new(total_items: u64, per_page: u64) -> Self {
        Self {
            total_items,
            per_page: per_page.max(1),
        }
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn num_pages(&self) -> u64 {
        self.total_items.div_ceil(self.per_page).max(1)
    }

    /// Resolve a raw `page` query parameter to a page that exists.
    ///
    /// Missing or non-integer input yields page 1. Integers outside
    /// `1..=num_pages` (including ones too large to parse) yield the last page.
    pub fn resolve(&self, raw: Option<&str>) -> u64 {
        let Some(raw) = raw else {
            return 1;
        };
        match raw.trim().parse::<i64>() {
            Ok(n) if n >= 1 && n.unsigned_abs() <= self.num_pages() => n.unsigned_abs(),
            Ok(_) => self.num_pages(),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => self.num_pages(),
                _ => 1,
            },
        }
    }

    /// `(offset, limit)` of the given page number.
    pub fn bounds(&self, number: u64) -> (u64, u64) {
        let offset = number.saturating_sub(1) * self.per_page;
        (offset, self.per_page)
    }

    /// Wrap the items fetched for `number` into a [`Page`].
    pub fn page<T>(&self, number: u64, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number,
            total_pages: self.num_pages(),
            total_items: self.total_items,
        }
    }
}

/// One page of results plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_pages() {
        assert_eq!(Paginator::new(0, 3).num_pages(), 1);
        assert_eq!(Paginator::new(3, 3).num_pages(), 1);
        assert_eq!(Paginator::new(7, 3).num_pages(), 3);
        assert_eq!(Paginator::new(9, 3).num_pages(), 3);
    }

    #[test]
    fn test_resolve_fallbacks() {
        let paginator = Paginator::new(7, POSTS_PER_PAGE);

        assert_eq!(paginator.resolve(None), 1);
        assert_eq!(paginator.resolve(Some("2")), 2);
        assert_eq!(paginator.resolve(Some(" 3 ")), 3);
        assert_eq!(paginator.resolve(Some("abc")), 1);
        assert_eq!(paginator.resolve(Some("")), 1);
        assert_eq!(paginator.resolve(Some("2.0")), 1);
        assert_eq!(paginator.resolve(Some("999")), 3);
        assert_eq!(paginator.resolve(Some("0")), 3);
        assert_eq!(paginator.resolve(Some("-1")), 3);
        assert_eq!(paginator.resolve(Some("99999999999999999999999")), 3);
    }

    #[test]
    fn test_bounds() {
        let paginator = Paginator::new(7, 3);
        assert_eq!(paginator.bounds(1), (0, 3));
        assert_eq!(paginator.bounds(3), (6, 3));
    }

    #[test]
    fn test_page_navigation() {
        let paginator = Paginator::new(7, 3);

        let first = paginator.page(1, vec![1, 2, 3]);
        assert!(first.has_next());
        assert!(!first.has_previous());
        assert_eq!(first.next_page_number(), Some(2));

        let last = paginator.page(3, vec![7]);
        assert!(!last.has_next());
        assert!(last.has_previous());
        assert_eq!(last.previous_page_number(), Some(2));
        assert_eq!(last.map(|n| n * 10).items, vec![70]);
    }

    #[test]
    fn test_empty_collection_has_one_empty_page() {
        let paginator = Paginator::new(0, 3);
        let page = paginator.page::<u8>(paginator.resolve(Some("5")), Vec::new());
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }
}
