//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    50
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Index of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) as usize * self.limit()
    }

    /// Page size, never zero.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.per_page.max(1) as usize
    }

    /// Returns the slice of `items` that falls on this page.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = start.saturating_add(self.limit()).min(items.len());
        &items[start..end]
    }
}

/// Number of pages needed for `total` items; at least one.
#[must_use]
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    if total == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(per_page.max(1)));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One slot in a pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageSlot {
    /// A clickable page number.
    Page(u32),
    /// A gap between page numbers.
    Ellipsis,
}

/// Page numbers shown in a pagination control.
///
/// Up to 7 pages are shown in full. Beyond that the first and last page
/// are always present, with a window around the current page.
#[must_use]
pub fn visible_pages(current: u32, total: u32) -> Vec<PageSlot> {
    if total <= 7 {
        return (1..=total).map(PageSlot::Page).collect();
    }

    let mut slots = Vec::with_capacity(9);
    if current <= 4 {
        slots.extend((1..=5).map(PageSlot::Page));
        slots.push(PageSlot::Ellipsis);
        slots.push(PageSlot::Page(total));
    } else if current >= total - 3 {
        slots.push(PageSlot::Page(1));
        slots.push(PageSlot::Ellipsis);
        slots.extend((total - 4..=total).map(PageSlot::Page));
    } else {
        slots.push(PageSlot::Page(1));
        slots.push(PageSlot::Ellipsis);
        slots.extend((current - 1..=current + 1).map(PageSlot::Page));
        slots.push(PageSlot::Ellipsis);
        slots.push(PageSlot::Page(total));
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use super::PageSlot::{Ellipsis, Page};

    #[test]
    fn test_page_request_default() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 50);
    }

    #[test]
    fn test_page_request_offset() {
        let request = PageRequest { page: 2, per_page: 20 };
        assert_eq!(request.offset(), 20);

        let request = PageRequest { page: 0, per_page: 20 };
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_page_request_slice() {
        let items: Vec<u32> = (1..=25).collect();
        let request = PageRequest { page: 3, per_page: 10 };
        assert_eq!(request.slice(&items), &[21, 22, 23, 24, 25]);

        let request = PageRequest { page: 9, per_page: 10 };
        assert!(request.slice(&items).is_empty());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_visible_pages_small() {
        assert_eq!(visible_pages(1, 3), vec![Page(1), Page(2), Page(3)]);
    }

    #[test]
    fn test_visible_pages_windows() {
        assert_eq!(
            visible_pages(2, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)]
        );
        assert_eq!(
            visible_pages(9, 10),
            vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
        assert_eq!(
            visible_pages(6, 12),
            vec![Page(1), Ellipsis, Page(5), Page(6), Page(7), Ellipsis, Page(12)]
        );
    }

    proptest! {
        #[test]
        fn test_visible_pages_always_bounded(total in 1u32..500, offset in 0u32..500) {
            let current = offset % total + 1;
            let slots = visible_pages(current, total);

            prop_assert!(slots.len() <= 7);
            prop_assert!(slots.contains(&Page(current)));
            prop_assert_eq!(slots.first(), Some(&Page(1)));
            prop_assert_eq!(slots.last(), Some(&Page(total)));
        }
    }
}
