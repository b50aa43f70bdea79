//! Pager presentation for paginated listings.

use blogdesk_api_types::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// Zero-based page index.
    Page(u32),
    Gap,
}

const FULL_STRIP_LIMIT: u32 = 5;

/// "Showing 6 to 10 of 12", or "No posts" when the page holds nothing.
pub fn summary<T>(page: &Page<T>) -> String {
    if page.total_elements == 0 || page.content.is_empty() {
        return "No posts".to_string();
    }
    let size = u64::from(page.size.max(1));
    let number = u64::from(page.number);
    let first = number * size + 1;
    let last = ((number + 1) * size).min(page.total_elements);
    format!("Showing {first} to {last} of {}", page.total_elements)
}

/// Page numbers to render around `current`.
///
/// Short listings show every page. Longer ones keep the first and last
/// pages plus a window of one page either side of `current`, with a gap
/// marker wherever pages are skipped.
pub fn page_strip(current: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages <= FULL_STRIP_LIMIT {
        return (0..total_pages).map(PageItem::Page).collect();
    }

    let last = total_pages - 1;
    let start = current.saturating_sub(1).clamp(1, total_pages - 2);
    let end = current.saturating_add(1).clamp(1, total_pages - 2);

    let mut items = vec![PageItem::Page(0)];
    if start > 1 {
        items.push(PageItem::Gap);
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < last - 1 {
        items.push(PageItem::Gap);
    }
    items.push(PageItem::Page(last));
    items
}
