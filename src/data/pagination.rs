//! Page arithmetic and the page-number button window.

/// Maximum number of page-number buttons shown at once.
pub const PAGE_WINDOW: usize = 5;

/// Number of pages needed for `count` rows (`ceil(count / page_size)`).
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Clamp a 1-based page number into `[1, total_pages]`.
///
/// With zero pages the only valid page is 1.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Index range of the rows on a 1-based page, bounded by `count`.
pub fn page_bounds(page: usize, page_size: usize, count: usize) -> std::ops::Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(count);
    let end = start.saturating_add(page_size).min(count);
    start..end
}

/// Page numbers to render as buttons around the current page.
///
/// All pages when there are at most five; otherwise `1..=5` near the start,
/// the last five near the end, and `current-2..=current+2` in between.
pub fn page_window(current: usize, total: usize) -> Vec<usize> {
    if total <= PAGE_WINDOW {
        return (1..=total).collect();
    }
    let start = if current <= 3 {
        1
    } else if current >= total - 2 {
        total - PAGE_WINDOW + 1
    } else {
        current - 2
    };
    (start..start + PAGE_WINDOW).collect()
}
