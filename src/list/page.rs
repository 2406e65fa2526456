//! Page arithmetic. Pages are 1-based.

use std::ops::Range;

/// Number of pages needed for `count` records; zero for an empty set
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Index range of `page` within `count` records.
///
/// Pages past the end yield an empty range at `count`. Page 0 is treated
/// as page 1.
pub fn page_bounds(page: usize, page_size: usize, count: usize) -> Range<usize> {
    let start = page
        .max(1)
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(count);
    let end = start.saturating_add(page_size).min(count);
    start..end
}

/// Slice of records on `page`
pub fn paginate<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    &records[page_bounds(page, page_size, records.len())]
}

/// Clamp `page` into `[1, max(total_pages, 1)]`
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}
