//! Page windows for list tables.

use serde::Serialize;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Page links to show around `current_page`; `None` marks a gap.
///
/// Shows `edge` pages at either end and `around` pages on each side of the
/// current one.
fn page_window(
    total_pages: usize,
    current_page: usize,
    edge: usize,
    around: usize,
) -> Vec<Option<usize>> {
    if total_pages == 0 {
        return Vec::new();
    }

    let mut pages = Vec::new();
    let mut last_shown = 0;

    for page in 1..=total_pages {
        let near_edge = page <= edge || page > total_pages.saturating_sub(edge);
        let near_current =
            page + around >= current_page && page <= current_page.saturating_add(around);
        if !(near_edge || near_current) {
            continue;
        }
        if page > last_shown + 1 {
            pages.push(None);
        }
        pages.push(Some(page));
        last_shown = page;
    }

    pages
}

/// One page of rows plus what the template needs to draw the pager.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    /// Number of matching rows across all pages.
    pub total: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total: usize, per_page: usize) -> Self {
        let current_page = current_page.max(1);
        let total_pages = total.div_ceil(per_page.max(1));

        Self {
            items,
            pages: page_window(total_pages, current_page, 2, 2),
            page: current_page,
            total,
        }
    }
}
