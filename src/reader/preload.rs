//! Render planning for the current spread and its neighbours.

use std::collections::HashSet;

use super::spread::Spread;

/// A page rendered at one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageKey {
    pub page: usize,
    /// Index into the zoom level table.
    pub zoom: usize,
}

impl PageKey {
    pub const fn new(page: usize, zoom: usize) -> Self {
        Self { page, zoom }
    }
}

/// Pages to render for a spread, highest priority first.
///
/// Current pages come first, then the next spread's two pages, then the
/// previous spread's two pages. Out-of-document pages and duplicates are
/// dropped.
pub fn pages_to_render(left_page: usize, right_page: usize, page_count: usize) -> Vec<usize> {
    let last_visible = left_page.max(right_page);
    let candidates = [
        Some(left_page),
        Some(right_page),
        last_visible.checked_add(1),
        last_visible.checked_add(2),
        left_page.checked_sub(2),
        left_page.checked_sub(1),
    ];

    let mut pages = Vec::with_capacity(candidates.len());
    for page in candidates.into_iter().flatten() {
        if (1..=page_count).contains(&page) && !pages.contains(&page) {
            pages.push(page);
        }
    }
    pages
}

/// Whether every page a spread shows has finished rendering.
pub fn spread_ready(
    left_page: usize,
    right_page: usize,
    page_count: usize,
    is_rendered: impl Fn(usize) -> bool,
) -> bool {
    is_rendered(left_page) && (right_page == 0 || right_page > page_count || is_rendered(right_page))
}

/// Tracks outstanding and failed render requests for one document.
///
/// Requests are fire-and-forget: leaving a spread does not cancel them, and
/// a page that failed once is not asked for again.
#[derive(Debug, Default)]
pub struct PreloadScheduler {
    in_flight: HashSet<PageKey>,
    failed: HashSet<PageKey>,
}

impl PreloadScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys to request now for `spread` at `zoom`, marked in flight.
    pub fn plan(
        &mut self,
        spread: &Spread,
        zoom: usize,
        is_rendered: impl Fn(PageKey) -> bool,
    ) -> Vec<PageKey> {
        let mut requests = Vec::new();
        for page in pages_to_render(spread.left_page, spread.right_page, spread.page_count) {
            let key = PageKey::new(page, zoom);
            if is_rendered(key) || self.in_flight.contains(&key) || self.failed.contains(&key) {
                continue;
            }
            self.in_flight.insert(key);
            requests.push(key);
        }
        requests
    }

    /// Record a finished render.
    pub fn complete(&mut self, key: PageKey) {
        self.in_flight.remove(&key);
    }

    /// Record a failed render; the key is never planned again.
    pub fn fail(&mut self, key: PageKey) {
        self.in_flight.remove(&key);
        self.failed.insert(key);
    }

    pub fn is_in_flight(&self, key: PageKey) -> bool {
        self.in_flight.contains(&key)
    }

    pub fn is_failed(&self, key: PageKey) -> bool {
        self.failed.contains(&key)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Forget everything, for a newly loaded document.
    pub fn reset(&mut self) {
        self.in_flight.clear();
        self.failed.clear();
    }
}
