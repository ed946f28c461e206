//! Bounded store of rendered page surfaces.

use std::collections::{HashMap, VecDeque};

use super::preload::PageKey;

/// Smallest capacity that still holds a spread plus both neighbours.
const MIN_CAPACITY: usize = 6;

/// Rendered pages keyed by page and zoom, evicted oldest first.
#[derive(Debug)]
pub struct RenderedPageSet<S> {
    entries: HashMap<PageKey, S>,
    order: VecDeque<PageKey>,
    max_size: usize,
}

impl<S> Default for RenderedPageSet<S> {
    fn default() -> Self {
        Self::new(36)
    }
}

impl<S> RenderedPageSet<S> {
    /// Create a set holding at most `max_size` surfaces.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_size: max_size.max(MIN_CAPACITY),
        }
    }

    /// Insert a surface, returning keys evicted to make room.
    pub fn insert(&mut self, key: PageKey, surface: S) -> Vec<PageKey> {
        if self.entries.insert(key, surface).is_some() {
            return Vec::new();
        }
        self.order.push_back(key);

        let mut evicted = Vec::new();
        while self.entries.len() > self.max_size {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            evicted.push(oldest);
        }
        evicted
    }

    pub fn contains(&self, key: PageKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Whether `page` is rendered at `zoom`.
    pub fn has_page(&self, page: usize, zoom: usize) -> bool {
        self.contains(PageKey::new(page, zoom))
    }

    /// Key of `page` rendered at the zoom closest to `zoom`, exact match
    /// first, ties going to the smaller zoom.
    pub fn nearest_zoom(&self, page: usize, zoom: usize) -> Option<PageKey> {
        self.entries
            .keys()
            .filter(|key| key.page == page)
            .min_by_key(|key| (key.zoom.abs_diff(zoom), key.zoom))
            .copied()
    }

    pub fn get(&self, key: PageKey) -> Option<&S> {
        self.entries.get(&key)
    }

    pub fn get_mut(&mut self, key: PageKey) -> Option<&mut S> {
        self.entries.get_mut(&key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
