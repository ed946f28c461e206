//! Mapping from a linear page sequence to book spreads.
//!
//! Spread 0 is the cover and shows page 1 alone. Every later spread `s`
//! shows pages `2s` (left) and `2s + 1` (right); when the book ends on an
//! even page the last spread has an empty right slot.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpreadError {
    #[error("document has no pages")]
    EmptyDocument,
    #[error("spread {index} out of range (document has {total} spreads)")]
    OutOfRange { index: usize, total: usize },
}

/// Pages visible for one spread index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spread {
    pub index: usize,
    pub is_cover: bool,
    pub left_page: usize,
    /// Raw right page number, `0` on the cover. May exceed `page_count`.
    pub right_page: usize,
    pub total_spreads: usize,
    pub page_count: usize,
}

impl Spread {
    /// Right page if it exists in the document.
    pub const fn right_slot(&self) -> Option<usize> {
        if self.right_page == 0 || self.right_page > self.page_count {
            None
        } else {
            Some(self.right_page)
        }
    }

    /// Pages actually drawn, left first.
    pub fn visible_pages(&self) -> Vec<usize> {
        let mut pages = vec![self.left_page];
        pages.extend(self.right_slot());
        pages
    }

    pub const fn is_last(&self) -> bool {
        self.index + 1 == self.total_spreads
    }
}

/// Number of spreads for a document: the cover plus one per page pair.
pub const fn total_spreads(page_count: usize) -> usize {
    if page_count == 0 {
        0
    } else {
        1 + (page_count - 1).div_ceil(2)
    }
}

/// Compute the visible pages for `spread_index`.
///
/// # Errors
///
/// Returns [`SpreadError::EmptyDocument`] when the document has no pages and
/// [`SpreadError::OutOfRange`] when the index is past the last spread.
pub const fn compute_spread(page_count: usize, spread_index: usize) -> Result<Spread, SpreadError> {
    if page_count == 0 {
        return Err(SpreadError::EmptyDocument);
    }
    let total = total_spreads(page_count);
    if spread_index >= total {
        return Err(SpreadError::OutOfRange {
            index: spread_index,
            total,
        });
    }
    if spread_index == 0 {
        return Ok(Spread {
            index: 0,
            is_cover: true,
            left_page: 1,
            right_page: 0,
            total_spreads: total,
            page_count,
        });
    }
    let left_page = (spread_index - 1) * 2 + 2;
    Ok(Spread {
        index: spread_index,
        is_cover: false,
        left_page,
        right_page: left_page + 1,
        total_spreads: total,
        page_count,
    })
}

/// Spread index that shows `page`, clamped to the document.
pub fn spread_for_page(page: usize, page_count: usize) -> usize {
    let total = total_spreads(page_count);
    if total == 0 || page <= 1 {
        return 0;
    }
    (page / 2).min(total - 1)
}

/// Footer label for a spread, e.g. `Páginas 2 - 3 de 48`.
pub fn page_label(spread: &Spread) -> String {
    let total = spread.page_count;
    if spread.is_cover {
        return format!("Capa (Página 1) de {total}");
    }
    match spread.right_slot() {
        Some(right) => format!("Páginas {} - {right} de {total}", spread.left_page),
        None => format!("Página {} de {total}", spread.left_page),
    }
}
