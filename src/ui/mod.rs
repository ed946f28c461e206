//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`render`]: frame layout and composition
//! - `spread`: page placement and the flip leaf
//! - `status`: header, footer and toasts

mod overlays;
mod render;
mod spread;
mod status;

pub use render::{ReaderLayout, reader_layout, render};
pub use spread::{PageSlot, SpreadSlots, curtain, flip_curtain, page_size, page_slots};
pub use status::truncate_to_width;

pub const HEADER_ROWS: u16 = 1;
pub const FOOTER_ROWS: u16 = 1;
/// Blank columns on each side of the spread pane.
pub const SPREAD_MARGIN: u16 = 1;

#[cfg(test)]
mod tests;
