// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. pdf::PdfEngine)
    clippy::module_name_repetitions
)]

//! # Folio
//!
//! A terminal reader for the books of a school digital library.
//!
//! Folio shows a book's PDF as a two-page spread with:
//! - The cover alone, then facing pages
//! - A timed page-flip animation
//! - Neighbouring spreads rendered ahead in the background
//! - Stepped zoom and a fullscreen mode
//! - Page images via Kitty, Sixel, iTerm2 or half-block fallback
//!
//! ## Architecture
//!
//! Folio uses The Elm Architecture (TEA) pattern:
//! - **Model**: Reader state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main loop, reader state and input
//! - [`reader`]: Spreads, preloading, flip animation and zoom
//! - [`library`]: Book records and the library API client
//! - [`pdf`]: PDF engine and background render worker
//! - [`ui`]: Terminal UI components
//! - [`image`]: Terminal graphics for rendered pages
//! - [`config`]: Saved flag defaults
//! - [`perf`]: Timing and the render debug log

pub mod app;
pub mod config;
pub mod image;
pub mod library;
pub mod pdf;
pub mod perf;
pub mod reader;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model, ReaderTarget};
    pub use crate::library::{Book, LibraryClient, Session};
    pub use crate::reader::{Spread, ZoomController, compute_spread, total_spreads};
}
