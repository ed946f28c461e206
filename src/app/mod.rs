//! Reader state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete reader state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, PageSurface, ReaderPhase, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::library::LibraryClient;

/// What the reader opens.
#[derive(Debug, Clone)]
pub enum ReaderTarget {
    /// A PDF file on disk.
    Local(PathBuf),
    /// A book record on the library server.
    Remote {
        client: LibraryClient,
        book_id: String,
    },
}

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    target: ReaderTarget,
    zoom_percent: Option<u16>,
    initial_page: Option<usize>,
    fullscreen: bool,
    images_enabled: bool,
    force_half_cell: bool,
    pdfium_lib: Option<PathBuf>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a reader for the given book.
    pub fn new(target: ReaderTarget) -> Self {
        Self {
            target,
            zoom_percent: None,
            initial_page: None,
            fullscreen: false,
            images_enabled: true,
            force_half_cell: false,
            pdfium_lib: None,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Start at this zoom percentage. Values off the zoom ladder are ignored.
    pub const fn with_zoom_percent(mut self, percent: Option<u16>) -> Self {
        self.zoom_percent = percent;
        self
    }

    /// Open on the spread containing this page.
    pub const fn with_initial_page(mut self, page: Option<usize>) -> Self {
        self.initial_page = page;
        self
    }

    /// Start in fullscreen.
    pub const fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    /// Enable or disable page images. Disabled pages draw as placeholders.
    pub const fn with_images_enabled(mut self, enabled: bool) -> Self {
        self.images_enabled = enabled;
        self
    }

    /// Skip terminal graphics detection and use half-block cells.
    pub const fn with_force_half_cell(mut self, force: bool) -> Self {
        self.force_half_cell = force;
        self
    }

    /// Directory holding the PDFium shared library.
    pub fn with_pdfium_lib(mut self, dir: Option<PathBuf>) -> Self {
        self.pdfium_lib = dir;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

#[cfg(test)]
mod tests;
