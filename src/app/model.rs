use std::path::PathBuf;

use image::DynamicImage;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

use crate::library::Book;
use crate::pdf::RenderError;
use crate::reader::{
    FlipAnimator, PageKey, PreloadScheduler, RenderedPageSet, Spread, ZoomController,
    compute_spread, page_label, spread_ready, total_spreads,
};

/// How long a toast stays on the status bar.
const TOAST_MS: u64 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at_ms: u64,
}

/// Where the reader is in opening its book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderPhase {
    /// Waiting for the book record.
    LoadingBook,
    /// Book known; PDF is downloading or being opened.
    LoadingDocument,
    /// The book has no PDF attached.
    NoPdf,
    /// Opening failed; the message is shown until the reader leaves.
    Failed(String),
    /// Document open and spreads can be shown.
    Ready,
}

/// A finished page render.
pub struct PageSurface {
    pub width_px: u32,
    pub height_px: u32,
    /// `None` when images are disabled; the page draws as a placeholder.
    pub protocol: Option<StatefulProtocol>,
}

impl std::fmt::Debug for PageSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSurface")
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("has_protocol", &self.protocol.is_some())
            .finish()
    }
}

/// The complete reader state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    pub phase: ReaderPhase,
    pub book: Option<Book>,
    pub page_count: usize,
    /// Spread currently shown. During a flip this switches to the target at
    /// the end of the leaving phase.
    pub spread_index: usize,
    pub flip: FlipAnimator,
    pub zoom: ZoomController,
    pub rendered: RenderedPageSet<PageSurface>,
    pub(super) scheduler: PreloadScheduler,
    /// Page to open at once the document loads
    pub initial_page: Option<usize>,
    /// Image picker for terminal rendering
    pub picker: Option<Picker>,
    pub fullscreen: bool,
    pub help_visible: bool,
    /// Milliseconds since the reader started, advanced by `Tick`
    pub clock_ms: u64,
    pub terminal_size: (u16, u16),
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    toast: Option<Toast>,
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("phase", &self.phase)
            .field("page_count", &self.page_count)
            .field("spread_index", &self.spread_index)
            .field("zoom", &self.zoom.index())
            .field("fullscreen", &self.fullscreen)
            .finish_non_exhaustive()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new((80, 24))
    }
}

impl Model {
    pub fn new(terminal_size: (u16, u16)) -> Self {
        Self {
            phase: ReaderPhase::LoadingBook,
            book: None,
            page_count: 0,
            spread_index: 0,
            flip: FlipAnimator::default(),
            zoom: ZoomController::default(),
            rendered: RenderedPageSet::default(),
            scheduler: PreloadScheduler::new(),
            initial_page: None,
            picker: None,
            fullscreen: false,
            help_visible: false,
            clock_ms: 0,
            terminal_size,
            config_global_path: None,
            config_local_path: None,
            toast: None,
            should_quit: false,
        }
    }

    /// Set the image picker.
    #[must_use]
    pub fn with_picker(mut self, picker: Option<Picker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn is_ready(&self) -> bool {
        self.phase == ReaderPhase::Ready
    }

    pub const fn total_spreads(&self) -> usize {
        total_spreads(self.page_count)
    }

    /// Spread being shown, once a document is open.
    pub fn current_spread(&self) -> Option<Spread> {
        if !self.is_ready() {
            return None;
        }
        compute_spread(self.page_count, self.spread_index).ok()
    }

    /// Footer label such as `Páginas 2 - 3 de 48`.
    pub fn page_label(&self) -> Option<String> {
        self.current_spread().as_ref().map(page_label)
    }

    pub fn is_page_rendered(&self, page: usize) -> bool {
        self.rendered.has_page(page, self.zoom.index())
    }

    /// Whether every page of the current spread is rendered at the current
    /// zoom. False while nothing is open.
    pub fn is_spread_ready(&self) -> bool {
        self.current_spread().is_some_and(|spread| {
            spread_ready(
                spread.left_page,
                spread.right_page,
                spread.page_count,
                |page| self.is_page_rendered(page),
            )
        })
    }

    /// New render requests for the current spread and its neighbours, with
    /// the scale each should be rendered at.
    pub fn plan_renders(&mut self) -> Vec<(PageKey, f32)> {
        let Some(spread) = self.current_spread() else {
            return Vec::new();
        };
        let zoom = self.zoom.index();
        let rendered = &self.rendered;
        let keys = self
            .scheduler
            .plan(&spread, zoom, |key| rendered.contains(key));
        let levels = self.zoom.levels();
        keys.into_iter()
            .filter_map(|key| levels.get(key.zoom).map(|scale| (key, *scale)))
            .collect()
    }

    /// Record a finished render, building its terminal protocol.
    pub fn accept_rendered_page(&mut self, key: PageKey, image: DynamicImage) {
        self.scheduler.complete(key);
        let surface = PageSurface {
            width_px: image.width(),
            height_px: image.height(),
            protocol: self
                .picker
                .as_ref()
                .map(|picker| crate::image::page_protocol(picker, image)),
        };
        let evicted = self.rendered.insert(key, surface);
        crate::perf::log_event(
            "render.complete",
            format!(
                "page={} zoom={} cached={} evicted={}",
                key.page,
                key.zoom,
                self.rendered.len(),
                evicted.len()
            ),
        );
    }

    /// Record a failed render. The page stays not-ready for the session.
    pub fn reject_page(&mut self, key: PageKey, error: &RenderError) {
        self.scheduler.fail(key);
        crate::perf::log_event(
            "render.failed",
            format!("page={} zoom={} err={error}", key.page, key.zoom),
        );
        self.show_toast(
            ToastLevel::Warning,
            format!("Falha ao renderizar página {}", key.page),
        );
    }

    pub fn is_page_failed(&self, page: usize) -> bool {
        self.scheduler
            .is_failed(PageKey::new(page, self.zoom.index()))
    }

    pub fn is_page_pending(&self, page: usize) -> bool {
        self.scheduler
            .is_in_flight(PageKey::new(page, self.zoom.index()))
    }

    pub fn has_pending_renders(&self) -> bool {
        self.scheduler.in_flight_count() > 0
    }

    /// Forget all renders, for a freshly opened document.
    pub(super) fn reset_renders(&mut self) {
        self.rendered.clear();
        self.scheduler.reset();
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at_ms: self.clock_ms.saturating_add(TOAST_MS),
        });
    }

    pub(super) fn expire_toast(&mut self, now_ms: u64) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at_ms <= now_ms)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}
