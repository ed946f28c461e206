use crate::app::Model;
use crate::app::model::{ReaderPhase, ToastLevel};
use crate::library::Book;
use crate::reader::{FlipDirection, spread_for_page};

/// All possible events and actions in the reader.
///
/// These represent user input, loading progress, and the passage of time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Navigation
    /// Flip to the next spread
    NextSpread,
    /// Flip to the previous spread
    PrevSpread,
    /// Jump to the cover
    FirstSpread,
    /// Jump to the last spread
    LastSpread,

    // Zoom
    ZoomIn,
    ZoomOut,
    ZoomReset,

    // View
    /// Toggle fullscreen
    ToggleFullscreen,
    /// Leave fullscreen
    ExitFullscreen,
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,

    // Loading
    /// Book record available
    BookLoaded(Book),
    /// PDF opened with this many pages
    DocumentLoaded(usize),
    /// Opening the book failed
    LoadFailed(String),

    // Time
    /// Clock advanced to this many milliseconds since start
    Tick(u64),

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Leave the reader
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// All reader state transitions happen here. No side effects beyond the
/// debug log.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Navigation
        Message::NextSpread => flip(&mut model, FlipDirection::Forward),
        Message::PrevSpread => flip(&mut model, FlipDirection::Backward),
        Message::FirstSpread => {
            if model.is_ready() {
                model.flip.cancel();
                model.spread_index = 0;
                log_spread(&model, "jump");
            }
        }
        Message::LastSpread => {
            if model.is_ready() {
                model.flip.cancel();
                model.spread_index = model.total_spreads().saturating_sub(1);
                log_spread(&model, "jump");
            }
        }

        // Zoom
        Message::ZoomIn => {
            if model.zoom.zoom_in() {
                log_zoom(&model);
            }
        }
        Message::ZoomOut => {
            if model.zoom.zoom_out() {
                log_zoom(&model);
            }
        }
        Message::ZoomReset => {
            if model.zoom.zoom_reset() {
                log_zoom(&model);
            }
        }

        // View
        Message::ToggleFullscreen => {
            model.fullscreen = !model.fullscreen;
        }
        Message::ExitFullscreen => {
            model.fullscreen = false;
        }
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }

        // Loading
        Message::BookLoaded(book) => {
            model.phase = if book.pdf_path().is_some() {
                ReaderPhase::LoadingDocument
            } else {
                ReaderPhase::NoPdf
            };
            model.book = Some(book);
        }
        Message::DocumentLoaded(page_count) => {
            model.flip.cancel();
            model.reset_renders();
            if page_count == 0 {
                model.page_count = 0;
                model.phase = ReaderPhase::Failed("O arquivo PDF não possui páginas".to_string());
            } else {
                model.page_count = page_count;
                model.spread_index = model
                    .initial_page
                    .map_or(0, |page| spread_for_page(page, page_count));
                model.phase = ReaderPhase::Ready;
                crate::perf::log_event(
                    "document.ready",
                    format!("pages={page_count} spread={}", model.spread_index),
                );
            }
        }
        Message::LoadFailed(reason) => {
            tracing::debug!("failed to open book: {reason}");
            model.show_toast(ToastLevel::Error, "Erro ao carregar o livro");
            model.phase = ReaderPhase::Failed(reason);
        }

        // Time
        Message::Tick(now_ms) => {
            model.clock_ms = model.clock_ms.max(now_ms);
            model.expire_toast(model.clock_ms);
            let tick = model.flip.tick(model.clock_ms);
            if let Some(target) = tick.turned_to {
                model.spread_index = target;
                log_spread(&model, "turn");
            }
        }

        // Window
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
        }

        // Application
        Message::Quit => {
            model.should_quit = true;
        }
    }

    model
}

fn flip(model: &mut Model, direction: FlipDirection) {
    if !model.is_ready() {
        return;
    }
    let started = model.flip.navigate(
        direction,
        model.spread_index,
        model.total_spreads(),
        model.clock_ms,
    );
    if started {
        crate::perf::log_event(
            "flip.start",
            format!(
                "from={} to={} dir={direction:?}",
                model.spread_index,
                model.flip.target().unwrap_or(model.spread_index)
            ),
        );
    }
}

fn log_spread(model: &Model, how: &str) {
    crate::perf::log_event(
        "spread.show",
        format!("{how} index={} ready={}", model.spread_index, model.is_spread_ready()),
    );
}

fn log_zoom(model: &Model) {
    crate::perf::log_event(
        "zoom.change",
        format!("index={} percent={}", model.zoom.index(), model.zoom.percent()),
    );
}
