use ratatui::prelude::*;

use crate::app::{Model, ReaderPhase};

use super::{FOOTER_ROWS, HEADER_ROWS, SPREAD_MARGIN, overlays, spread, status};

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderLayout {
    pub header: Option<Rect>,
    pub spread: Rect,
    pub toast: Option<Rect>,
    pub footer: Option<Rect>,
}

/// Split the terminal into header, spread pane, toast line and footer.
/// Fullscreen drops the header and footer.
pub fn reader_layout(area: Rect, fullscreen: bool, toast_active: bool) -> ReaderLayout {
    let chrome = if fullscreen { 0 } else { 1 };
    let header_rows = HEADER_ROWS * chrome;
    let footer_rows = FOOTER_ROWS * chrome;
    let toast_rows = u16::from(toast_active);
    let chunks = Layout::vertical([
        Constraint::Length(header_rows),
        Constraint::Min(0),
        Constraint::Length(toast_rows),
        Constraint::Length(footer_rows),
    ])
    .split(area);
    let pane = chunks[1];
    let spread = Rect {
        x: pane.x + SPREAD_MARGIN.min(pane.width / 2),
        y: pane.y,
        width: pane.width.saturating_sub(SPREAD_MARGIN * 2),
        height: pane.height,
    };
    ReaderLayout {
        header: (header_rows > 0).then_some(chunks[0]),
        spread,
        toast: toast_active.then_some(chunks[2]),
        footer: (footer_rows > 0).then_some(chunks[3]),
    }
}

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = reader_layout(area, model.fullscreen, model.active_toast().is_some());

    if let Some(header) = layout.header {
        status::render_header(model, frame, header);
    }

    match model.phase.clone() {
        ReaderPhase::Ready => {
            spread::render_spread(model, frame, layout.spread);
            if !model.is_spread_ready() {
                overlays::render_loading_overlay(frame, layout.spread, "Carregando...");
            }
        }
        ReaderPhase::LoadingBook | ReaderPhase::LoadingDocument => {
            overlays::render_loading_overlay(frame, layout.spread, "Carregando livro...");
        }
        ReaderPhase::NoPdf => overlays::render_message_view(
            frame,
            layout.spread,
            "PDF não disponível",
            "Este livro ainda não possui um arquivo PDF associado.",
        ),
        ReaderPhase::Failed(reason) => {
            overlays::render_message_view(frame, layout.spread, "Erro ao carregar", &reason);
        }
    }

    if let Some(toast) = layout.toast {
        status::render_toast_bar(model, frame, toast);
    }
    if let Some(footer) = layout.footer {
        status::render_status_bar(model, frame, footer);
    }

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}
