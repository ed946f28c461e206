use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui_image::protocol::StatefulProtocolType;
use ratatui_image::{Resize, StatefulImage};

use crate::app::Model;
use crate::reader::{FlipDirection, FlipPhase, Spread};

/// Terminal cells are about twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;
/// Width / height of a page not yet rendered (A4 portrait).
const DEFAULT_PAGE_ASPECT: f32 = 0.707;
/// Zoom scale at which a page fills the full pane height.
const FULL_HEIGHT_SCALE: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlot {
    pub page: usize,
    pub area: Rect,
}

/// Where the pages of a spread are drawn. A cover or a trailing single page
/// uses only `left`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpreadSlots {
    pub left: Option<PageSlot>,
    pub right: Option<PageSlot>,
}

impl SpreadSlots {
    fn iter(&self) -> impl Iterator<Item = PageSlot> {
        self.left.into_iter().chain(self.right)
    }
}

/// Cell size of a page at `scale`, keeping its aspect ratio and staying
/// within `max_width` columns.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn page_size(area: Rect, scale: f32, aspect: f32, max_width: u16) -> (u16, u16) {
    if area.height == 0 || max_width == 0 {
        return (0, 0);
    }
    let height = f32::from(area.height);
    let rows = (height * scale / FULL_HEIGHT_SCALE).round().clamp(1.0, height);
    let cols = (rows * aspect * CELL_ASPECT)
        .round()
        .clamp(1.0, f32::from(max_width));
    (cols as u16, rows as u16)
}

/// Lay out a spread: the cover centred, facing pages meeting at the spine.
pub fn page_slots(
    area: Rect,
    spread: &Spread,
    scale: f32,
    aspect: impl Fn(usize) -> f32,
) -> SpreadSlots {
    let centred_y = |rows: u16| area.y + area.height.saturating_sub(rows) / 2;

    if spread.is_cover {
        let (cols, rows) = page_size(area, scale, aspect(spread.left_page), area.width);
        let x = area.x + area.width.saturating_sub(cols) / 2;
        return SpreadSlots {
            left: Some(PageSlot {
                page: spread.left_page,
                area: Rect::new(x, centred_y(rows), cols, rows),
            }),
            right: None,
        };
    }

    let half = area.width / 2;
    let spine = area.x + half;
    let (cols, rows) = page_size(area, scale, aspect(spread.left_page), half);
    let left = PageSlot {
        page: spread.left_page,
        area: Rect::new(spine - cols, centred_y(rows), cols, rows),
    };
    let right = spread.right_slot().map(|page| {
        let (cols, rows) = page_size(area, scale, aspect(page), area.width - half);
        PageSlot {
            page,
            area: Rect::new(spine, centred_y(rows), cols, rows),
        }
    });
    SpreadSlots {
        left: Some(left),
        right,
    }
}

/// Columns of `area` covered by the turning leaf, `covered` in `[0, 1]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn curtain(area: Rect, covered: f32, from_right: bool) -> Rect {
    let width = (f32::from(area.width) * covered.clamp(0.0, 1.0)).round() as u16;
    let width = width.min(area.width);
    let x = if from_right {
        area.right() - width
    } else {
        area.x
    };
    Rect::new(x, area.y, width, area.height)
}

/// The leaf for the current flip phase. A forward flip lifts the right page
/// and lays down the new left one; backward is the mirror image.
pub fn flip_curtain(phase: FlipPhase, progress: f32, slots: &SpreadSlots) -> Option<Rect> {
    let (direction, covered, entering) = match phase {
        FlipPhase::Idle => return None,
        FlipPhase::Leaving(direction) => (direction, progress, false),
        FlipPhase::Entering(direction) => (direction, 1.0 - progress, true),
    };
    let on_right = (direction == FlipDirection::Forward) != entering;
    let slot = if on_right {
        slots.right.or(slots.left)
    } else {
        slots.left.or(slots.right)
    }?;
    Some(curtain(slot.area, covered, on_right))
}

#[allow(clippy::cast_precision_loss)]
fn surface_aspect(model: &Model, page: usize, zoom: usize) -> f32 {
    model
        .rendered
        .nearest_zoom(page, zoom)
        .and_then(|key| model.rendered.get(key))
        .filter(|surface| surface.height_px > 0)
        .map_or(DEFAULT_PAGE_ASPECT, |surface| {
            surface.width_px as f32 / surface.height_px as f32
        })
}

pub fn render_spread(model: &mut Model, frame: &mut Frame, area: Rect) {
    let Some(spread) = model.current_spread() else {
        return;
    };
    let zoom = model.zoom.index();
    let scale = model.zoom.current_scale();
    let slots = page_slots(area, &spread, scale, |page| {
        surface_aspect(model, page, zoom)
    });
    let flipping = !model.flip.is_idle();

    for slot in slots.iter() {
        render_page(model, frame, slot, zoom, flipping);
    }

    let progress = model.flip.progress(model.clock_ms);
    if let Some(leaf) = flip_curtain(model.flip.phase(), progress, &slots) {
        render_leaf(frame, leaf);
    }

    crate::perf::log_event(
        "render.spread",
        format!(
            "spread={} pages={:?} area={}x{} zoom={} phase={:?}",
            spread.index,
            spread.visible_pages(),
            area.width,
            area.height,
            zoom,
            model.flip.phase()
        ),
    );
}

fn render_page(model: &mut Model, frame: &mut Frame, slot: PageSlot, zoom: usize, flipping: bool) {
    if slot.area.is_empty() {
        return;
    }
    let status = if model.is_page_failed(slot.page) {
        "falha ao renderizar"
    } else if model.is_page_pending(slot.page) {
        "renderizando..."
    } else {
        ""
    };

    // After a zoom change the previous scale stays up until the new one lands.
    let protocol = model
        .rendered
        .nearest_zoom(slot.page, zoom)
        .and_then(|key| model.rendered.get_mut(key))
        .and_then(|surface| surface.protocol.as_mut());
    if let Some(protocol) = protocol {
        let halfblocks = matches!(
            protocol.protocol_type(),
            StatefulProtocolType::Halfblocks(_)
        );
        // Graphics protocols draw above the cell grid and would show through
        // the leaf, so pages stay as placeholders until the flip settles.
        if halfblocks || !flipping {
            let resize = if halfblocks {
                // Nearest-neighbor causes strong color aliasing artifacts in half-cell mode.
                Resize::Scale(Some(image::imageops::FilterType::CatmullRom))
            } else {
                Resize::Scale(None)
            };
            frame.render_stateful_widget(StatefulImage::default().resize(resize), slot.area, protocol);
            return;
        }
    }
    render_placeholder(frame, slot, status);
}

fn render_placeholder(frame: &mut Frame, slot: PageSlot, status: &str) {
    let block = Block::default()
        .title(format!("Página {}", slot.page))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Indexed(245)));
    let inner_rows = slot.area.height.saturating_sub(2);
    let mut lines = vec![Line::raw(""); usize::from(inner_rows / 2)];
    lines.push(Line::styled(status, Style::default().fg(Color::Indexed(245))).centered());
    frame.render_widget(Paragraph::new(lines).block(block), slot.area);
}

fn render_leaf(frame: &mut Frame, leaf: Rect) {
    let buf = frame.buffer_mut();
    let leaf = leaf.intersection(buf.area);
    for y in leaf.top()..leaf.bottom() {
        for x in leaf.left()..leaf.right() {
            buf[(x, y)]
                .set_symbol("\u{2591}")
                .set_fg(Color::Gray)
                .set_bg(Color::DarkGray);
        }
    }
}
