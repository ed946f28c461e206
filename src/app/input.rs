use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::{App, Message, Model};

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        &self,
        event: Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => self.handle_key(key, model),
            Event::Mouse(mouse) => self.handle_mouse(mouse, model),
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue(w, h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(&self, mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left))
                .then_some(Message::HideHelp);
        }
        if !model.is_ready() {
            return None;
        }

        match mouse.kind {
            // The page context menu is suppressed; right clicks do nothing.
            MouseEventKind::Down(MouseButton::Right) | MouseEventKind::Up(MouseButton::Right) => {
                crate::perf::log_event("input.suppressed", "right click");
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let area = spread_mouse_area(model);
                if !point_in_rect(mouse.column, mouse.row, area) {
                    return None;
                }
                if mouse.column >= area.x + area.width / 2 {
                    Some(Message::NextSpread)
                } else {
                    Some(Message::PrevSpread)
                }
            }
            MouseEventKind::ScrollDown => Some(Message::NextSpread),
            MouseEventKind::ScrollUp => Some(Message::PrevSpread),
            _ => None,
        }
    }

    pub(super) fn handle_key(&self, key: event::KeyEvent, model: &Model) -> Option<Message> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        if model.help_visible {
            return Some(Message::HideHelp);
        }

        let command = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);
        if command {
            return match key.code {
                KeyCode::Char('c' | 'q') => Some(Message::Quit),
                // Save and print shortcuts are swallowed while reading.
                KeyCode::Char('s' | 'S' | 'p' | 'P') => {
                    crate::perf::log_event("input.suppressed", format!("{:?}", key.code));
                    None
                }
                _ => None,
            };
        }

        // Until the document is open only leaving and help work.
        if !model.is_ready() {
            return match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Some(Message::Quit),
                KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
                _ => None,
            };
        }

        match key.code {
            // Navigation
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char(' ' | 'l') => {
                Some(Message::NextSpread)
            }
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') => Some(Message::PrevSpread),
            KeyCode::Home | KeyCode::Char('g') => Some(Message::FirstSpread),
            KeyCode::End | KeyCode::Char('G') => Some(Message::LastSpread),

            // Zoom
            KeyCode::Char('+' | '=') => Some(Message::ZoomIn),
            KeyCode::Char('-') => Some(Message::ZoomOut),
            KeyCode::Char('0') => Some(Message::ZoomReset),

            // View
            KeyCode::Char('f') | KeyCode::F(11) => Some(Message::ToggleFullscreen),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),

            // Leave
            KeyCode::Esc if model.fullscreen => Some(Message::ExitFullscreen),
            KeyCode::Esc | KeyCode::Char('q') => Some(Message::Quit),

            _ => None,
        }
    }

    pub(super) fn view(&self, model: &mut Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

fn spread_mouse_area(model: &Model) -> Rect {
    let (width, height) = model.terminal_size;
    let layout = crate::ui::reader_layout(
        Rect::new(0, 0, width, height),
        model.fullscreen,
        model.active_toast().is_some(),
    );
    layout.spread
}

fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x
        && col < rect.x + rect.width
        && row >= rect.y
        && row < rect.y + rect.height
}
