use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{Model, ToastLevel};

const HELP_HINT: &str = "?:ajuda";

/// Cut `text` to at most `max_width` display columns, ending in `…` when
/// shortened.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('\u{2026}');
    out
}

/// Left text and right text on one line, the left side truncated so the
/// right side always fits.
fn split_line(left: &str, right: &str, width: u16) -> String {
    let width = usize::from(width);
    let right_width = right.width();
    let left = truncate_to_width(left, width.saturating_sub(right_width + 1));
    let gap = width.saturating_sub(left.width() + right_width).max(1);
    format!("{left}{}{right}", " ".repeat(gap))
}

pub fn render_header(model: &Model, frame: &mut Frame, area: Rect) {
    let (left, right) = match model.book.as_ref() {
        Some(book) => {
            let mut left = format!(" {}", book.title);
            if !book.author.trim().is_empty() {
                left.push_str(&format!(" \u{00b7} {}", book.author));
            }
            let right = format!(
                "{}  Zoom {}% ",
                book.book_type.label(),
                model.zoom.percent()
            );
            (left, right)
        }
        None => (" folio".to_string(), format!("Zoom {}% ", model.zoom.percent())),
    };
    let header = Paragraph::new(split_line(&left, &right, area.width)).style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(header, area);
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let mut left = String::from(" ");
    match model.page_label() {
        Some(label) => left.push_str(&label),
        None => left.push_str("Carregando livro..."),
    }
    if let Some(book) = model.book.as_ref() {
        if !book.curriculum_component.trim().is_empty() {
            left.push_str(&format!("  [{}]", book.curriculum_component));
        }
        let groups = book.class_groups_label();
        if !groups.is_empty() {
            left.push_str(&format!("  {groups}"));
        }
    }
    let right = format!("{HELP_HINT} ");
    let status_bar = Paragraph::new(split_line(&left, &right, area.width))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[aviso]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[erro]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let text = truncate_to_width(&format!("{prefix} {message}"), usize::from(area.width));
    frame.render_widget(Paragraph::new(text).style(style), area);
}
