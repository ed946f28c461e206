use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::app::Model;

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<desconhecido>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<nenhum>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::styled("Navegação", section_style));
    lines.push(Line::raw("  Direita/Espaço/PgDn/l   Próximas páginas"));
    lines.push(Line::raw("  Esquerda/PgUp/h         Páginas anteriores"));
    lines.push(Line::raw("  Home / End              Capa / última página"));
    lines.push(Line::raw("  Clique (metade dir/esq) Avançar / voltar"));
    lines.push(Line::raw("  Roda do mouse           Avançar / voltar"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Zoom", section_style));
    lines.push(Line::raw("  + / =                   Aumentar"));
    lines.push(Line::raw("  -                       Diminuir"));
    lines.push(Line::raw("  0                       Tamanho padrão"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Tela", section_style));
    lines.push(Line::raw("  f / F11                 Tela cheia"));
    lines.push(Line::raw("  Esc                     Sair da tela cheia / Voltar"));
    lines.push(Line::raw("  q / Ctrl-c              Voltar"));
    lines.push(Line::raw("  ? / F1                  Ajuda"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Configuração", section_style));
    lines.push(Line::raw(format!("  Global: {global_cfg}")));
    lines.push(Line::raw(format!("  Local: {local_cfg}")));

    let block = Block::default()
        .title("Ajuda")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height = inner.height.saturating_sub(1);
    let visible: Vec<Line> = lines
        .into_iter()
        .take(usize::from(content_height))
        .collect();
    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height);
    frame.render_widget(Paragraph::new(visible), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
    let footer = Line::styled("qualquer tecla fecha", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

/// Small box over the spread while pages load.
pub fn render_loading_overlay(frame: &mut Frame, area: Rect, message: &str) {
    let width = u16::try_from(message.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(6);
    let popup = centered_popup_rect(width, 3, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(Line::raw(message).centered()).block(block),
        popup,
    );
}

/// Full-screen message for a book that cannot be shown. The only way out is
/// back.
pub fn render_message_view(frame: &mut Frame, area: Rect, title: &str, detail: &str) {
    let popup_width = area.width.saturating_sub(8).clamp(20, 72);
    let popup = centered_popup_rect(popup_width, 9, area);
    let lines = vec![
        Line::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::raw(detail.to_string()),
        Line::raw(""),
        Line::styled("Esc / q: Voltar", Style::default().fg(Color::Indexed(245))),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true }),
        popup,
    );
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
