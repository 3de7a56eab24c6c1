use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::app::chat::{chat_lines, ChatLine, LineKind};
use crate::app::App;
use crate::strings::{
    build_status_line, EMPTY_STATE, INPUT_BUSY, INPUT_HINT, STATUS_CONNECTING, TITLE_APP,
    TITLE_CHAT, TITLE_INPUT,
};
use crate::theme::{status_color, THEME};

const INPUT_MAX_LINES: u16 = 6;

/// Renders the whole screen from `app`; no state is changed.
pub fn draw(f: &mut Frame, app: &App) {
    let input_lines = (app.input.line_count() as u16).clamp(1, INPUT_MAX_LINES);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(input_lines + 2),
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);
    draw_chat(f, chunks[1], app);
    draw_status(f, chunks[2], app);
    draw_input(f, chunks[3], app, input_lines);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let label = app.status.map(|s| s.label()).unwrap_or(STATUS_CONNECTING);
    let line = Line::from(vec![
        Span::styled(TITLE_APP, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled("● ", Style::default().fg(status_color(app.status))),
        Span::raw(label),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn style_for(kind: LineKind) -> (Style, Style) {
    let header = |c| Style::default().fg(c).add_modifier(Modifier::BOLD);
    match kind {
        LineKind::User => (header(THEME.user), Style::default()),
        LineKind::Assistant => (header(THEME.assistant), Style::default()),
        LineKind::Error => (header(THEME.assistant), Style::default().fg(THEME.error)),
        LineKind::Loading => (header(THEME.assistant), Style::default().fg(THEME.hint)),
        LineKind::Spacer => (Style::default(), Style::default()),
    }
}

fn render_line(l: &ChatLine) -> Line<'static> {
    let (head, body) = style_for(l.kind);
    let cut = l.prefix_len.min(l.text.len());
    let mut spans = Vec::with_capacity(2);
    if cut > 0 {
        spans.push(Span::styled(l.text[..cut].to_string(), head));
    }
    spans.push(Span::styled(l.text[cut..].to_string(), body));
    Line::from(spans)
}

fn draw_chat(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(TITLE_CHAT)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.chat_border));
    let inner = block.inner(area);

    if app.messages.is_empty() && !app.sending {
        let hint = Line::from(Span::styled(EMPTY_STATE, Style::default().fg(THEME.hint)));
        f.render_widget(Paragraph::new(hint).block(block), area);
        return;
    }

    let lines = chat_lines(&app.messages, app.sending, app.tick, inner.width);
    let total = lines.len();
    let viewport = inner.height as usize;
    let max_scroll = total.saturating_sub(viewport);
    let from_bottom = (app.chat_scroll as usize).min(max_scroll);
    let start = max_scroll - from_bottom;

    let visible: Vec<Line> = lines
        .iter()
        .skip(start)
        .take(viewport)
        .map(render_line)
        .collect();
    f.render_widget(Paragraph::new(visible).block(block), area);

    if total > viewport {
        let mut sb_state = ScrollbarState::new(max_scroll).position(start);
        let sb = Scrollbar::default().orientation(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(sb, inner, &mut sb_state);
    }
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let text = build_status_line(
        &app.backend_url,
        app.messages.len(),
        app.chat_scroll,
        app.sending,
        area.width,
    );
    f.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(THEME.hint))),
        area,
    );
}

fn draw_input(f: &mut Frame, area: Rect, app: &App, visible_lines: u16) {
    let border = if app.sending {
        THEME.border_inactive
    } else {
        THEME.border_focus
    };
    let block = Block::default()
        .title(TITLE_INPUT)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);

    if app.sending {
        let busy = Span::styled(INPUT_BUSY, Style::default().fg(THEME.hint));
        f.render_widget(Paragraph::new(busy).block(block), area);
        return;
    }
    if app.input.is_empty() {
        let hint = Span::styled(INPUT_HINT, Style::default().fg(THEME.hint));
        f.render_widget(Paragraph::new(hint).block(block), area);
        f.set_cursor_position(Position::new(inner.x, inner.y));
        return;
    }

    let (row, col) = app.input.cursor_row_col();
    let offset_y = (row as u16).saturating_sub(visible_lines.saturating_sub(1));
    let offset_x = (col as u16).saturating_sub(inner.width.saturating_sub(1));
    let para = Paragraph::new(app.input.as_str().to_string())
        .block(block)
        .scroll((offset_y, offset_x));
    f.render_widget(para, area);
    f.set_cursor_position(Position::new(
        inner.x + (col as u16 - offset_x),
        inner.y + (row as u16 - offset_y),
    ));
}
