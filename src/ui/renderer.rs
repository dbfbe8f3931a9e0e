use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::core::app::{App, Mode};
use crate::ui::layout::{
    notice_line, prewrap_lines, transcript_lines, typing_line, welcome_lines,
};

pub fn ui(f: &mut Frame, app: &App, now: Instant) {
    let compose_height = app.compose_height();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(compose_height + 2), // +2 for borders
        ])
        .split(f.area());

    draw_transcript(f, app, now, chunks[0]);

    match app.mode {
        Mode::Compose => draw_compose(f, app, chunks[1]),
        Mode::ConfirmClear => draw_clear_confirmation(f, chunks[1]),
    }
}

fn draw_transcript(f: &mut Frame, app: &App, now: Instant, area: ratatui::layout::Rect) {
    let mut lines: Vec<Line> = if app.transcript.is_empty() {
        welcome_lines()
    } else {
        transcript_lines(app.transcript.messages())
    };

    if let Some(symbol) = app.typing_symbol(now) {
        lines.push(typing_line(symbol));
    }

    if let Some(notice) = &app.notice {
        lines.push(Line::from(""));
        lines.push(notice_line(notice));
    }

    // Pre-wrapped lines are drawn without Paragraph's own wrapping, so the
    // row count the scroll math sees is exactly what lands on screen.
    let lines = prewrap_lines(&lines, area.width);

    // Sticky bottom: after any change to the visible list the view snaps
    // to the newest message on the next draw, once the wrapped line count
    // for the current width is known.
    let viewport_height = area.height.saturating_sub(1); // title row
    let total_rows = lines.len().min(u16::MAX as usize) as u16;
    let max_offset = total_rows.saturating_sub(viewport_height);
    let scroll_offset = if app.auto_scroll {
        max_offset
    } else {
        app.scroll_offset.min(max_offset)
    };

    let title = format!("Charla v{} - {}", env!("CARGO_PKG_VERSION"), app.endpoint());

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(title))
        .scroll((scroll_offset, 0));

    f.render_widget(paragraph, area);
}

fn draw_compose(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let sending = app.request.is_sending();

    let title = if sending {
        "Esperando respuesta..."
    } else {
        "Escribe tu mensaje (Enter envía, Alt+Enter nueva línea, Ctrl+L limpia, Ctrl+C salir)"
    };

    let counter_style = if app.counter_is_warning() {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let border_style = if sending {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .title_bottom(Line::styled(app.counter_text(), counter_style).right_aligned());

    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(&app.compose, inner);
}

fn draw_clear_confirmation(f: &mut Frame, area: ratatui::layout::Rect) {
    let prompt = Paragraph::new(
        "¿Estás seguro de que deseas limpiar toda la conversación? (s = sí, cualquier otra tecla cancela)",
    )
    .style(Style::default().fg(Color::Yellow))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title("Limpiar conversación"),
    );

    f.render_widget(prompt, area);
}
