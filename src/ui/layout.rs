//! Pure projection of app state into display lines.
//!
//! Everything in this module is a function of its inputs: rendering the
//! same transcript twice yields the same lines. Message content is emitted
//! verbatim as plain text spans; nothing here parses or interprets markup,
//! so remote content cannot inject styling or structure into the view.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

use crate::core::app::Notice;
use crate::core::message::{Message, Sender};

/// Avatar glyphs, one per sender. These are the only two variants.
pub const USER_GLYPH: &str = "●";
pub const BOT_GLYPH: &str = "◆";

pub fn avatar_glyph(sender: Sender) -> &'static str {
    match sender {
        Sender::User => USER_GLYPH,
        Sender::Bot => BOT_GLYPH,
    }
}

fn avatar_style(sender: Sender) -> Style {
    match sender {
        Sender::User => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        Sender::Bot => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    }
}

/// One visual block per message: avatar glyph plus the content verbatim,
/// continuation lines indented under the glyph, a blank spacer after.
pub fn transcript_lines(messages: &[Message]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for msg in messages {
        let mut content_lines = msg.content.lines();
        let first = content_lines.next().unwrap_or("");
        lines.push(Line::from(vec![
            Span::styled(avatar_glyph(msg.sender), avatar_style(msg.sender)),
            Span::raw(" "),
            Span::raw(first.to_string()),
        ]));
        for rest in content_lines {
            lines.push(Line::from(format!("  {rest}")));
        }
        lines.push(Line::from(""));
    }

    lines
}

/// The zero-message state. Replaced the first time any message lands in
/// the transcript.
pub fn welcome_lines() -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(BOT_GLYPH, avatar_style(Sender::Bot)),
            Span::raw(" "),
            Span::styled("¡Bienvenido!", Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from("  Soy tu asistente virtual. Estoy aquí para ayudarte con"),
        Line::from("  información sobre nuestros servicios, facturación y más."),
        Line::from(""),
        Line::from("  Puedes preguntarme sobre:"),
        Line::from("   - Información de contacto"),
        Line::from("   - Servicios y facturación"),
        Line::from("   - Ubicaciones y horarios"),
    ]
}

/// Typing indicator shown while a request is outstanding.
pub fn typing_line(symbol: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(symbol, avatar_style(Sender::Bot)),
        Span::styled(" escribiendo...", Style::default().fg(Color::DarkGray)),
    ])
}

/// Ephemeral error banner for a failed turn.
pub fn notice_line(notice: &Notice) -> Line<'static> {
    Line::from(Span::styled(
        notice.text.clone(),
        Style::default().fg(Color::Red),
    ))
}

/// Pre-wrap lines to `width`, wrapping at word boundaries and splitting
/// words longer than a row. The renderer draws the result without
/// `Paragraph`'s own wrapping, so row counts and scroll offsets always
/// match what ends up on screen.
pub fn prewrap_lines(lines: &[Line<'_>], width: u16) -> Vec<Line<'static>> {
    let width = width as usize;
    let mut out: Vec<Line<'static>> = Vec::with_capacity(lines.len());

    for line in lines {
        if width == 0 {
            out.push(clone_line(line));
            continue;
        }
        wrap_line_into(line, width, &mut out);
    }

    out
}

fn clone_line(line: &Line<'_>) -> Line<'static> {
    let spans: Vec<Span<'static>> = line
        .spans
        .iter()
        .map(|s| Span::styled(s.content.to_string(), s.style))
        .collect();
    Line::from(spans)
}

fn wrap_line_into(line: &Line<'_>, width: usize, out: &mut Vec<Line<'static>>) {
    let chars: Vec<(char, Style)> = line
        .spans
        .iter()
        .flat_map(|s| s.content.chars().map(move |c| (c, s.style)))
        .collect();
    if chars.is_empty() {
        out.push(Line::from(""));
        return;
    }

    let mut row: Vec<(char, Style)> = Vec::new();
    let mut row_width = 0usize;
    let mut word: Vec<(char, Style)> = Vec::new();
    let mut word_width = 0usize;
    let mut emitted = false;

    // Greedy word packing: a word that no longer fits moves to the next
    // row whole; a word wider than a full row splits at the row edge.
    let place_word = |row: &mut Vec<(char, Style)>,
                      row_width: &mut usize,
                      word: &mut Vec<(char, Style)>,
                      word_width: &mut usize,
                      emitted: &mut bool,
                      out: &mut Vec<Line<'static>>| {
        if word.is_empty() {
            return;
        }
        if *row_width > 0 && *row_width + *word_width > width {
            emit_row(row, out);
            *emitted = true;
            *row_width = 0;
        }
        for (ch, style) in word.drain(..) {
            let w = cell_width(ch);
            if *row_width > 0 && *row_width + w > width {
                emit_row(row, out);
                *emitted = true;
                *row_width = 0;
            }
            row.push((ch, style));
            *row_width += w;
        }
        *word_width = 0;
    };

    for (ch, style) in chars {
        if ch == ' ' {
            place_word(
                &mut row,
                &mut row_width,
                &mut word,
                &mut word_width,
                &mut emitted,
                out,
            );
            // A space that falls on the row edge wraps instead of
            // spilling over; the next row never starts with it.
            if row_width < width {
                row.push((ch, style));
                row_width += 1;
            } else {
                emit_row(&mut row, out);
                emitted = true;
                row_width = 0;
            }
        } else {
            word.push((ch, style));
            word_width += cell_width(ch);
        }
    }

    place_word(
        &mut row,
        &mut row_width,
        &mut word,
        &mut word_width,
        &mut emitted,
        out,
    );

    if !row.is_empty() || !emitted {
        emit_row(&mut row, out);
    }
}

fn cell_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

fn emit_row(row: &mut Vec<(char, Style)>, out: &mut Vec<Line<'static>>) {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();

    for (ch, style) in row.drain(..) {
        if run.is_empty() {
            run_style = style;
            run.push(ch);
        } else if style == run_style {
            run.push(ch);
        } else {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
            run_style = style;
            run.push(ch);
        }
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }

    if spans.is_empty() {
        out.push(Line::from(""));
    } else {
        out.push(Line::from(spans));
    }
}

/// Number of terminal rows `lines` occupy once wrapped to `width`.
pub fn wrapped_line_count(lines: &[Line<'_>], width: u16) -> u16 {
    prewrap_lines(lines, width).len().min(u16::MAX as usize) as u16
}

/// Greatest scroll offset that still leaves the viewport full.
pub fn max_scroll_offset(lines: &[Line<'_>], width: u16, viewport_height: u16) -> u16 {
    wrapped_line_count(lines, width).saturating_sub(viewport_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;

    fn sample_transcript() -> Vec<Message> {
        vec![
            Message::user("Hola"),
            Message::bot("Hola, ¿en qué puedo ayudarte?"),
        ]
    }

    #[test]
    fn rendering_twice_is_idempotent() {
        let messages = sample_transcript();
        let first = transcript_lines(&messages);
        let second = transcript_lines(&messages);
        assert_eq!(first, second);
    }

    #[test]
    fn each_message_contributes_one_block() {
        let messages = sample_transcript();
        let lines = transcript_lines(&messages);
        // Two single-line messages, each followed by a spacer.
        assert_eq!(lines.len(), 4);
        assert!(lines[0].spans[0].content.contains(USER_GLYPH));
        assert!(lines[2].spans[0].content.contains(BOT_GLYPH));
    }

    #[test]
    fn glyphs_are_keyed_by_sender() {
        assert_eq!(avatar_glyph(Sender::User), USER_GLYPH);
        assert_eq!(avatar_glyph(Sender::Bot), BOT_GLYPH);
        assert_ne!(USER_GLYPH, BOT_GLYPH);
    }

    #[test]
    fn content_is_emitted_verbatim_not_interpreted() {
        let messages = vec![Message::bot("<b>**hola**</b> `sin` [markup](x)")];
        let lines = transcript_lines(&messages);
        let text: String = lines[0]
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(text.contains("<b>**hola**</b> `sin` [markup](x)"));
    }

    #[test]
    fn multiline_content_indents_continuation_lines() {
        let messages = vec![Message::user("uno\ndos")];
        let lines = transcript_lines(&messages);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].spans[0].content, "  dos");
    }

    #[test]
    fn welcome_shows_the_bot_glyph() {
        let lines = welcome_lines();
        assert!(!lines.is_empty());
        assert!(lines[0].spans[0].content.contains(BOT_GLYPH));
    }

    #[test]
    fn wrapped_count_accounts_for_long_lines() {
        let lines = vec![Line::from("a".repeat(25)), Line::from("")];
        assert_eq!(wrapped_line_count(&lines, 10), 4);
        assert_eq!(max_scroll_offset(&lines, 10, 3), 1);
        assert_eq!(max_scroll_offset(&lines, 10, 10), 0);
    }

    #[test]
    fn prewrap_breaks_at_word_boundaries() {
        // Character math would pack "hello world again" (17 cells) into
        // two rows of 10; word wrapping needs three.
        let lines = vec![Line::from("hello world again")];
        let wrapped = prewrap_lines(&lines, 10);
        assert_eq!(wrapped.len(), 3);
        assert_eq!(line_text(&wrapped[0]).trim_end(), "hello");
        assert_eq!(line_text(&wrapped[1]).trim_end(), "world");
        assert_eq!(line_text(&wrapped[2]).trim_end(), "again");
    }

    #[test]
    fn prewrap_splits_words_wider_than_a_row() {
        let lines = vec![Line::from("abcdefghijkl")];
        let wrapped = prewrap_lines(&lines, 5);
        assert_eq!(wrapped.len(), 3);
        assert_eq!(line_text(&wrapped[0]), "abcde");
        assert_eq!(line_text(&wrapped[1]), "fghij");
        assert_eq!(line_text(&wrapped[2]), "kl");
    }

    #[test]
    fn prewrap_keeps_span_styles() {
        let messages = vec![Message::user("Hola")];
        let lines = transcript_lines(&messages);
        let wrapped = prewrap_lines(&lines, 40);
        assert_eq!(wrapped[0].spans[0].content, USER_GLYPH);
        assert_eq!(wrapped[0].spans[0].style, avatar_style(Sender::User));
    }

    #[test]
    fn prewrap_preserves_empty_lines() {
        let lines = vec![Line::from("hola"), Line::from(""), Line::from("mundo")];
        let wrapped = prewrap_lines(&lines, 10);
        assert_eq!(wrapped.len(), 3);
        assert_eq!(line_text(&wrapped[1]), "");
    }

    #[test]
    fn wrapped_count_matches_prewrapped_rows() {
        let messages = vec![Message::bot("palabritas ".repeat(8).trim_end().to_string())];
        let lines = transcript_lines(&messages);
        let rows = prewrap_lines(&lines, 20).len() as u16;
        assert_eq!(wrapped_line_count(&lines, 20), rows);
    }

    #[test]
    fn sticky_bottom_keeps_newest_text_visible_under_word_wrap() {
        use ratatui::buffer::Buffer;
        use ratatui::layout::Rect;
        use ratatui::widgets::{Paragraph, Widget};

        // Eleven-cell words at width 20 wrap one per row, so row counts
        // diverge badly from any character-based estimate.
        let content = format!("{} FINAL", "palabrotasx ".repeat(10).trim_end());
        let messages = vec![Message::bot(content)];
        let lines = transcript_lines(&messages);

        let width = 20u16;
        let height = 6u16;
        let wrapped = prewrap_lines(&lines, width);
        let offset = max_scroll_offset(&lines, width, height);

        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        Paragraph::new(wrapped).scroll((offset, 0)).render(area, &mut buf);

        let visible: String = buf.content.iter().map(|cell| cell.symbol()).collect();
        assert!(
            visible.contains("FINAL"),
            "newest message must be visible at the auto-scroll offset"
        );
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }
}
