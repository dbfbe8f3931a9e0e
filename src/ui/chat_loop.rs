//! Interactive event loop.
//!
//! The loop owns all mutable state. The only other task in the process is
//! the one spawned per submission to carry the HTTP round trip; it reports
//! back over an mpsc channel and never touches state directly, so every
//! transition of the request machine happens on this loop.

use std::{error::Error, io, time::Instant};

use ratatui::crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
        EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Size, Terminal};
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{send_message, ApiError};
use crate::core::app::{App, Mode, OutboundTurn};
use crate::core::config::Config;
use crate::ui::layout::{max_scroll_offset, transcript_lines};
use crate::ui::renderer::ui;
use crate::utils::input::{clip_to_capacity, sanitize_text_input};

/// Outcome of one request session, reported by the spawned request task.
pub enum TurnEvent {
    Settled(Result<String, ApiError>),
}

pub async fn run_chat(config: Config) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(&config, Config::history_path());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<TurnEvent>();

    let result = run_loop(&mut terminal, &mut app, tx, &mut rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tx: mpsc::UnboundedSender<TurnEvent>,
    rx: &mut mpsc::UnboundedReceiver<TurnEvent>,
) -> Result<(), Box<dyn Error>> {
    loop {
        app.expire_notice(Instant::now());
        terminal.draw(|f| ui(f, app, Instant::now()))?;

        // Poll briefly so the typing indicator keeps pulsing and the
        // notice timer keeps advancing even when the user is idle.
        if event::poll(std::time::Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(app, key, &tx, terminal.size()?);
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => {
                        scroll_by(app, -3, terminal.size()?);
                    }
                    MouseEventKind::ScrollDown => {
                        scroll_by(app, 3, terminal.size()?);
                    }
                    _ => {}
                },
                Event::Paste(text) => {
                    if app.input_enabled() {
                        let sanitized = sanitize_text_input(&text);
                        let clipped = clip_to_capacity(&sanitized, app.remaining_capacity());
                        app.compose.insert_str(&clipped);
                    }
                }
                _ => {}
            }
        }

        // Reconcile settled requests. Draining here keeps the machine's
        // transitions on this loop, one per request session.
        while let Ok(TurnEvent::Settled(outcome)) = rx.try_recv() {
            app.settle(outcome, Instant::now());
        }

        if app.exit_requested {
            return Ok(());
        }
    }
}

fn handle_key(
    app: &mut App,
    key: KeyEvent,
    tx: &mpsc::UnboundedSender<TurnEvent>,
    terminal_size: Size,
) {
    // Quit chord works in every mode, even mid-request.
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.exit_requested = true;
        return;
    }

    if app.mode == Mode::ConfirmClear {
        match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('y') | KeyCode::Char('Y') => {
                app.resolve_clear(true)
            }
            _ => app.resolve_clear(false),
        }
        return;
    }

    match key.code {
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.request_clear();
        }
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            // The modifier inserts a literal line break instead of sending.
            if app.input_enabled() && app.remaining_capacity() > 0 {
                app.compose.insert_newline();
            }
        }
        KeyCode::Enter => {
            if let Some(turn) = app.submit(Instant::now()) {
                spawn_request(app.client.clone(), turn, tx.clone());
            }
        }
        KeyCode::PageUp => scroll_by(app, -5, terminal_size),
        KeyCode::PageDown => scroll_by(app, 5, terminal_size),
        _ => {
            if !app.input_enabled() {
                return;
            }
            // Hold the length cap on plain character inserts; chords and
            // editing keys always pass through to the compose box.
            let is_plain_insert = matches!(key.code, KeyCode::Char(_))
                && !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT);
            if is_plain_insert && app.remaining_capacity() == 0 {
                return;
            }
            app.compose.input(key);
        }
    }
}

fn spawn_request(client: reqwest::Client, turn: OutboundTurn, tx: mpsc::UnboundedSender<TurnEvent>) {
    tokio::spawn(async move {
        let OutboundTurn {
            text,
            endpoint,
            session_id,
        } = turn;
        let outcome = send_message(&client, &endpoint, &text, &session_id).await;
        if let Err(err) = &outcome {
            debug!(%err, "chat request failed");
        }
        // A closed channel means the loop is gone; nothing depends on the
        // send.
        let _ = tx.send(TurnEvent::Settled(outcome));
    });
}

/// Manual scrolling disengages the sticky bottom until the user returns to
/// it.
fn scroll_by(app: &mut App, delta: i32, terminal_size: Size) {
    let viewport_height = terminal_size
        .height
        .saturating_sub(app.compose_height() + 2)
        .saturating_sub(1);
    let lines = transcript_lines(app.transcript.messages());
    // Word-wrapped rows at the real width, so the bound here agrees with
    // the renderer's scroll clamp.
    let max_offset = max_scroll_offset(&lines, terminal_size.width, viewport_height);

    if app.auto_scroll {
        app.scroll_offset = max_offset;
    }

    if delta < 0 {
        app.scroll_offset = app.scroll_offset.saturating_sub((-delta) as u16);
        app.auto_scroll = false;
    } else {
        app.scroll_offset = app.scroll_offset.saturating_add(delta as u16).min(max_offset);
        if app.scroll_offset >= max_offset {
            app.auto_scroll = true;
        }
    }
}
