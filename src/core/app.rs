//! Application state and the request coordinator's state machine.
//!
//! The machine is cyclic and has no terminal state: `Idle → Sending →
//! (settled) → Idle`, once per submission, for the life of the process.
//! All state lives here and is mutated only by the event loop; the
//! renderer reads it and never writes.

use std::path::PathBuf;
use std::time::Instant;

use ratatui::style::Style;
use tui_textarea::TextArea;

use crate::api::ApiError;
use crate::core::config::Config;
use crate::core::constants::{
    COUNTER_WARN_RATIO, MAX_INPUT_HEIGHT, MAX_MESSAGE_LEN, NOTICE_TTL,
};
use crate::core::message::Message;
use crate::core::transcript::TranscriptStore;

/// Request coordinator state. At most one request session exists at a
/// time; the disabled compose box is the admission control that keeps it
/// that way, and [`App::submit`] double-checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Sending { started: Instant },
}

impl RequestState {
    pub fn is_sending(self) -> bool {
        matches!(self, RequestState::Sending { .. })
    }
}

/// Interaction mode of the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Compose,
    /// Blocking yes/no overlay before the transcript is cleared.
    ConfirmClear,
}

/// Transient, non-persisted error banner for a failed turn. Removed after
/// a fixed delay; nothing depends on the removal actually firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub expires_at: Instant,
}

/// What the event loop needs to issue the remote call for one turn.
pub struct OutboundTurn {
    pub text: String,
    pub endpoint: String,
    pub session_id: String,
}

pub struct App {
    pub transcript: TranscriptStore,
    pub compose: TextArea<'static>,
    pub request: RequestState,
    pub mode: Mode,
    pub notice: Option<Notice>,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub exit_requested: bool,
    pub client: reqwest::Client,
    endpoint: String,
    session_id: String,
}

impl App {
    pub fn new(config: &Config, history_path: PathBuf) -> Self {
        let mut app = Self {
            transcript: TranscriptStore::load(history_path),
            compose: TextArea::default(),
            request: RequestState::Idle,
            mode: Mode::Compose,
            notice: None,
            scroll_offset: 0,
            auto_scroll: true,
            exit_requested: false,
            client: reqwest::Client::new(),
            endpoint: config.endpoint().to_string(),
            session_id: config.session_id().to_string(),
        };
        app.configure_compose_appearance();
        app
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn configure_compose_appearance(&mut self) {
        // tui-textarea underlines the cursor line by default, which reads
        // as stray markup in a one-box composer.
        self.compose.set_cursor_line_style(Style::default());
        self.compose
            .set_placeholder_text("Escribe tu mensaje...");
    }

    /// Current compose-box contents, newlines included.
    pub fn input_text(&self) -> String {
        self.compose.lines().join("\n")
    }

    pub fn input_char_count(&self) -> usize {
        self.input_text().chars().count()
    }

    pub fn remaining_capacity(&self) -> usize {
        MAX_MESSAGE_LEN.saturating_sub(self.input_char_count())
    }

    pub fn counter_text(&self) -> String {
        format!("{}/{}", self.input_char_count(), MAX_MESSAGE_LEN)
    }

    pub fn counter_is_warning(&self) -> bool {
        self.input_char_count() as f64 > MAX_MESSAGE_LEN as f64 * COUNTER_WARN_RATIO
    }

    /// Whether keystrokes may reach the compose box. False while a request
    /// is outstanding (the system's only concurrency gate) and while the
    /// clear confirmation is up.
    pub fn input_enabled(&self) -> bool {
        !self.request.is_sending() && self.mode == Mode::Compose
    }

    /// Rows the compose box needs for its content, bounded so the
    /// transcript always keeps most of the screen.
    pub fn compose_height(&self) -> u16 {
        (self.compose.lines().len() as u16).clamp(1, MAX_INPUT_HEIGHT)
    }

    fn reset_compose(&mut self) {
        self.compose = TextArea::default();
        self.configure_compose_appearance();
    }

    /// Handle a submission attempt. Returns the outbound turn when one
    /// should be issued; `None` means the attempt was a no-op (already
    /// sending, confirmation overlay up, or nothing but whitespace).
    ///
    /// On acceptance, in order: the user message is appended (and thereby
    /// persisted), the compose box is cleared and reset, and the machine
    /// enters `Sending`, which shows the typing indicator and disables
    /// input.
    pub fn submit(&mut self, now: Instant) -> Option<OutboundTurn> {
        if !self.input_enabled() {
            return None;
        }

        let text = self.input_text().trim().to_string();
        if text.is_empty() {
            return None;
        }

        self.transcript.append(Message::user(text.clone()));
        self.reset_compose();
        self.notice = None;
        self.request = RequestState::Sending { started: now };
        self.auto_scroll = true;

        Some(OutboundTurn {
            text,
            endpoint: self.endpoint.clone(),
            session_id: self.session_id.clone(),
        })
    }

    /// Reconcile a settled request. Success appends the bot reply; failure
    /// raises an ephemeral notice and leaves the transcript untouched.
    /// Either way the machine returns to `Idle` and input re-enables.
    pub fn settle(&mut self, outcome: Result<String, ApiError>, now: Instant) {
        match outcome {
            Ok(reply) => {
                self.transcript.append(Message::bot(reply));
            }
            Err(err) => {
                self.notice = Some(Notice {
                    text: error_notice_text(&err, &self.endpoint),
                    expires_at: now + NOTICE_TTL,
                });
            }
        }
        self.request = RequestState::Idle;
        self.auto_scroll = true;
    }

    /// Drop the error notice once its lifetime has elapsed.
    pub fn expire_notice(&mut self, now: Instant) {
        if let Some(notice) = &self.notice {
            if now >= notice.expires_at {
                self.notice = None;
            }
        }
    }

    /// Ask for transcript clearing. Only meaningful while idle; the
    /// confirmation overlay then blocks everything else.
    pub fn request_clear(&mut self) {
        if self.input_enabled() {
            self.mode = Mode::ConfirmClear;
        }
    }

    /// Resolve the clear confirmation. Accepting empties the transcript
    /// and its durable copy and resets the compose box; the welcome view
    /// reappears because the transcript is empty again.
    pub fn resolve_clear(&mut self, accepted: bool) {
        if self.mode != Mode::ConfirmClear {
            return;
        }
        if accepted {
            self.transcript.clear();
            self.reset_compose();
            self.scroll_offset = 0;
            self.auto_scroll = true;
        }
        self.mode = Mode::Compose;
    }

    /// Pulse glyph for the typing indicator, or `None` when idle.
    pub fn typing_symbol(&self, now: Instant) -> Option<&'static str> {
        let RequestState::Sending { started } = self.request else {
            return None;
        };
        let elapsed = now.saturating_duration_since(started).as_millis() as f32 / 1000.0;
        let pulse_phase = (elapsed * 2.0) % 2.0;
        let pulse_intensity = if pulse_phase < 1.0 {
            pulse_phase
        } else {
            2.0 - pulse_phase
        };
        Some(if pulse_intensity < 0.33 {
            "○"
        } else if pulse_intensity < 0.66 {
            "◐"
        } else {
            "●"
        })
    }
}

/// Diagnostic line for a failed turn. Carries the responder's own detail
/// when it sent one and always references the configured endpoint.
pub fn error_notice_text(err: &ApiError, endpoint: &str) -> String {
    format!(
        "Error: {}. Por favor, verifica que el API esté ejecutándose en {}",
        err.diagnostic(),
        endpoint
    )
}
