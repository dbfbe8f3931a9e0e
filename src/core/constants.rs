//! Shared constants used across the application

use std::time::Duration;

/// Endpoint used when neither the config file nor the CLI provides one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/chat";

/// Session identifier shared by every instance of the deployment. There is
/// no per-conversation identity; the responder keys its memory on this one
/// value.
pub const DEFAULT_SESSION_ID: &str = "charla-session";

/// Maximum number of characters accepted by the compose box.
pub const MAX_MESSAGE_LEN: usize = 500;

/// Fraction of [`MAX_MESSAGE_LEN`] above which the character counter
/// switches to its warning style.
pub const COUNTER_WARN_RATIO: f64 = 0.9;

/// Maximum height (rows) the compose box may grow to before it scrolls
/// internally.
pub const MAX_INPUT_HEIGHT: u16 = 6;

/// How long an ephemeral error notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Reply text used when the responder returns a payload with no usable
/// `response` field.
pub const FALLBACK_REPLY: &str = "Lo siento, no pude generar una respuesta.";

/// File name of the durable transcript copy inside the data directory.
pub const HISTORY_FILE: &str = "history.json";
