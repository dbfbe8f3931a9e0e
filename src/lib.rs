//! Charla is a full-screen terminal chat widget for a remote conversational
//! endpoint.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the transcript store and its durable
//!   history file, the request coordinator's state machine, and the
//!   compose-box lifecycle.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`api`] defines the request/response payloads exchanged with the
//!   responder and the error taxonomy for failed turns.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`), which
//! parses arguments and dispatches into [`ui::chat_loop`] for the
//! interactive session.

pub mod api;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
