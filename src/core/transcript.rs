//! Transcript store: the ordered message list and its durable copy.
//!
//! The store is the single owner of transcript state. `append` and `clear`
//! are the only mutators; every append is followed synchronously by a
//! full-sequence write of the history file, so the rendered transcript and
//! the stored one never drift apart across a turn boundary.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::core::message::Message;

pub struct TranscriptStore {
    messages: Vec<Message>,
    path: PathBuf,
}

impl TranscriptStore {
    /// Open the store, restoring a previously persisted transcript if one
    /// exists and is well-formed. Malformed contents are discarded and the
    /// file removed; that is a repair action, not an error.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let messages = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<Message>>(&contents) {
                Ok(messages) => {
                    debug!(count = messages.len(), "restored transcript from history file");
                    messages
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "discarding malformed history file");
                    let _ = fs::remove_file(&path);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        Self { messages, path }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message and persist the full sequence. A failed write
    /// degrades silently: the in-memory transcript stays authoritative for
    /// the rest of the session and the UI keeps working.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        if let Err(err) = self.persist() {
            warn!(path = %self.path.display(), %err, "could not persist transcript");
        }
    }

    /// Empty the transcript and erase the durable copy. This is the only
    /// reset path.
    pub fn clear(&mut self) {
        self.messages.clear();
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), %err, "could not remove history file");
            }
        }
    }

    fn persist(&self) -> Result<(), Box<dyn std::error::Error>> {
        let contents = serde_json::to_string(&self.messages)?;
        write_atomically(&self.path, contents.as_bytes())
    }
}

/// Write via a tempfile-then-rename so a crash mid-write never leaves a
/// truncated history file behind.
fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());

    if let Some(dir) = parent {
        fs::create_dir_all(dir)?;
    }

    let mut temp_file = match parent {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new()?,
    };
    temp_file.write_all(contents)?;
    temp_file.as_file_mut().sync_all()?;
    temp_file
        .persist(path)
        .map_err(|err| -> Box<dyn std::error::Error> { Box::new(err) })?;
    Ok(())
}
